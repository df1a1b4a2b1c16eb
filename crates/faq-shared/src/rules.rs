//! Gating and validation rule tables.
//!
//! The keyword and pattern tables are data, not code: a [`RuleSet`] can be
//! loaded from a TOML file so the gating rules change without a rebuild.
//! Any category missing from the file keeps its built-in table.

use crate::error::RuleError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current version of the built-in tables
pub const BUILTIN_RULES_VERSION: u32 = 1;

/// Versioned keyword/pattern tables shared by the classifier and validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Clearly off-topic terms, matched as lowercase substrings
    #[serde(default = "default_off_topic_terms")]
    pub off_topic_terms: Vec<String>,

    /// Institution and academic vocabulary, matched as lowercase substrings
    #[serde(default = "default_domain_terms")]
    pub domain_terms: Vec<String>,

    /// Greetings, thanks and small talk (case-insensitive regex)
    #[serde(default = "default_greeting_patterns")]
    pub greeting_patterns: Vec<String>,

    /// Always-rejected content (case-insensitive regex)
    #[serde(default = "default_inappropriate_patterns")]
    pub inappropriate_patterns: Vec<String>,

    /// Terms that may only appear in an answer if the knowledge document has them
    #[serde(default = "default_restricted_terms")]
    pub restricted_terms: Vec<String>,

    /// Generalizing language in answers (case-insensitive regex)
    #[serde(default = "default_vague_patterns")]
    pub vague_patterns: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// Tables shipped with the assistant
    pub fn builtin() -> Self {
        Self {
            version: default_version(),
            off_topic_terms: default_off_topic_terms(),
            domain_terms: default_domain_terms(),
            greeting_patterns: default_greeting_patterns(),
            inappropriate_patterns: default_inappropriate_patterns(),
            restricted_terms: default_restricted_terms(),
            vague_patterns: default_vague_patterns(),
        }
    }

    /// Parse a rule set from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, RuleError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a rule set from a TOML file
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let content = fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML (for `faqctl rules`)
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Compile a pattern table case-insensitively, keeping the source text
/// next to each regex for issue reporting.
pub(crate) fn compile_patterns(
    category: &'static str,
    patterns: &[String],
) -> Result<Vec<(String, Regex)>, RuleError> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| (pattern.clone(), re))
                .map_err(|source| RuleError::InvalidPattern {
                    category,
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// Lowercase a term table once so matching only lowercases the input
pub(crate) fn lowercase_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn default_version() -> u32 {
    BUILTIN_RULES_VERSION
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_off_topic_terms() -> Vec<String> {
    owned(&[
        "weather", "طقس", "news", "اخبار", "sports", "رياضة", "food", "اكل", "movie", "فيلم",
        "music", "موسيقى", "politics", "سياسة", "religion", "دين",
    ])
}

fn default_domain_terms() -> Vec<String> {
    owned(&[
        "كلية", "تجارة", "حلوان", "bis", "fmi", "sbs", "انجليش", "عربي", "college", "commerce",
        "helwan", "english", "arabic", "business", "مصاريف", "fees", "تقديم", "admission",
        "قبول", "acceptance", "انتظام", "انتساب", "دراسة", "طلاب", "students", "study",
        "محاسبة", "ادارة", "اقتصاد", "احصاء", "قسم", "department", "شهادة", "certificate",
        "تخرج", "graduation", "سنة", "year", "فصل", "semester", "مواد", "subjects", "انترفيو",
        "interview",
    ])
}

fn default_greeting_patterns() -> Vec<String> {
    owned(&[
        r"\b(hi|hello|hey|hiya|greetings)\b",
        r"\bgood\s+(morning|afternoon|evening)\b",
        r"\b(thanks|thank\s+you|thx)\b",
        r"\bhow\s+are\s+you\b",
        r"\bwho\s+are\s+you\b",
        r"\bwhat('?s|\s+is)\s+my\s+name\b",
        r"\bmy\s+name\s+is\b",
        r"(السلام عليكم|سلام|مرحبا|أهلا|اهلا|ازيك|إزيك|صباح الخير|مساء الخير|شكرا|متشكر)",
        r"(عامل ايه|عاملة ايه|اخبارك ايه|انت مين|اسمي ايه)",
    ])
}

fn default_inappropriate_patterns() -> Vec<String> {
    owned(&[
        r"\b(hack(ing|er|ers)?|phishing|ddos|malware|crack(ing)?\s+(a\s+)?password)\b",
        r"\b(drugs?|cocaine|heroin|marijuana|weed)\b",
        r"\b(kill(ing)?|murder|bomb|weapons?|violence|attack\s+someone)\b",
        r"\b(steal(ing)?|fraud|counterfeit|forge(d|ry)?|cheat(ing)?\s+on\s+(the\s+)?exams?)\b",
        r"\b(porn\w*|nudes?|sexual|explicit\s+content)\b",
        r"(مخدرات|حشيش|اختراق|تهكير|سلاح|قتل|تزوير|سرقة|اباحي|إباحي)",
    ])
}

fn default_restricted_terms() -> Vec<String> {
    owned(&[
        "جامعة القاهرة",
        "جامعة عين شمس",
        "الأزهر",
        "الإسكندرية",
        "Cairo University",
        "Ain Shams",
        "Alexandria University",
        "معلومات عامة",
        "general information",
        "usually",
        "typically",
        "في الجامعات المصرية",
        "Egyptian universities",
        "most colleges",
    ])
}

fn default_vague_patterns() -> Vec<String> {
    owned(&[
        r"عادة|usually|typically|generally|في معظم",
        r"بشكل عام|in general|commonly|often",
        r"في الجامعات|in universities|most colleges",
    ])
}
