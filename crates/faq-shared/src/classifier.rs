//! Topic classifier: decides whether a question is in the college's domain.
//!
//! Stages run in a fixed order and the first decisive stage wins:
//!
//! 1. inappropriate-content patterns reject
//! 2. off-topic blocklist terms reject
//! 3. domain allowlist terms accept
//! 4. greeting / small-talk patterns accept
//! 5. any non-ASCII character with trimmed length > 2 accepts
//! 6. the policy default decides
//!
//! Rejection stages always outrank acceptance stages.

use crate::error::RuleError;
use crate::rules::{compile_patterns, lowercase_terms, RuleSet};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What to do with input no stage recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierPolicy {
    /// Accept anything longer than two characters
    #[default]
    Permissive,
    /// Reject anything not explicitly recognised
    Strict,
}

impl ClassifierPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierPolicy::Permissive => "permissive",
            ClassifierPolicy::Strict => "strict",
        }
    }
}

/// The stage that decided a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum GateReason {
    Inappropriate { pattern: String },
    OffTopic { term: String },
    DomainTerm { term: String },
    Greeting { pattern: String },
    NonLatinScript,
    DefaultAccept,
    /// Permissive default, but trimmed input is two characters or fewer
    TooShort,
    /// Strict default
    DefaultReject,
}

impl GateReason {
    /// Short human-readable description
    pub fn describe(&self) -> String {
        match self {
            GateReason::Inappropriate { pattern } => format!("inappropriate content ({})", pattern),
            GateReason::OffTopic { term } => format!("off-topic term '{}'", term),
            GateReason::DomainTerm { term } => format!("domain term '{}'", term),
            GateReason::Greeting { pattern } => format!("greeting or small talk ({})", pattern),
            GateReason::NonLatinScript => "non-Latin script input".to_string(),
            GateReason::DefaultAccept => "accepted by default".to_string(),
            GateReason::TooShort => "too short".to_string(),
            GateReason::DefaultReject => "not recognised (strict policy)".to_string(),
        }
    }
}

/// Classifier verdict with the deciding stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub in_domain: bool,
    pub reason: GateReason,
}

impl Classification {
    fn accept(reason: GateReason) -> Self {
        Self { in_domain: true, reason }
    }

    fn reject(reason: GateReason) -> Self {
        Self { in_domain: false, reason }
    }
}

/// Compiled topic classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: ClassifierPolicy,
    off_topic_terms: Vec<String>,
    domain_terms: Vec<String>,
    greeting_patterns: Vec<(String, Regex)>,
    inappropriate_patterns: Vec<(String, Regex)>,
}

impl Classifier {
    /// Compile the classifier tables from a rule set
    pub fn new(rules: &RuleSet, policy: ClassifierPolicy) -> Result<Self, RuleError> {
        Ok(Self {
            policy,
            off_topic_terms: lowercase_terms(&rules.off_topic_terms),
            domain_terms: lowercase_terms(&rules.domain_terms),
            greeting_patterns: compile_patterns("greeting", &rules.greeting_patterns)?,
            inappropriate_patterns: compile_patterns("inappropriate", &rules.inappropriate_patterns)?,
        })
    }

    /// Classifier over the built-in tables
    pub fn builtin(policy: ClassifierPolicy) -> Self {
        // Built-in patterns are covered by tests in rules.rs
        Self::new(&RuleSet::builtin(), policy).expect("built-in rule patterns compile")
    }

    pub fn policy(&self) -> ClassifierPolicy {
        self.policy
    }

    /// True when the question should reach the model
    pub fn classify(&self, question: &str) -> bool {
        self.explain(question).in_domain
    }

    /// Classify and report which stage decided
    pub fn explain(&self, question: &str) -> Classification {
        if let Some(pattern) = first_match(&self.inappropriate_patterns, question) {
            return Classification::reject(GateReason::Inappropriate { pattern });
        }

        let lowered = question.to_lowercase();

        if let Some(term) = first_term(&self.off_topic_terms, &lowered) {
            return Classification::reject(GateReason::OffTopic { term });
        }

        if let Some(term) = first_term(&self.domain_terms, &lowered) {
            return Classification::accept(GateReason::DomainTerm { term });
        }

        if let Some(pattern) = first_match(&self.greeting_patterns, question) {
            return Classification::accept(GateReason::Greeting { pattern });
        }

        let trimmed_len = question.trim().chars().count();

        if !question.is_ascii() && trimmed_len > 2 {
            return Classification::accept(GateReason::NonLatinScript);
        }

        match self.policy {
            ClassifierPolicy::Permissive if trimmed_len > 2 => {
                Classification::accept(GateReason::DefaultAccept)
            }
            ClassifierPolicy::Permissive => Classification::reject(GateReason::TooShort),
            ClassifierPolicy::Strict => Classification::reject(GateReason::DefaultReject),
        }
    }
}

fn first_term(terms: &[String], lowered: &str) -> Option<String> {
    terms.iter().find(|t| lowered.contains(t.as_str())).cloned()
}

fn first_match(patterns: &[(String, Regex)], text: &str) -> Option<String> {
    patterns
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(src, _)| src.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_is_permissive() {
        assert_eq!(ClassifierPolicy::default(), ClassifierPolicy::Permissive);
        assert_eq!(ClassifierPolicy::Strict.as_str(), "strict");
    }

    #[test]
    fn test_reason_reports_matching_term() {
        let c = Classifier::builtin(ClassifierPolicy::Permissive);
        let result = c.explain("What are the BIS fees?");
        assert!(result.in_domain);
        assert_eq!(result.reason, GateReason::DomainTerm { term: "bis".to_string() });
    }

    #[test]
    fn test_too_short_vs_strict_reject() {
        let permissive = Classifier::builtin(ClassifierPolicy::Permissive);
        let strict = Classifier::builtin(ClassifierPolicy::Strict);

        assert_eq!(permissive.explain("ok").reason, GateReason::TooShort);
        assert_eq!(strict.explain("ok").reason, GateReason::DefaultReject);
    }

    #[test]
    fn test_describe_mentions_term() {
        let reason = GateReason::OffTopic { term: "weather".to_string() };
        assert!(reason.describe().contains("weather"));
    }
}
