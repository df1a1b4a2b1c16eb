//! FAQ assistant configuration.
//!
//! Configuration lives in `faqbot.toml`. Lookup order: explicit path,
//! `$FAQBOT_CONFIG`, `<config dir>/faqbot/faqbot.toml`, `./faqbot.toml`.
//! With no file at all the built-in defaults apply.
//!
//! Relative paths inside the file resolve against the file's directory.

use faq_shared::cache::{CacheEntry, ResponseCache};
use faq_shared::classifier::ClassifierPolicy;
use faq_shared::gate::GateOptions;
use faq_shared::prompt::DEFAULT_INSTITUTION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "FAQBOT_CONFIG";
const CONFIG_DIR_NAME: &str = "faqbot";
const CONFIG_FILE: &str = "faqbot.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Hosted model provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-3.5-turbo",
            Provider::Gemini => "gemini-2.0-flash-lite",
        }
    }

    pub fn default_temperature(&self) -> f32 {
        match self {
            Provider::OpenAi => 0.7,
            Provider::Gemini => 0.5,
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

/// `[model]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub provider: Provider,

    /// Provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            temperature: None,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelSettings {
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn effective_temperature(&self) -> f32 {
        self.temperature
            .unwrap_or_else(|| self.provider.default_temperature())
    }

    pub fn effective_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }
}

/// `[chat]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// History turns sent with each request (must be at least 1)
    #[serde(default = "default_window")]
    pub window: usize,

    /// Turns kept per session; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    #[serde(default)]
    pub policy: ClassifierPolicy,

    /// Add today's date to the system instruction
    #[serde(default)]
    pub include_date: bool,

    /// Replace answers that fail validation with the fallback reply
    #[serde(default = "default_enforce_validation")]
    pub enforce_validation: bool,
}

fn default_window() -> usize {
    6
}

fn default_enforce_validation() -> bool {
    true
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            window: default_window(),
            history_limit: None,
            policy: ClassifierPolicy::default(),
            include_date: false,
            enforce_validation: default_enforce_validation(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_institution")]
    pub institution: String,

    /// Plain-text knowledge document
    #[serde(default = "default_knowledge_path")]
    pub knowledge_path: PathBuf,

    /// Rule tables; built-in tables when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,

    #[serde(default)]
    pub model: ModelSettings,

    #[serde(default)]
    pub chat: ChatSettings,

    /// Canned answers, tried in file order
    #[serde(default = "default_cache")]
    pub cache: Vec<CacheEntry>,
}

fn default_institution() -> String {
    DEFAULT_INSTITUTION.to_string()
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("info.txt")
}

fn default_cache() -> Vec<CacheEntry> {
    ResponseCache::builtin().entries().to_vec()
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            institution: default_institution(),
            knowledge_path: default_knowledge_path(),
            rules_path: None,
            model: ModelSettings::default(),
            chat: ChatSettings::default(),
            cache: default_cache(),
        }
    }
}

impl FaqConfig {
    /// Parse and validate TOML text. Paths are left as written.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: FaqConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content, path)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Find and load the configuration. Returns the file used, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for candidate in Self::candidate_paths() {
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok((Self::default(), None))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                paths.push(PathBuf::from(path));
            }
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE));
        }
        paths.push(PathBuf::from(CONFIG_FILE));
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.window == 0 {
            return Err(ConfigError::Invalid(
                "chat.window must be at least 1".to_string(),
            ));
        }
        if self.chat.history_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "chat.history_limit must be at least 1 when set".to_string(),
            ));
        }
        if let Some(t) = self.model.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "model.temperature must be between 0.0 and 2.0 (got {})",
                    t
                )));
            }
        }
        if let Some(entry) = self.cache.iter().find(|e| e.question.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "cache entry with empty question (answer: {:?})",
                entry.answer
            )));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.knowledge_path.is_relative() {
            self.knowledge_path = base.join(&self.knowledge_path);
        }
        if let Some(rules) = &self.rules_path {
            if rules.is_relative() {
                self.rules_path = Some(base.join(rules));
            }
        }
    }

    /// Turn settings for the gate
    pub fn gate_options(&self) -> GateOptions {
        GateOptions {
            window: self.chat.window,
            temperature: self.model.effective_temperature(),
            enforce_validation: self.chat.enforce_validation,
        }
    }

    pub fn response_cache(&self) -> ResponseCache {
        ResponseCache::from_entries(self.cache.iter().cloned())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
