//! Wiring: configuration, knowledge and rules into a ready gate.

use anyhow::{Context, Result};
use faq_common::config::FaqConfig;
use faq_common::knowledge::KnowledgeDocument;
use faq_shared::conversation::Session;
use faq_shared::gate::FaqGate;
use faq_shared::prompt::SystemPrompt;
use faq_shared::rules::RuleSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a chat turn needs, loaded once per process
pub struct Assistant {
    pub config: FaqConfig,
    pub config_path: Option<PathBuf>,
    pub knowledge: KnowledgeDocument,
    pub rules: RuleSet,
    pub gate: FaqGate,
}

impl Assistant {
    /// Discover the configuration and build the gate
    pub fn load(explicit_config: Option<&Path>) -> Result<Self> {
        let (config, config_path) =
            FaqConfig::discover(explicit_config).context("Failed to load configuration")?;
        Self::from_config(config, config_path)
    }

    pub fn from_config(config: FaqConfig, config_path: Option<PathBuf>) -> Result<Self> {
        let knowledge = KnowledgeDocument::load(&config.knowledge_path);
        let rules = load_rules(&config)?;

        let mut prompt = SystemPrompt::new(knowledge.text()).institution(config.institution.clone());
        if config.chat.include_date {
            prompt = prompt.today(chrono::Local::now().date_naive());
        }

        let gate = FaqGate::new(knowledge.shared(), &rules, config.chat.policy)
            .context("Failed to compile rule tables")?
            .with_cache(config.response_cache())
            .with_options(config.gate_options())
            .with_system_prompt(&prompt);

        info!(
            policy = config.chat.policy.as_str(),
            cache_entries = gate.cache().len(),
            placeholder_knowledge = knowledge.is_placeholder(),
            "assistant ready"
        );

        Ok(Self {
            config,
            config_path,
            knowledge,
            rules,
            gate,
        })
    }

    /// Fresh session honouring the configured history limit
    pub fn new_session(&self) -> Session {
        match self.config.chat.history_limit {
            Some(limit) => Session::with_history_limit(limit),
            None => Session::new(),
        }
    }

    /// Answers are streamed live only when nothing can replace them afterwards
    pub fn streams_live(&self) -> bool {
        !self.config.chat.enforce_validation
    }
}

/// Rule tables from `rules_path`, or the built-in ones
pub fn load_rules(config: &FaqConfig) -> Result<RuleSet> {
    match &config.rules_path {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display())),
        None => Ok(RuleSet::builtin()),
    }
}
