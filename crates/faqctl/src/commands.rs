//! Subcommand handlers.

use crate::assistant::{load_rules, Assistant};
use crate::output::{self, ValidationReport};
use crate::repl;
use anyhow::{Context, Result};
use faq_common::config::FaqConfig;
use faq_common::knowledge::KnowledgeDocument;
use faq_common::llm_client::HttpChatModel;
use faq_shared::classifier::{Classification, Classifier, ClassifierPolicy};
use faq_shared::validator::Validator;
use std::io;
use std::path::Path;

fn connect(assistant: &Assistant) -> Result<HttpChatModel> {
    HttpChatModel::from_settings(&assistant.config.model).with_context(|| {
        format!(
            "Cannot reach {}; set the API key in the environment",
            assistant.config.model.provider.display_name()
        )
    })
}

pub fn chat(config: Option<&Path>) -> Result<()> {
    let assistant = Assistant::load(config)?;
    let model = connect(&assistant)?;

    output::print_banner(&assistant.config.institution, model.provider().as_str(), model.model());

    let stdin = io::stdin();
    repl::run_loop(&assistant, &model, stdin.lock(), io::stdout())?;
    Ok(())
}

pub fn ask(config: Option<&Path>, question: &str) -> Result<()> {
    let assistant = Assistant::load(config)?;
    let model = connect(&assistant)?;
    let mut session = assistant.new_session();

    repl::answer_turn(&assistant, &mut session, &model, question, &mut io::stdout())?;
    Ok(())
}

/// Classification under the configured rules, optionally forcing the
/// strict policy
pub fn classify_question(config: &FaqConfig, question: &str, strict: bool) -> Result<Classification> {
    let rules = load_rules(config)?;
    let policy = if strict {
        ClassifierPolicy::Strict
    } else {
        config.chat.policy
    };
    let classifier = Classifier::new(&rules, policy).context("Failed to compile rule tables")?;
    Ok(classifier.explain(question))
}

pub fn classify(config: Option<&Path>, question: &str, strict: bool) -> Result<()> {
    let (config, _) = FaqConfig::discover(config).context("Failed to load configuration")?;
    let classification = classify_question(&config, question, strict)?;
    output::print_classification(&classification);
    Ok(())
}

/// JSON verdict for `response` against the given or configured knowledge
pub fn validation_json(config: &FaqConfig, response: &str, knowledge: Option<&Path>) -> Result<String> {
    let rules = load_rules(config)?;
    let validator = Validator::new(&rules).context("Failed to compile rule tables")?;
    let knowledge = KnowledgeDocument::load(knowledge.unwrap_or(config.knowledge_path.as_path()));

    let verdict = validator.validate(response, knowledge.text());
    let cleaned = validator.clean(response, knowledge.text());
    let report = ValidationReport::new(&verdict, &cleaned);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn validate(config: Option<&Path>, response: &str, knowledge: Option<&Path>) -> Result<()> {
    let (config, _) = FaqConfig::discover(config).context("Failed to load configuration")?;
    println!("{}", validation_json(&config, response, knowledge)?);
    Ok(())
}

pub fn rules(config: Option<&Path>) -> Result<()> {
    let (config, _) = FaqConfig::discover(config).context("Failed to load configuration")?;
    let rules = load_rules(&config)?;
    print!("{}", rules.to_toml_string().context("Failed to serialize rules")?);
    Ok(())
}

pub fn show_config(config: Option<&Path>) -> Result<()> {
    let (config, path) = FaqConfig::discover(config).context("Failed to load configuration")?;
    match path {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# built-in defaults (no configuration file found)"),
    }
    print!("{}", config.to_toml_string().context("Failed to serialize configuration")?);
    Ok(())
}
