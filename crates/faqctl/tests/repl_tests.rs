//! Tests for repl.rs - scripted chat sessions end to end

use faq_common::config::FaqConfig;
use faq_shared::fallback;
use faq_shared::gate::TurnOutcome;
use faq_shared::model::{ModelError, ScriptedModel};
use faqctl::repl::{answer_turn, run_loop};
use faqctl::Assistant;
use std::io::Cursor;
use tempfile::TempDir;

const KNOWLEDGE: &str = "BIS program fees: 45000 EGP per year.\nLocation: Zamalek.";

fn assistant_with(configure: impl FnOnce(&mut FaqConfig)) -> (Assistant, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let knowledge_path = dir.path().join("info.txt");
    std::fs::write(&knowledge_path, KNOWLEDGE).unwrap();

    let mut config = FaqConfig {
        knowledge_path,
        ..FaqConfig::default()
    };
    configure(&mut config);

    let assistant = Assistant::from_config(config, None).unwrap();
    (assistant, dir)
}

fn chat(assistant: &Assistant, model: &ScriptedModel, input: &str) -> (String, usize) {
    let mut out = Vec::new();
    let session = run_loop(assistant, model, Cursor::new(input.to_string()), &mut out).unwrap();
    (String::from_utf8(out).unwrap(), session.len())
}

#[test]
fn test_answer_then_history() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::always("BIS fees are 45000 EGP.");

    let (out, turns) = chat(&assistant, &model, "What are the BIS fees?\n/history\n/quit\n");

    assert!(out.contains("BIS fees are 45000 EGP."));
    assert!(out.contains("you: What are the BIS fees?"));
    assert!(out.contains("bot: BIS fees are 45000 EGP."));
    assert_eq!(turns, 2);
    assert_eq!(model.call_count(), 1);
}

#[test]
fn test_off_topic_never_reaches_model() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::always("unused");

    let (out, _) = chat(&assistant, &model, "What's the weather today?\n");

    assert!(out.contains(fallback::OFF_TOPIC_ENGLISH));
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_invalid_answer_is_never_shown_when_enforced() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::chunks(&["BIS fees are ", "usually 99999 EGP."]);

    let (out, _) = chat(&assistant, &model, "What are the BIS fees?\n");

    assert!(out.contains(fallback::MISSING_INFO_ENGLISH));
    assert!(!out.contains("99999"));
}

#[test]
fn test_live_streaming_when_not_enforced() {
    let (assistant, _dir) = assistant_with(|c| c.chat.enforce_validation = false);
    assert!(assistant.streams_live());
    let model = ScriptedModel::chunks(&["BIS fees ", "are 45000 EGP."]);

    let mut session = assistant.new_session();
    let mut out = Vec::new();
    let outcome = answer_turn(&assistant, &mut session, &model, "BIS fees?", &mut out).unwrap();

    assert!(matches!(outcome, TurnOutcome::Answered { .. }));
    assert_eq!(String::from_utf8(out).unwrap(), "BIS fees are 45000 EGP.\n");
}

#[test]
fn test_model_failure_prints_apology() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::failing(ModelError::Http("connection refused".to_string()));

    let mut session = assistant.new_session();
    let mut out = Vec::new();
    let outcome = answer_turn(&assistant, &mut session, &model, "BIS fees?", &mut out).unwrap();

    assert!(matches!(outcome, TurnOutcome::ModelFailed { .. }));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{}\n", fallback::MODEL_ERROR_ENGLISH)
    );
}

#[test]
fn test_clear_resets_session() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::always("BIS fees are 45000 EGP.");

    let (out, turns) = chat(&assistant, &model, "BIS fees?\n/clear\n");

    assert!(out.contains("Conversation cleared."));
    assert_eq!(turns, 0);
}

#[test]
fn test_unknown_command_is_not_sent() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::always("unused");

    let (out, turns) = chat(&assistant, &model, "/help\n");

    assert!(out.contains("Unknown command:"));
    assert_eq!(turns, 0);
    assert_eq!(model.call_count(), 0);
}

#[test]
fn test_history_limit_applies_to_chat() {
    let (assistant, _dir) = assistant_with(|c| c.chat.history_limit = Some(2));
    let model = ScriptedModel::always("BIS fees are 45000 EGP.");

    let (_, turns) = chat(&assistant, &model, "BIS fees?\nFMI fees?\nSBS fees?\n");

    assert_eq!(turns, 2);
    assert_eq!(model.call_count(), 3);
}

#[test]
fn test_cached_answer_skips_model() {
    let (assistant, _dir) = assistant_with(|_| {});
    let model = ScriptedModel::always("unused");

    let (out, _) = chat(&assistant, &model, "فين الكلية؟\n");

    assert!(out.contains("الزمالك"));
    assert_eq!(model.call_count(), 0);
}
