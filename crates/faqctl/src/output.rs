//! Terminal output.
//!
//! Answers go to stdout. Status lines (outcome labels, validation notes)
//! go to stderr so piped answers stay clean.

use faq_shared::classifier::Classification;
use faq_shared::conversation::{ConversationTurn, Role};
use faq_shared::gate::TurnOutcome;
use faq_shared::validator::ValidationVerdict;
use owo_colors::OwoColorize;
use serde::Serialize;

pub const SEPARATOR: &str = "------------------------------------------------------------";

pub fn print_banner(institution: &str, provider: &str, model: &str) {
    println!();
    println!("{}", "FAQ Assistant".bold().cyan());
    println!("{}", SEPARATOR.dimmed());
    println!("Ask anything about {}.", institution);
    println!("اسأل عن أي حاجة متعلقة بالكلية.");
    println!(
        "{}",
        format!("Model: {} ({})  Commands: /clear /history /quit", model, provider).dimmed()
    );
    println!("{}", SEPARATOR.dimmed());
    println!();
}

/// Status line after an answer; silent for plain answers
pub fn print_outcome_note(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Answered { verdict, .. } if !verdict.is_valid => {
            eprintln!("{} {}", "[unverified]".yellow(), verdict.messages().join("; "));
        }
        TurnOutcome::Substituted { verdict, .. } => {
            eprintln!(
                "{} answer replaced ({})",
                "[fallback]".yellow(),
                verdict.messages().join("; ")
            );
        }
        TurnOutcome::ModelFailed { error, .. } => {
            eprintln!("{} {}", "[model error]".red(), error);
        }
        TurnOutcome::Cached { .. } => {
            eprintln!("{}", "[cached]".dimmed());
        }
        _ => {}
    }
}

/// One line per turn: role label, then the text
pub fn format_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return "(no conversation yet)".to_string();
    }
    history
        .iter()
        .map(|turn| {
            let label = match turn.role {
                Role::User => "you",
                Role::Assistant => "bot",
                Role::System => "sys",
            };
            format!("{}: {}", label, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_classification(classification: &Classification) -> String {
    let decision = if classification.in_domain {
        "in-domain"
    } else {
        "out-of-domain"
    };
    format!("{} ({})", decision, classification.reason.describe())
}

pub fn print_classification(classification: &Classification) {
    let line = format_classification(classification);
    if classification.in_domain {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

/// JSON body printed by `faqctl validate`
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    #[serde(flatten)]
    pub verdict: &'a ValidationVerdict,
    pub messages: Vec<String>,
    /// What the user would see
    pub cleaned: &'a str,
}

impl<'a> ValidationReport<'a> {
    pub fn new(verdict: &'a ValidationVerdict, cleaned: &'a str) -> Self {
        Self {
            verdict,
            messages: verdict.messages(),
            cleaned,
        }
    }
}
