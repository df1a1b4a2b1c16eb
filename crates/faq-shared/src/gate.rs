//! One chat turn: gate, short-circuit, assemble, validate.
//!
//! ```text
//! question → classifier ─reject→ off-topic redirect
//!              └→ cache ─hit→ canned answer
//!                   └→ assemble → model → validator ─invalid→ missing-info reply
//! ```
//!
//! The shell can drive the two halves itself (`prepare` then `finish`/`fail`)
//! or hand a [`ChatModel`] to `run_turn`.

use crate::cache::ResponseCache;
use crate::classifier::{Classifier, ClassifierPolicy, GateReason};
use crate::conversation::{ConversationTurn, Session};
use crate::error::RuleError;
use crate::fallback;
use crate::model::{ChatModel, ModelError};
use crate::prompt::{assemble, SystemPrompt};
use crate::rules::RuleSet;
use crate::validator::{ValidationVerdict, Validator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-deployment turn settings
#[derive(Debug, Clone, PartialEq)]
pub struct GateOptions {
    /// History turns sent with each request
    pub window: usize,
    pub temperature: f32,
    /// Replace answers that fail validation
    pub enforce_validation: bool,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            window: 6,
            temperature: 0.7,
            enforce_validation: true,
        }
    }
}

/// What the shell should do with a question
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Out of domain; reply with the redirect, no model call
    Refuse { text: String, reason: GateReason },
    /// Known question; reply with the canned answer, no model call
    Cached { text: String },
    /// Send these messages to the model
    Forward { messages: Vec<ConversationTurn> },
}

/// Final result of a turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Refused {
        text: String,
        reason: GateReason,
    },
    Cached {
        text: String,
    },
    Answered {
        text: String,
        verdict: ValidationVerdict,
    },
    /// The model answered but failed validation
    Substituted {
        text: String,
        rejected: String,
        verdict: ValidationVerdict,
    },
    ModelFailed {
        text: String,
        error: ModelError,
    },
}

impl TurnOutcome {
    /// Text shown to the user
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Refused { text, .. }
            | TurnOutcome::Cached { text }
            | TurnOutcome::Answered { text, .. }
            | TurnOutcome::Substituted { text, .. }
            | TurnOutcome::ModelFailed { text, .. } => text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TurnOutcome::Refused { .. } => "refused",
            TurnOutcome::Cached { .. } => "cached",
            TurnOutcome::Answered { .. } => "answered",
            TurnOutcome::Substituted { .. } => "substituted",
            TurnOutcome::ModelFailed { .. } => "model_failed",
        }
    }

    pub fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            TurnOutcome::Answered { verdict, .. } | TurnOutcome::Substituted { verdict, .. } => {
                Some(verdict)
            }
            _ => None,
        }
    }
}

/// Gating and validation for one knowledge document
#[derive(Debug, Clone)]
pub struct FaqGate {
    classifier: Classifier,
    validator: Validator,
    cache: ResponseCache,
    knowledge: Arc<str>,
    system_prompt: String,
    options: GateOptions,
}

impl FaqGate {
    /// Compile the rules. The system prompt defaults to the standard
    /// instruction around `knowledge` and the cache starts empty.
    pub fn new(
        knowledge: Arc<str>,
        rules: &RuleSet,
        policy: ClassifierPolicy,
    ) -> Result<Self, RuleError> {
        let system_prompt = SystemPrompt::new(knowledge.as_ref()).render();
        Ok(Self {
            classifier: Classifier::new(rules, policy)?,
            validator: Validator::new(rules)?,
            cache: ResponseCache::new(),
            knowledge,
            system_prompt,
            options: GateOptions::default(),
        })
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_options(mut self, options: GateOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the system instruction (institution name, date line, ...)
    pub fn with_system_prompt(mut self, prompt: &SystemPrompt) -> Self {
        self.system_prompt = prompt.render();
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn knowledge(&self) -> &str {
        &self.knowledge
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    /// Record the question and decide whether the model is needed.
    /// Refusals and cache hits are recorded as the assistant's reply.
    pub fn prepare(&self, session: &mut Session, question: &str) -> GateDecision {
        session.push_user(question);

        let classification = self.classifier.explain(question);
        if !classification.in_domain {
            let text = fallback::compose_off_topic(fallback::is_arabic(question)).to_string();
            debug!(reason = %classification.reason.describe(), "question refused");
            session.push_assistant(text.clone());
            return GateDecision::Refuse {
                text,
                reason: classification.reason,
            };
        }
        debug!(reason = %classification.reason.describe(), "question accepted");

        if let Some(answer) = self.cache.lookup(question) {
            debug!("cache hit");
            session.push_assistant(answer);
            return GateDecision::Cached {
                text: answer.to_string(),
            };
        }

        GateDecision::Forward {
            messages: assemble(&self.system_prompt, session.history(), self.options.window),
        }
    }

    /// Validate the model's reply and record what the user sees
    pub fn finish(&self, session: &mut Session, response: &str) -> TurnOutcome {
        let verdict = self.validator.validate(response, &self.knowledge);

        if verdict.is_valid || !self.options.enforce_validation {
            if !verdict.is_valid {
                warn!(issues = ?verdict.messages(), "answer failed validation (not enforced)");
            }
            session.push_assistant(response);
            return TurnOutcome::Answered {
                text: response.to_string(),
                verdict,
            };
        }

        warn!(score = verdict.score, issues = ?verdict.messages(), "answer replaced by fallback");
        let text = fallback::compose_for(response).to_string();
        session.push_assistant(text.clone());
        TurnOutcome::Substituted {
            text,
            rejected: response.to_string(),
            verdict,
        }
    }

    /// Record the static apology for a failed model call
    pub fn fail(&self, session: &mut Session, question: &str, error: ModelError) -> TurnOutcome {
        warn!(%error, "model call failed");
        let text = fallback::compose_model_error(fallback::is_arabic(question)).to_string();
        session.push_assistant(text.clone());
        TurnOutcome::ModelFailed { text, error }
    }

    /// Run a full turn against `model`, streaming chunks to `on_chunk`
    pub fn run_turn(
        &self,
        session: &mut Session,
        question: &str,
        model: &dyn ChatModel,
        on_chunk: &mut dyn FnMut(&str),
    ) -> TurnOutcome {
        let outcome = match self.prepare(session, question) {
            GateDecision::Refuse { text, reason } => TurnOutcome::Refused { text, reason },
            GateDecision::Cached { text } => TurnOutcome::Cached { text },
            GateDecision::Forward { messages } => {
                match model.generate(&messages, self.options.temperature, on_chunk) {
                    Ok(response) if response.trim().is_empty() => {
                        self.fail(session, question, ModelError::Empty)
                    }
                    Ok(response) => self.finish(session, &response),
                    Err(error) => self.fail(session, question, error),
                }
            }
        };

        info!(outcome = outcome.label(), history = session.len(), "turn complete");
        outcome
    }
}
