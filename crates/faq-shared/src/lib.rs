//! Shared decision layer for the Helwan Commerce FAQ assistant.
//!
//! Everything here is synchronous and side-effect free once the rule tables
//! are compiled: topic gating, the canned-answer cache, prompt assembly,
//! post-response validation and the fixed fallback texts.

pub mod cache;
pub mod classifier;
pub mod conversation;
pub mod error;
pub mod fallback;
pub mod gate;
pub mod model;
pub mod prompt;
pub mod rules;
pub mod validator;

pub use cache::ResponseCache;
pub use classifier::{Classification, Classifier, ClassifierPolicy, GateReason};
pub use conversation::{ConversationTurn, Role, Session};
pub use error::RuleError;
pub use gate::{FaqGate, GateDecision, GateOptions, TurnOutcome};
pub use model::{ChatModel, ModelError, ScriptedModel};
pub use prompt::{assemble, SystemPrompt};
pub use rules::RuleSet;
pub use validator::{ValidationIssue, ValidationVerdict, Validator};
