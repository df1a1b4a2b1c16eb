//! Runtime support for the FAQ assistant: configuration, the knowledge
//! document and the hosted-model HTTP client.

pub mod config;
pub mod knowledge;
pub mod llm_client;

pub use config::{ChatSettings, ConfigError, FaqConfig, ModelSettings, Provider};
pub use knowledge::KnowledgeDocument;
pub use llm_client::HttpChatModel;
