//! Seam to the hosted language model.
//!
//! The gate only needs "messages in, streamed text out". Real HTTP clients
//! live in `faq_common`; [`ScriptedModel`] stands in for them in tests.

use crate::conversation::ConversationTurn;
use std::sync::Mutex;

/// Why a model call produced no usable answer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("No API key configured ({0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from {provider}")]
    Status { provider: String, status: u16 },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned empty response")]
    Empty,
}

/// Streaming text generation over a message sequence
pub trait ChatModel: Send + Sync {
    /// Generate a reply, handing each text chunk to `on_chunk` as it
    /// arrives. Returns the full concatenated reply.
    fn generate(
        &self,
        messages: &[ConversationTurn],
        temperature: f32,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError>;
}

/// Fake model replaying canned results
pub struct ScriptedModel {
    replies: Mutex<Vec<Result<Vec<String>, ModelError>>>,
    calls: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl ScriptedModel {
    /// Each reply is a list of chunks. The last reply repeats once the
    /// others are used up.
    pub fn new(replies: Vec<Result<Vec<String>, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with a single chunk
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(vec![text.to_string()])])
    }

    /// Always answer with these chunks
    pub fn chunks(chunks: &[&str]) -> Self {
        Self::new(vec![Ok(chunks.iter().map(|c| c.to_string()).collect())])
    }

    /// Always fail
    pub fn failing(error: ModelError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages received by the most recent call
    pub fn last_messages(&self) -> Option<Vec<ConversationTurn>> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl ChatModel for ScriptedModel {
    fn generate(
        &self,
        messages: &[ConversationTurn],
        _temperature: f32,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.len() {
                0 => Err(ModelError::Empty),
                1 => replies[0].clone(),
                _ => replies.remove(0),
            }
        };

        let chunks = reply?;
        let mut full = String::new();
        for chunk in &chunks {
            on_chunk(chunk);
            full.push_str(chunk);
        }
        Ok(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_streams_chunks() {
        let model = ScriptedModel::chunks(&["BIS ", "fees"]);
        let mut seen = Vec::new();
        let full = model
            .generate(&[ConversationTurn::user("q")], 0.5, &mut |c| seen.push(c.to_string()))
            .unwrap();

        assert_eq!(full, "BIS fees");
        assert_eq!(seen, vec!["BIS ", "fees"]);
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_scripted_sequence_then_repeat() {
        let model = ScriptedModel::new(vec![
            Ok(vec!["one".to_string()]),
            Err(ModelError::Http("down".to_string())),
        ]);

        assert_eq!(model.generate(&[], 0.5, &mut |_| {}).unwrap(), "one");
        assert!(model.generate(&[], 0.5, &mut |_| {}).is_err());
        assert!(model.generate(&[], 0.5, &mut |_| {}).is_err());
        assert_eq!(model.call_count(), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = ModelError::Status { provider: "Gemini".to_string(), status: 429 };
        assert_eq!(err.to_string(), "HTTP 429 from Gemini");
    }
}
