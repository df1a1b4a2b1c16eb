//! Hosted model client.
//!
//! Streams completions from OpenAI (chat completions API) or Gemini
//! (`streamGenerateContent`) over server-sent events. Each `data:` line
//! carries one JSON chunk; text deltas are handed to the caller as they
//! arrive.

use crate::config::{ModelSettings, Provider};
use faq_shared::conversation::{ConversationTurn, Role};
use faq_shared::model::{ChatModel, ModelError};
use std::io::{BufRead, BufReader};
use std::time::Duration;

/// Environment variables tried for the OpenAI key, in order
pub const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "OPENAI_KEY", "API_KEY", "OPENAI_API"];

/// Environment variables tried for the Gemini key
pub const GEMINI_KEY_VARS: &[&str] = &["GOOGLE_API_KEY"];

/// Values shipped in sample env files; treated as unset
const PLACEHOLDER_KEYS: &[&str] = &["your_google_api_key_here", "your_openai_api_key_here"];

/// Pick the first usable key from `lookup`
pub fn resolve_api_key(
    provider: Provider,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ModelError> {
    let vars = match provider {
        Provider::OpenAi => OPENAI_KEY_VARS,
        Provider::Gemini => GEMINI_KEY_VARS,
    };

    vars.iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && !PLACEHOLDER_KEYS.contains(&value.as_str()))
        .ok_or_else(|| ModelError::MissingApiKey(vars.join(", ")))
}

/// Payload of an SSE `data:` line. `None` for comments, other fields,
/// blank lines and the `[DONE]` sentinel.
pub fn parse_sse_line(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        None
    } else {
        Some(data)
    }
}

/// Text delta of one OpenAI stream chunk
pub fn openai_delta(chunk: &serde_json::Value) -> Option<String> {
    chunk
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("delta"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Concatenated part texts of one Gemini stream chunk
pub fn gemini_text(chunk: &serde_json::Value) -> Option<String> {
    let parts = chunk
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    Some(text)
}

/// Gemini takes a single prompt: one labelled block per turn
pub fn render_gemini_prompt(messages: &[ConversationTurn]) -> String {
    messages
        .iter()
        .map(|turn| match turn.role {
            Role::System => format!("Instructions: {}", turn.text),
            Role::User => format!("User: {}", turn.text),
            Role::Assistant => format!("Assistant: {}", turn.text),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Request body for the OpenAI chat completions API
pub fn openai_request_body(
    model: &str,
    messages: &[ConversationTurn],
    temperature: f32,
) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .map(|turn| serde_json::json!({"role": turn.role.as_str(), "content": turn.text}))
        .collect();

    serde_json::json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
        "stream": true,
    })
}

/// Request body for Gemini `streamGenerateContent`
pub fn gemini_request_body(messages: &[ConversationTurn], temperature: f32) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {"role": "user", "parts": [{"text": render_gemini_prompt(messages)}]}
        ],
        "generationConfig": {"temperature": temperature},
    })
}

/// Streaming HTTP client for the configured provider
pub struct HttpChatModel {
    provider: Provider,
    model: String,
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl HttpChatModel {
    /// Build a client, reading the API key from the environment
    pub fn from_settings(settings: &ModelSettings) -> Result<Self, ModelError> {
        let api_key = resolve_api_key(settings.provider, |var| std::env::var(var).ok())?;
        Self::with_api_key(settings, api_key)
    }

    pub fn with_api_key(settings: &ModelSettings, api_key: String) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ModelError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            provider: settings.provider,
            model: settings.effective_model().to_string(),
            endpoint: settings.effective_endpoint().to_string(),
            api_key,
            timeout_secs: settings.timeout_secs,
            client,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response, ModelError> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(self.timeout_secs)
            } else {
                ModelError::Http(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(ModelError::Status {
                provider: self.provider.display_name().to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// Read SSE lines until the stream ends, extracting text with `extract`
    fn read_stream(
        &self,
        response: reqwest::blocking::Response,
        extract: fn(&serde_json::Value) -> Option<String>,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError> {
        let mut full = String::new();
        let reader = BufReader::new(response);

        for line in reader.lines() {
            let line = line.map_err(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    ModelError::Timeout(self.timeout_secs)
                } else {
                    ModelError::Http(format!("Stream interrupted: {}", e))
                }
            })?;

            let Some(data) = parse_sse_line(&line) else {
                continue;
            };
            let chunk: serde_json::Value = serde_json::from_str(data)
                .map_err(|e| ModelError::InvalidResponse(format!("Bad stream chunk: {}", e)))?;

            if let Some(text) = extract(&chunk) {
                if !text.is_empty() {
                    on_chunk(&text);
                    full.push_str(&text);
                }
            }
        }

        Ok(full)
    }

    fn generate_openai(
        &self,
        messages: &[ConversationTurn],
        temperature: f32,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let body = openai_request_body(&self.model, messages, temperature);
        let request = self.client.post(&url).bearer_auth(&self.api_key).json(&body);

        let response = self.send(request)?;
        self.read_stream(response, openai_delta, on_chunk)
    }

    fn generate_gemini(
        &self,
        messages: &[ConversationTurn],
        temperature: f32,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.endpoint, self.model
        );
        let body = gemini_request_body(messages, temperature);
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response = self.send(request)?;
        self.read_stream(response, gemini_text, on_chunk)
    }
}

impl ChatModel for HttpChatModel {
    fn generate(
        &self,
        messages: &[ConversationTurn],
        temperature: f32,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String, ModelError> {
        tracing::debug!(
            provider = self.provider.as_str(),
            model = %self.model,
            messages = messages.len(),
            "sending completion request"
        );

        match self.provider {
            Provider::OpenAi => self.generate_openai(messages, temperature, on_chunk),
            Provider::Gemini => self.generate_gemini(messages, temperature, on_chunk),
        }
    }
}
