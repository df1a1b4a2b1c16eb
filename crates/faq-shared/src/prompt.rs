//! System instruction rendering and message-window assembly.

use crate::conversation::ConversationTurn;
use crate::fallback;
use chrono::NaiveDate;

/// Institution the assistant speaks for when none is configured
pub const DEFAULT_INSTITUTION: &str =
    "the Faculty of Commerce and Business Administration at Helwan University";

/// Builder for the bounding system instruction
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    institution: String,
    knowledge: String,
    today: Option<NaiveDate>,
}

impl SystemPrompt {
    pub fn new(knowledge: impl Into<String>) -> Self {
        Self {
            institution: DEFAULT_INSTITUTION.to_string(),
            knowledge: knowledge.into(),
            today: None,
        }
    }

    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    /// Mention the current date so relative questions ("is it open today?") resolve
    pub fn today(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "You are an intelligent assistant for {}. Your ONLY job is to provide information \
             about this specific college based on the provided data.\n\n",
            self.institution
        ));

        if let Some(date) = self.today {
            out.push_str(&format!(
                "TODAY: {} ({})\n\n",
                date.format("%B %d, %Y"),
                date.format("%A")
            ));
        }

        out.push_str("College Information:\n");
        out.push_str(&self.knowledge);
        out.push_str("\n\nCRITICAL INSTRUCTIONS - FOLLOW STRICTLY:\n");
        out.push_str(
            "1. ONLY answer questions using the information provided above. DO NOT use any \
             external knowledge about other universities or general information.\n",
        );
        out.push_str(
            "2. If the user's question is in Arabic, reply in Egyptian Arabic. If in English, \
             reply in English.\n",
        );
        out.push_str(&format!(
            "3. If a question is NOT answered in the provided college information, respond \
             EXACTLY with: \"{}\" (in Arabic) or \"{}\" (in English).\n",
            fallback::compose(true),
            fallback::compose(false)
        ));
        out.push_str("4. DO NOT make up information, guess, or provide general knowledge about universities.\n");
        out.push_str("5. DO NOT provide information about other universities or colleges.\n");
        out.push_str("6. Be friendly but stick ONLY to the provided information.\n");
        out.push_str(
            "7. If asked about topics outside the college scope, politely redirect them back to \
             college-related questions.\n\n",
        );
        out.push_str("Remember: Your knowledge is LIMITED to the college information provided above. Nothing else.");

        out
    }
}

/// Prepend one system turn and keep the last `window` history turns,
/// oldest first. History is truncated only, never merged or summarized.
pub fn assemble(
    system_instructions: &str,
    history: &[ConversationTurn],
    window: usize,
) -> Vec<ConversationTurn> {
    let start = history.len().saturating_sub(window);
    let mut messages = Vec::with_capacity(1 + history.len() - start);
    messages.push(ConversationTurn::system(system_instructions));
    messages.extend_from_slice(&history[start..]);
    messages
}
