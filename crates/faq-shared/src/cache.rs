//! Canned answers for frequent questions.
//!
//! Matching is deliberately loose: a key hits when it is contained in the
//! normalized question or the question is contained in the key. Entries are
//! tried in registration order and the first hit wins, so registration order
//! is part of the behavior.

use serde::{Deserialize, Serialize};

/// One registered question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub question: String,
    pub answer: String,
}

/// Insertion-ordered canned-answer table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCache {
    entries: Vec<CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fee and location answers for the Faculty of Commerce
    pub fn builtin() -> Self {
        let mut cache = Self::new();
        cache.insert(
            "مصاريف عربي انتظام",
            "مصاريف النظام العربي انتظام: **3,650 جنيه سنوياً** 📚",
        );
        cache.insert(
            "مصاريف عربي انتساب",
            "مصاريف النظام العربي انتساب: **4,120 جنيه سنوياً** 📚",
        );
        cache.insert(
            "مصاريف عربي",
            "مصاريف النظام العربي:\n• انتظام: **3,650 جنيه سنوياً**\n• انتساب: **4,120 جنيه سنوياً** 📚",
        );
        cache.insert(
            "موقع الكلية",
            "الكلية في موقعين:\n• **النظام العربي والإنجليزي**: حلوان\n• **BIS و FMI و SBS**: الزمالك 📍",
        );
        cache.insert(
            "فين الكلية",
            "الكلية في موقعين:\n• **النظام العربي والإنجليزي**: حلوان\n• **BIS و FMI و SBS**: الزمالك 📍",
        );
        cache
    }

    /// Build from configured entries, preserving their order
    pub fn from_entries(entries: impl IntoIterator<Item = CacheEntry>) -> Self {
        let mut cache = Self::new();
        for entry in entries {
            cache.insert(entry.question, entry.answer);
        }
        cache
    }

    /// Register an answer. The key is trimmed and lowercased; a key that is
    /// already registered keeps its position and gets the new answer.
    pub fn insert(&mut self, question: impl AsRef<str>, answer: impl Into<String>) {
        let key = normalize(question.as_ref());
        let answer = answer.into();
        match self.entries.iter_mut().find(|e| e.question == key) {
            Some(existing) => existing.answer = answer,
            None => self.entries.push(CacheEntry { question: key, answer }),
        }
    }

    /// First registered answer whose key matches the question
    pub fn lookup(&self, question: &str) -> Option<&str> {
        let normalized = normalize(question);
        self.entries
            .iter()
            .find(|e| normalized.contains(e.question.as_str()) || e.question.contains(normalized.as_str()))
            .map(|e| e.answer.as_str())
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
