//! Post-response validation - flags answers that lean on outside knowledge.
//!
//! Three independent checks run on every answer and all issues accumulate:
//! 1. Restricted terms (other universities, hedging phrases) present in the
//!    answer but absent from the knowledge document
//! 2. Vague/generalizing language, flagged wherever it appears - this check
//!    does not consult the knowledge document
//! 3. Numbers longer than two digits that do not occur inside any digit run
//!    of the knowledge document

use crate::error::RuleError;
use crate::fallback;
use crate::rules::{compile_patterns, lowercase_terms, RuleSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Maximal runs of decimal digits (any script)
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Numbers at or below this many digits are never flagged
const MAX_EXEMPT_DIGITS: usize = 2;

/// Points deducted from the score per issue
const PENALTY_PER_ISSUE: u32 = 20;

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Restricted term used without support in the knowledge document
    ExternalKnowledge { term: String },
    /// Generalizing language
    VagueLanguage { pattern: String },
    /// Number not found in the knowledge document
    UnsupportedNumber { number: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::ExternalKnowledge { term } => {
                write!(f, "Using external knowledge: '{}'", term)
            }
            ValidationIssue::VagueLanguage { pattern } => {
                write!(f, "Using vague/general language: {}", pattern)
            }
            ValidationIssue::UnsupportedNumber { number } => {
                write!(f, "Using number not in college info: {}", number)
            }
        }
    }
}

/// Outcome of validating one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// 100 minus 20 per issue, floored at 0. Informational only.
    pub score: u8,
}

impl ValidationVerdict {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let penalty = (issues.len() as u32).saturating_mul(PENALTY_PER_ISSUE);
        let score = 100u32.saturating_sub(penalty) as u8;
        Self {
            is_valid: issues.is_empty(),
            issues,
            score,
        }
    }

    /// Issue descriptions, in detection order
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}

/// Compiled answer validator
#[derive(Debug, Clone)]
pub struct Validator {
    /// (original term, lowercased term)
    restricted_terms: Vec<(String, String)>,
    vague_patterns: Vec<(String, Regex)>,
}

impl Validator {
    pub fn new(rules: &RuleSet) -> Result<Self, RuleError> {
        let lowered = lowercase_terms(&rules.restricted_terms);
        let restricted_terms = rules
            .restricted_terms
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .zip(lowered)
            .collect();

        Ok(Self {
            restricted_terms,
            vague_patterns: compile_patterns("vague", &rules.vague_patterns)?,
        })
    }

    /// Validator over the built-in tables
    pub fn builtin() -> Self {
        Self::new(&RuleSet::builtin()).expect("built-in rule patterns compile")
    }

    /// Run all checks. Never fails; empty input yields a clean verdict.
    pub fn validate(&self, response: &str, knowledge: &str) -> ValidationVerdict {
        let mut issues = Vec::new();

        issues.extend(self.check_restricted_terms(response, knowledge));
        issues.extend(self.check_vague_language(response));
        issues.extend(check_numbers(response, knowledge));

        ValidationVerdict::from_issues(issues)
    }

    /// The response if it validates, otherwise the missing-information
    /// reply in the response's language
    pub fn clean(&self, response: &str, knowledge: &str) -> String {
        if self.validate(response, knowledge).is_valid {
            response.to_string()
        } else {
            fallback::compose_for(response).to_string()
        }
    }

    fn check_restricted_terms(&self, response: &str, knowledge: &str) -> Vec<ValidationIssue> {
        let response_lower = response.to_lowercase();
        let knowledge_lower = knowledge.to_lowercase();

        self.restricted_terms
            .iter()
            .filter(|(_, lower)| response_lower.contains(lower.as_str()))
            .filter(|(_, lower)| !knowledge_lower.contains(lower.as_str()))
            .map(|(term, _)| ValidationIssue::ExternalKnowledge { term: term.clone() })
            .collect()
    }

    fn check_vague_language(&self, response: &str) -> Vec<ValidationIssue> {
        self.vague_patterns
            .iter()
            .filter(|(_, re)| re.is_match(response))
            .map(|(pattern, _)| ValidationIssue::VagueLanguage { pattern: pattern.clone() })
            .collect()
    }
}

/// Every long digit run of the response that no knowledge digit run contains.
/// Each occurrence is reported, duplicates included.
fn check_numbers(response: &str, knowledge: &str) -> Vec<ValidationIssue> {
    let known: Vec<&str> = DIGIT_RUN.find_iter(knowledge).map(|m| m.as_str()).collect();

    DIGIT_RUN
        .find_iter(response)
        .map(|m| m.as_str())
        .filter(|num| num.chars().count() > MAX_EXEMPT_DIGITS)
        .filter(|num| !known.iter().any(|k| k.contains(num)))
        .map(|num| ValidationIssue::UnsupportedNumber { number: num.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display_text() {
        let issue = ValidationIssue::ExternalKnowledge { term: "Ain Shams".to_string() };
        assert_eq!(issue.to_string(), "Using external knowledge: 'Ain Shams'");

        let issue = ValidationIssue::UnsupportedNumber { number: "4120".to_string() };
        assert_eq!(issue.to_string(), "Using number not in college info: 4120");
    }

    #[test]
    fn test_score_floors_at_zero() {
        let issues = (0..7)
            .map(|i| ValidationIssue::UnsupportedNumber { number: format!("{}00", i) })
            .collect();
        let verdict = ValidationVerdict::from_issues(issues);
        assert_eq!(verdict.score, 0);
        assert!(!verdict.is_valid);
    }

    #[test]
    fn test_number_runs_are_maximal() {
        // "36500" is one run, so "3650" inside it is found by containment
        let issues = check_numbers("fees are 3650", "total 36500 EGP");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_arabic_indic_digits_are_runs() {
        let issues = check_numbers("المصاريف ٤١٢٠ جنيه", "المصاريف ٣٦٥٠ جنيه");
        assert_eq!(
            issues,
            vec![ValidationIssue::UnsupportedNumber { number: "٤١٢٠".to_string() }]
        );
    }

    #[test]
    fn test_clean_passes_valid_response_through() {
        let v = Validator::builtin();
        assert_eq!(v.clean("BIS fees are 3650", "BIS: 3650"), "BIS fees are 3650");
        assert_eq!(
            v.clean("BIS fees are usually 9999", "BIS: 3650"),
            fallback::MISSING_INFO_ENGLISH
        );
    }
}
