//! Tests for validator.rs

use faq_shared::rules::RuleSet;
use faq_shared::validator::{ValidationIssue, Validator};

const KNOWLEDGE: &str = "Arabic system fees (regular): 3650 EGP per year.\n\
Arabic system fees (affiliation): 4120 EGP per year.\n\
BIS program located in Zamalek.";

#[test]
fn test_clean_answer_is_valid() {
    let v = Validator::builtin();
    let verdict = v.validate("Regular Arabic system fees are 3650 EGP per year.", KNOWLEDGE);

    assert!(verdict.is_valid);
    assert!(verdict.issues.is_empty());
    assert_eq!(verdict.score, 100);
}

#[test]
fn test_unknown_number_is_flagged() {
    let v = Validator::builtin();
    let verdict = v.validate("The fees are 4120 EGP.", "Fees: 3650 EGP.");

    assert!(!verdict.is_valid);
    assert!(verdict
        .issues
        .contains(&ValidationIssue::UnsupportedNumber { number: "4120".to_string() }));
}

#[test]
fn test_short_numbers_are_exempt() {
    let v = Validator::builtin();
    let verdict = v.validate("There are 3 programs and 12 departments.", "Nothing numeric.");
    assert!(verdict.is_valid);
}

#[test]
fn test_number_inside_longer_knowledge_number_passes() {
    // "365" occurs inside "3650" in the knowledge document
    let v = Validator::builtin();
    let verdict = v.validate("About 365 students.", "Fees: 3650 EGP.");
    assert!(verdict.is_valid);
}

#[test]
fn test_each_occurrence_reported() {
    let v = Validator::builtin();
    let verdict = v.validate("Call 555 or 555.", "No numbers here.");
    assert_eq!(verdict.issues.len(), 2);
    assert_eq!(verdict.score, 60);
}

#[test]
fn test_vague_language_ignores_knowledge() {
    let v = Validator::builtin();
    let knowledge = "Students usually apply in July.";
    let verdict = v.validate("Students usually apply early.", knowledge);

    assert!(!verdict.is_valid);
    assert!(verdict
        .issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::VagueLanguage { .. })));
    // The restricted-term check sees "usually" in the knowledge and stays quiet
    assert!(!verdict
        .issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::ExternalKnowledge { .. })));
}

#[test]
fn test_restricted_term_without_support() {
    let v = Validator::builtin();
    let verdict = v.validate("Unlike Cairo University, fees here are low.", KNOWLEDGE);

    assert_eq!(
        verdict.issues,
        vec![ValidationIssue::ExternalKnowledge { term: "Cairo University".to_string() }]
    );
    assert_eq!(verdict.score, 80);
}

#[test]
fn test_restricted_term_supported_by_knowledge() {
    let v = Validator::builtin();
    let knowledge = "Transfers from cairo university are accepted.";
    let verdict = v.validate("Transfers from Cairo University are accepted.", knowledge);
    assert!(verdict.is_valid);
}

#[test]
fn test_checks_accumulate() {
    let v = Validator::builtin();
    let verdict = v.validate("Typically, like Ain Shams, fees are 9999.", KNOWLEDGE);

    // restricted "Ain Shams" + restricted "typically" + vague pattern + number
    assert_eq!(verdict.issues.len(), 4);
    assert_eq!(verdict.score, 20);
    assert_eq!(
        verdict.messages()[0],
        "Using external knowledge: 'Ain Shams'"
    );
}

#[test]
fn test_arabic_vague_language() {
    let v = Validator::builtin();
    let verdict = v.validate("بشكل عام المصاريف قليلة", KNOWLEDGE);
    assert_eq!(
        verdict.issues,
        vec![ValidationIssue::VagueLanguage {
            pattern: "بشكل عام|in general|commonly|often".to_string()
        }]
    );
}

#[test]
fn test_empty_response_is_valid() {
    let v = Validator::builtin();
    let verdict = v.validate("", KNOWLEDGE);
    assert!(verdict.is_valid);
    assert_eq!(verdict.score, 100);
}

#[test]
fn test_validate_is_idempotent() {
    let v = Validator::builtin();
    let response = "Usually fees are 4120 at Alexandria University.";
    assert_eq!(v.validate(response, "fees 3650"), v.validate(response, "fees 3650"));
}

#[test]
fn test_custom_vague_patterns() {
    let rules = RuleSet {
        vague_patterns: vec![r"\bprobably\b".to_string()],
        restricted_terms: vec![],
        ..RuleSet::builtin()
    };
    let v = Validator::new(&rules).unwrap();

    assert!(v.validate("Usually open.", "").is_valid);
    assert!(!v.validate("PROBABLY open.", "").is_valid);
}
