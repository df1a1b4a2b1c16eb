//! Tests for cache.rs

use faq_shared::cache::{CacheEntry, ResponseCache};

#[test]
fn test_first_registered_match_wins() {
    let mut cache = ResponseCache::new();
    cache.insert("مصاريف عربي انتظام", "3650");
    cache.insert("مصاريف عربي", "generic");

    assert_eq!(cache.lookup("مصاريف عربي انتظام لو سمحت"), Some("3650"));
}

#[test]
fn test_registration_order_not_specificity() {
    let mut cache = ResponseCache::new();
    cache.insert("مصاريف عربي", "generic");
    cache.insert("مصاريف عربي انتظام", "3650");

    // The shorter key was registered first and also matches
    assert_eq!(cache.lookup("مصاريف عربي انتظام لو سمحت"), Some("generic"));
}

#[test]
fn test_question_inside_key_matches() {
    let mut cache = ResponseCache::new();
    cache.insert("where is the campus located", "Helwan");

    assert_eq!(cache.lookup("  Campus Located "), Some("Helwan"));
}

#[test]
fn test_no_match_is_none() {
    let cache = ResponseCache::builtin();
    assert_eq!(cache.lookup("What are the BIS fees?"), None);
}

#[test]
fn test_empty_question_hits_first_entry() {
    let mut cache = ResponseCache::new();
    cache.insert("first", "1");
    cache.insert("second", "2");

    assert_eq!(cache.lookup("   "), Some("1"));
    assert_eq!(ResponseCache::new().lookup(""), None);
}

#[test]
fn test_builtin_fee_answers() {
    let cache = ResponseCache::builtin();

    let answer = cache.lookup("مصاريف عربي انتساب كام؟").unwrap();
    assert!(answer.contains("4,120"));

    let answer = cache.lookup("مصاريف عربي").unwrap();
    assert!(answer.contains("3,650"));
}

#[test]
fn test_from_entries_preserves_order() {
    let cache = ResponseCache::from_entries(vec![
        CacheEntry { question: "Fees".to_string(), answer: "a".to_string() },
        CacheEntry { question: "fees bis".to_string(), answer: "b".to_string() },
    ]);

    assert_eq!(cache.entries()[0].question, "fees");
    assert_eq!(cache.lookup("fees bis please"), Some("a"));
}
