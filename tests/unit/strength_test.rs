//! Unit tests for the strength rubric through the public API.

use lockkey::generators::evaluate;
use lockkey::generators::strength::{
    ADD_DIGIT, ADD_LOWERCASE, ADD_SYMBOL, ADD_UPPERCASE, AVOID_SEQUENCES, TOO_SHORT,
};
use rstest::rstest;

#[rstest]
#[case::sequences_and_missing_classes("abc12345", 2, &[ADD_UPPERCASE, ADD_SYMBOL, AVOID_SEQUENCES])]
#[case::eight_chars_all_classes("Pxcdwf1!", 5, &[])]
#[case::sequence_costs_a_point("Abcdef1!", 4, &[AVOID_SEQUENCES])]
#[case::long_and_varied("Tr0ub4dor&3x", 6, &[])]
#[case::lowercase_only("password", 2, &[ADD_UPPERCASE, ADD_DIGIT, ADD_SYMBOL])]
#[case::keyboard_row("QWERTYUIOP", 1, &[ADD_LOWERCASE, ADD_DIGIT, ADD_SYMBOL, AVOID_SEQUENCES])]
#[case::short("ab", 1, &[TOO_SHORT, ADD_UPPERCASE, ADD_DIGIT, ADD_SYMBOL])]
#[case::spaces("        ", 1, &[ADD_UPPERCASE, ADD_LOWERCASE, ADD_DIGIT, ADD_SYMBOL])]
#[case::clamped_at_zero("123", 0, &[TOO_SHORT, ADD_UPPERCASE, ADD_LOWERCASE, ADD_SYMBOL, AVOID_SEQUENCES])]
fn rubric(#[case] password: &str, #[case] score: u32, #[case] feedback: &[&str]) {
    let report = evaluate(password);

    assert_eq!(report.score, score, "score for {:?}", password);
    assert_eq!(report.valid, score >= 4);
    assert_eq!(report.feedback, feedback);
}

#[rstest]
#[case("xxABCxx1!")]
#[case("Asdfgh12!")]
#[case("pass-ZXC-9")]
fn sequences_match_any_case(#[case] password: &str) {
    assert!(evaluate(password)
        .feedback
        .iter()
        .any(|f| f == AVOID_SEQUENCES));
}

#[test]
fn length_counts_characters_not_bytes() {
    // 8 characters, 16 bytes
    let report = evaluate("ÄÖÜäöüßé");
    assert!(!report.feedback.iter().any(|f| f == TOO_SHORT));
}

#[test]
fn report_serializes_for_json_output() {
    let json = serde_json::to_value(evaluate("Pxcdwf1!")).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["score"], 5);
    assert!(json["feedback"].as_array().unwrap().is_empty());
}
