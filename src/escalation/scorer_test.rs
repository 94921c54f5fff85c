use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================================
// detect_human_request
// =============================================================================

#[test]
fn human_request_matches_case_insensitively() {
    assert!(detect_human_request("Can I SPEAK TO A HUMAN please"));
    assert!(detect_human_request("i want a real person"));
    assert!(detect_human_request("Please connect me with billing"));
}

#[test]
fn human_request_ignores_unrelated_text() {
    assert!(!detect_human_request("What does the premium plan cost?"));
    assert!(!detect_human_request(""));
}

#[test]
fn classifiers_are_pure() {
    let text = "talk to a representative about a refund";
    for _ in 0..3 {
        assert!(detect_human_request(text));
        assert!(detect_complex_issue(text));
    }
}

// =============================================================================
// detect_complex_issue
// =============================================================================

#[test]
fn complex_issue_matches_sensitive_topics() {
    assert!(detect_complex_issue("I need to cancel subscription and get a refund"));
    assert!(detect_complex_issue("My router is BROKEN"));
    assert!(detect_complex_issue("this is a legal matter"));
    assert!(!detect_complex_issue("How fast is fiber internet?"));
}

// =============================================================================
// analyze_sentiment
// =============================================================================

#[test]
fn neutral_text_scores_zero() {
    assert_eq!(analyze_sentiment("Thanks, that helps."), Sentiment::default());
}

#[test]
fn each_keyword_adds_point_three() {
    let s = analyze_sentiment("I'm confused and not sure");
    assert!(approx(s.confusion, 0.6));
    assert!(approx(s.frustration, 0.0));

    let s = analyze_sentiment("so annoyed");
    assert!(approx(s.frustration, 0.3));
}

#[test]
fn repeated_keyword_counts_once() {
    let s = analyze_sentiment("confused confused confused");
    assert!(approx(s.confusion, 0.3));
}

#[test]
fn question_marks_add_confusion_only_past_two() {
    assert!(approx(analyze_sentiment("what??").confusion, 0.0));
    assert!(approx(analyze_sentiment("what???").confusion, 0.2));
}

#[test]
fn exclamations_add_frustration_only_past_one() {
    assert!(approx(analyze_sentiment("hello!").frustration, 0.0));
    assert!(approx(analyze_sentiment("hello!!").frustration, 0.2));
}

#[test]
fn frustration_saturates_at_one() {
    let s = analyze_sentiment("Frustrated, annoyed, unhelpful, useless, a waste of time!!!");
    assert!(approx(s.frustration, 1.0));
    assert!(s.frustration <= 1.0);
}

#[test]
fn confusion_saturates_at_one() {
    let s = analyze_sentiment("I don't understand, confused, unclear, what do you mean, not sure???");
    assert!(approx(s.confusion, 1.0));
}

#[test]
fn two_frustration_keywords_sit_exactly_at_point_six() {
    let s = analyze_sentiment("annoyed and frustrated");
    assert!(approx(s.frustration, 0.6));
}
