//! Keyword classifiers for a single user utterance.
//!
//! All matching is case-insensitive substring search. Each phrase counts at
//! most once per utterance, however often it appears.

use serde::Serialize;

/// Phrases asking to reach a human.
pub const HUMAN_REQUEST_KEYWORDS: &[&str] = &[
    "speak to a human",
    "talk to a person",
    "real person",
    "human agent",
    "speak to someone",
    "talk to a representative",
    "speak to an agent",
    "connect me with",
];

/// Legally, financially or technically sensitive topics.
pub const COMPLEX_ISSUE_KEYWORDS: &[&str] = &[
    "contract termination",
    "legal",
    "complaint",
    "refund",
    "cancel subscription",
    "technical problem",
    "not working",
    "broken",
    "dispute",
];

pub const CONFUSION_KEYWORDS: &[&str] = &["don't understand", "confused", "unclear", "what do you mean", "not sure"];

pub const FRUSTRATION_KEYWORDS: &[&str] =
    &["frustrated", "annoyed", "unhelpful", "useless", "waste of time", "not working"];

const KEYWORD_WEIGHT: f64 = 0.3;
const PUNCTUATION_WEIGHT: f64 = 0.2;

/// More than this many `?` reads as confusion.
const QUESTION_MARK_LIMIT: usize = 2;
/// More than this many `!` reads as frustration.
const EXCLAMATION_LIMIT: usize = 1;

/// Per-utterance sentiment, both components in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sentiment {
    pub confusion: f64,
    pub frustration: f64,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn keyword_score(lower: &str, keywords: &[&str]) -> f64 {
    keywords
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|_| KEYWORD_WEIGHT)
        .sum()
}

/// True if the user is explicitly asking for a human.
#[must_use]
pub fn detect_human_request(text: &str) -> bool {
    contains_any(text, HUMAN_REQUEST_KEYWORDS)
}

/// True if the utterance touches a topic the assistant should not handle alone.
#[must_use]
pub fn detect_complex_issue(text: &str) -> bool {
    contains_any(text, COMPLEX_ISSUE_KEYWORDS)
}

/// Additive keyword and punctuation scoring, saturated at 1.0.
#[must_use]
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();

    let mut confusion = keyword_score(&lower, CONFUSION_KEYWORDS);
    let mut frustration = keyword_score(&lower, FRUSTRATION_KEYWORDS);

    if lower.matches('?').count() > QUESTION_MARK_LIMIT {
        confusion += PUNCTUATION_WEIGHT;
    }
    if lower.matches('!').count() > EXCLAMATION_LIMIT {
        frustration += PUNCTUATION_WEIGHT;
    }

    Sentiment { confusion: confusion.min(1.0), frustration: frustration.min(1.0) }
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
