// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic password strength scoring and validation.
//!
//! Scoring is monotonic: adding length or a missing character class never
//! lowers the score. Validation is independent of the score and produces
//! one actionable suggestion per deficiency, in check order. Suggestions
//! describe the password's shape, never its content.

use keywarden_core::StrengthReport;

/// Upper bound on [`score`]: four length thresholds, four classes, and the
/// all-classes bonus.
pub const MAX_SCORE: u8 = 10;

/// Length thresholds each worth one point.
const LENGTH_THRESHOLDS: [usize; 4] = [8, 12, 16, 20];

/// Low-entropy substrings flagged by validation, matched case-insensitively.
const COMMON_SEQUENCES: &[&str] = &[
    "0123", "1234", "2345", "3456", "4567", "5678", "6789", "abcd", "bcde", "cdef", "qwerty",
    "asdf", "password", "letmein", "1111", "0000",
];

struct ClassPresence {
    lowercase: bool,
    uppercase: bool,
    digit: bool,
    symbol: bool,
}

fn class_presence(password: &str) -> ClassPresence {
    ClassPresence {
        lowercase: password.chars().any(|c| c.is_lowercase()),
        uppercase: password.chars().any(|c| c.is_uppercase()),
        digit: password.chars().any(|c| c.is_ascii_digit()),
        symbol: password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    }
}

/// Score a password on a 0..=10 heuristic scale.
pub fn score(password: &str) -> u8 {
    let mut points = 0u8;

    let length = password.chars().count();
    for threshold in LENGTH_THRESHOLDS {
        if length >= threshold {
            points += 1;
        }
    }

    let classes = class_presence(password);
    for present in [
        classes.lowercase,
        classes.uppercase,
        classes.digit,
        classes.symbol,
    ] {
        if present {
            points += 1;
        }
    }
    if classes.lowercase && classes.uppercase && classes.digit && classes.symbol {
        points += 2;
    }

    points.min(MAX_SCORE)
}

/// Validate a password, reporting every deficiency found.
///
/// Checks, in order: missing lowercase, missing uppercase, missing digits,
/// missing symbols, a run of three or more identical characters, and
/// membership of any common low-entropy sequence.
pub fn validate(password: &str) -> StrengthReport {
    let mut suggestions = Vec::new();

    let classes = class_presence(password);
    if !classes.lowercase {
        suggestions.push("Add lowercase letters".to_string());
    }
    if !classes.uppercase {
        suggestions.push("Add uppercase letters".to_string());
    }
    if !classes.digit {
        suggestions.push("Add digits".to_string());
    }
    if !classes.symbol {
        suggestions.push("Add symbols".to_string());
    }
    if has_repeated_run(password) {
        suggestions
            .push("Avoid repeating the same character three or more times in a row".to_string());
    }
    if let Some(sequence) = find_common_sequence(password) {
        suggestions.push(format!("Avoid common sequences like \"{sequence}\""));
    }

    StrengthReport {
        score: score(password),
        is_valid: suggestions.is_empty(),
        suggestions,
    }
}

/// Three or more identical characters in a row.
fn has_repeated_run(password: &str) -> bool {
    let mut run = 0usize;
    let mut previous = None;
    for c in password.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}

fn find_common_sequence(password: &str) -> Option<&'static str> {
    let lowered = password.to_lowercase();
    COMMON_SEQUENCES
        .iter()
        .find(|sequence| lowered.contains(**sequence))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_monotonic_in_length() {
        // Same class mix, three times the length.
        assert!(score("aB3!") < score("aB3!aB3!aB3!"));
    }

    #[test]
    fn score_rewards_each_character_class() {
        assert!(score("aaaaaaaa") < score("aaaaAAAA"));
        assert!(score("aaaaAAAA") < score("aaaAAA11"));
        assert!(score("aaaAAA11") < score("aaAA11!!"));
    }

    #[test]
    fn all_four_classes_earn_the_bonus() {
        // Seven chars: no length points. Four classes plus bonus.
        assert_eq!(score("aB3!xY7"), 6);
        // Three classes, no bonus.
        assert_eq!(score("aB3xyzw"), 3);
    }

    #[test]
    fn score_is_capped_at_max() {
        let long_strong = "aB3!xY7$qW9@zK5#mN1&";
        assert_eq!(score(long_strong), MAX_SCORE);
        assert_eq!(score(&long_strong.repeat(4)), MAX_SCORE);
    }

    #[test]
    fn empty_password_scores_zero() {
        assert_eq!(score(""), 0);
    }

    #[test]
    fn validate_flags_every_deficiency_of_repeated_lowercase() {
        let report = validate("aaaaaaaa");
        assert!(!report.is_valid);
        assert_eq!(
            report.suggestions,
            vec![
                "Add uppercase letters",
                "Add digits",
                "Add symbols",
                "Avoid repeating the same character three or more times in a row",
            ]
        );
    }

    #[test]
    fn validate_flags_common_sequences() {
        let report = validate("Password1234!");
        assert!(!report.is_valid);
        assert!(report
            .suggestions
            .iter()
            .any(|s| s.contains("common sequences")));
    }

    #[test]
    fn validate_accepts_a_strong_password() {
        let report = validate("vN3#qR8$tK5!wZ7%jQ2&");
        assert!(report.is_valid, "suggestions: {:?}", report.suggestions);
        assert!(report.suggestions.is_empty());
        assert_eq!(report.score, MAX_SCORE);
    }

    #[test]
    fn repeated_run_detection_requires_three_in_a_row() {
        assert!(!has_repeated_run("aabbcc"));
        assert!(has_repeated_run("aabbbcc"));
        assert!(has_repeated_run("xxx"));
        assert!(!has_repeated_run("xx"));
    }

    #[test]
    fn sequence_matching_is_case_insensitive() {
        assert_eq!(find_common_sequence("QWERTYuiop"), Some("qwerty"));
        assert_eq!(find_common_sequence("zk5#mn1&"), None);
    }
}
