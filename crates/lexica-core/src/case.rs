// Word-level case detection and folding.

use crate::character::{fold_char, simple_lower, simple_upper};

/// Classification of character casing within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStyle {
    /// No letters found in the word (only digits, punctuation, etc.).
    NoLetters,
    /// All letters are lowercase: "walk".
    AllLower,
    /// First letter is uppercase, rest are lowercase: "Walk".
    FirstUpper,
    /// All letters are uppercase: "WALK".
    AllUpper,
    /// Mixed case that does not fit other patterns: "waLk".
    Mixed,
}

/// Detect the case pattern of a word.
///
/// Non-letter characters are ignored when determining the pattern.
pub fn detect_case(word: &str) -> CaseStyle {
    let mut first_upper = false;
    let mut rest_lower = true;
    let mut all_upper = true;
    let mut any_letter = false;

    for (i, c) in word.chars().enumerate() {
        if !c.is_alphabetic() {
            continue;
        }
        any_letter = true;
        let upper = c != simple_lower(c);
        let lower = c != simple_upper(c);
        if i == 0 {
            first_upper = upper;
        } else if upper {
            rest_lower = false;
        }
        if lower {
            all_upper = false;
        }
    }

    if !any_letter {
        return CaseStyle::NoLetters;
    }
    if all_upper {
        return CaseStyle::AllUpper;
    }
    if !rest_lower {
        return CaseStyle::Mixed;
    }
    if first_upper {
        CaseStyle::FirstUpper
    } else {
        CaseStyle::AllLower
    }
}

/// Lowercase every character of a word.
pub fn lower_word(word: &str) -> String {
    word.chars().map(simple_lower).collect()
}

/// Lowercase and accent-strip every character of a word.
pub fn fold_word(word: &str) -> String {
    word.chars().map(fold_char).collect()
}

/// `true` when the word is already its own folded form.
pub fn is_folded(word: &str) -> bool {
    word.chars().all(|c| fold_char(c) == c)
}

/// `true` when the word contains at least one uppercase letter.
pub fn has_upper(word: &str) -> bool {
    word.chars().any(|c| simple_lower(c) != c)
}
