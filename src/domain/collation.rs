//! Locale-aware string ordering for display
//!
//! Approximates a root-locale collation without pulling in ICU data:
//! 1. base letters: NFD-decomposed, combining marks dropped, lowercased
//! 2. on a tie, accents: unaccented sorts before accented
//! 3. on a tie, lowercase sorts before uppercase at the first differing position
//! 4. on a tie, plain code-point order

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two display strings for sorting.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary(a, b)
        .then_with(|| secondary(a, b))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn primary(a: &str, b: &str) -> Ordering {
    let base = |s: &str| {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect::<Vec<_>>()
    };
    base(a).cmp(&base(b))
}

fn secondary(a: &str, b: &str) -> Ordering {
    let marks = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<_>>();
    marks(a).cmp(&marks(b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    let a = a.nfd().map(char::is_uppercase);
    let b = b.nfd().map(char::is_uppercase);
    a.cmp(b)
}
