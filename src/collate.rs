//! Hebrew-locale string ordering.
//!
//! Every ordering decision in the crate (file listing, page tie-breaks,
//! unknown-topic ordering) goes through [`compare`], so the same pair of
//! strings always sorts the same way regardless of where it is compared.
//!
//! ## Levels
//!
//! The comparison follows the usual multi-level collation scheme:
//!
//! 1. **Primary**: base letters. Text is NFD-decomposed, combining marks
//!    (niqqud, Latin accents) are dropped, letters are lowercased and Hebrew
//!    final forms fold onto their regular forms (`ם` sorts as `מ`). Characters
//!    are ranked by class first: punctuation and spaces, then digits, then
//!    Hebrew, then Latin-range letters, then everything else. Hebrew script
//!    comes ahead of Latin as in the `he` locale, so `עמוד-1.html` lists
//!    before `rules.html`.
//! 2. **Secondary**: the sequence of combining marks, so `שלום` sorts just
//!    before its pointed spelling.
//! 3. **Tertiary**: case, lowercase first.
//!
//! Strings equal on all three levels fall back to code-point order, which
//! keeps the ordering total: `compare` only returns `Equal` for identical
//! strings.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Character class used as the leading component of a primary weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Separator,
    Digit,
    Hebrew,
    Latin,
    Other,
}

/// Collation key for one string, one vector per level.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    primary: Vec<(CharClass, char)>,
    secondary: Vec<char>,
    tertiary: Vec<bool>,
}

/// Compare two strings using Hebrew collation rules.
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(text: &str) -> CollationKey {
    let mut key = CollationKey {
        primary: Vec::with_capacity(text.len()),
        secondary: Vec::new(),
        tertiary: Vec::with_capacity(text.len()),
    };

    for c in text.nfd() {
        if is_combining_mark(c) {
            key.secondary.push(c);
            continue;
        }
        key.tertiary.push(c.is_uppercase());
        for lower in c.to_lowercase() {
            let base = fold_final_form(lower);
            key.primary.push((classify(base), base));
        }
    }

    key
}

/// Map Hebrew final letter forms onto their regular forms.
fn fold_final_form(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        _ => c,
    }
}

fn classify(c: char) -> CharClass {
    if ('\u{0590}'..='\u{05FF}').contains(&c) || ('\u{FB1D}'..='\u{FB4F}').contains(&c) {
        CharClass::Hebrew
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        if (c as u32) < 0x0590 {
            CharClass::Latin
        } else {
            CharClass::Other
        }
    } else {
        CharClass::Separator
    }
}
