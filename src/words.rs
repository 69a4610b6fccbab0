//! Input validation for keyword sets.

use ahash::AHashSet;

use crate::api::{FoldError, FoldOptions};

/// Characters reserved by the pattern dialect. Words may use anything else.
pub const METACHARACTERS: &[char] = &['\\', '(', ')', '?', ':', '|', '[', ']'];

/// Whether `ch` may appear in an input word.
#[inline]
pub fn is_word_char(ch: char) -> bool {
    !METACHARACTERS.contains(&ch)
}

/// Validates and normalizes the input word list.
///
/// Returns the words as owned strings in input order. Rejects an empty list,
/// words containing dialect metacharacters, and duplicates. With
/// `case_insensitive` set, words are upper-cased first, so two inputs that
/// collide after normalization count as duplicates.
pub(crate) fn validate<S: AsRef<str>>(
    words: &[S],
    opts: &FoldOptions,
) -> Result<Vec<String>, FoldError> {
    if words.is_empty() {
        return Err(FoldError::EmptyInput);
    }

    let mut out = Vec::with_capacity(words.len());
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(words.len());

    for word in words {
        let word = word.as_ref();
        let word = if opts.case_insensitive {
            word.to_uppercase()
        } else {
            word.to_owned()
        };

        if let Some(ch) = word.chars().find(|&c| !is_word_char(c)) {
            return Err(FoldError::InvalidCharacter { word, ch });
        }
        out.push(word);
    }

    for word in &out {
        if !seen.insert(word.as_str()) {
            return Err(FoldError::DuplicateWord(word.clone()));
        }
    }

    Ok(out)
}
