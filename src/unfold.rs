//! Inverse parser: expands a dialect-restricted fragment back into the
//! literal word set it matches.
//!
//! Used purely as a correctness oracle for the forward pipeline; the
//! recognized grammar is exactly what the renderer can emit (literal runs,
//! `x?`, character classes with ranges and `\d`, non-capturing groups, and
//! `|` alternation). Anything outside the dialect is rejected with a
//! structured error carrying the byte offset of the offending construct.
//!
//! Inside a class, `-` follows the usual literal/range rule: it is a range
//! operator only between a plain character and a following non-`]`
//! character, and a literal in first or last position (which is where the
//! renderer puts a standalone `-`).

use crate::api::{UnfoldError, UnfoldErrorKind};

/// Parses `pattern` and returns the matched word set, sorted and
/// deduplicated. The empty pattern unfolds to the set containing only the
/// empty word.
pub fn unfold(pattern: &str) -> Result<Vec<String>, UnfoldError> {
    let mut parser = Parser {
        chars: pattern.char_indices().collect(),
        pos: 0,
        end: pattern.len(),
    };

    let mut words = parser.alternation()?;
    if parser.peek().is_some() {
        // `alternation` only ever stops early on a closing parenthesis.
        return Err(parser.error_here(UnfoldErrorKind::UnbalancedParen));
    }

    words.sort_unstable();
    words.dedup();
    Ok(words)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(_, c)| c)
    }

    fn byte_pos(&self) -> usize {
        self.chars.get(self.pos).map_or(self.end, |&(b, _)| b)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error_here(&self, kind: UnfoldErrorKind) -> UnfoldError {
        UnfoldError {
            kind,
            position: self.byte_pos(),
        }
    }

    fn error_at(&self, kind: UnfoldErrorKind, position: usize) -> UnfoldError {
        UnfoldError { kind, position }
    }

    /// `sequence ('|' sequence)*`, stopping at `)` or end of input.
    fn alternation(&mut self) -> Result<Vec<String>, UnfoldError> {
        let mut words = self.sequence()?;
        while self.peek() == Some('|') {
            self.bump();
            words.extend(self.sequence()?);
        }
        Ok(words)
    }

    fn sequence(&mut self) -> Result<Vec<String>, UnfoldError> {
        let mut acc = vec![String::new()];
        while let Some(ch) = self.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            let alternatives = self.atom(ch)?;
            let mut next = Vec::with_capacity(acc.len() * alternatives.len());
            for prefix in &acc {
                for alt in &alternatives {
                    next.push(format!("{prefix}{alt}"));
                }
            }
            acc = next;
        }
        Ok(acc)
    }

    /// One atom with its optional `?` applied: the returned alternatives
    /// include the empty string when the atom is optional.
    fn atom(&mut self, ch: char) -> Result<Vec<String>, UnfoldError> {
        match ch {
            '(' => self.group(),
            '[' => self.class(),
            '\\' => self.escape(),
            '?' => Err(self.error_here(UnfoldErrorKind::DanglingQuantifier)),
            ']' | ':' => Err(self.error_here(UnfoldErrorKind::UnexpectedMetacharacter(ch))),
            _ => {
                self.bump();
                let mut words = vec![ch.to_string()];
                if self.consume_optional()? {
                    words.insert(0, String::new());
                }
                Ok(words)
            }
        }
    }

    /// Consumes a trailing `?` if present. A second `?` is the lazy marker
    /// and gets rejected.
    fn consume_optional(&mut self) -> Result<bool, UnfoldError> {
        if self.peek() != Some('?') {
            return Ok(false);
        }
        let qpos = self.byte_pos();
        self.bump();
        if self.peek() == Some('?') {
            return Err(self.error_at(UnfoldErrorKind::LazyQuantifier, qpos));
        }
        Ok(true)
    }

    fn group(&mut self) -> Result<Vec<String>, UnfoldError> {
        let open = self.byte_pos();
        self.bump();
        if !(self.peek() == Some('?') && self.peek_at(1) == Some(':')) {
            return Err(self.error_at(UnfoldErrorKind::CapturingGroup, open));
        }
        self.bump();
        self.bump();

        let mut words = self.alternation()?;
        if self.peek() != Some(')') {
            return Err(self.error_at(UnfoldErrorKind::UnclosedGroup, open));
        }
        self.bump();

        if self.consume_optional()? {
            words.insert(0, String::new());
        }
        Ok(words)
    }

    fn escape(&mut self) -> Result<Vec<String>, UnfoldError> {
        let start = self.byte_pos();
        self.bump();
        if self.peek() != Some('d') {
            return Err(self.error_at(UnfoldErrorKind::UnsupportedEscape, start));
        }
        self.bump();

        let mut words: Vec<String> = ('0'..='9').map(|d| d.to_string()).collect();
        if self.consume_optional()? {
            words.insert(0, String::new());
        }
        Ok(words)
    }

    fn class(&mut self) -> Result<Vec<String>, UnfoldError> {
        let open = self.byte_pos();
        self.bump();
        if self.peek() == Some('^') {
            return Err(self.error_here(UnfoldErrorKind::NegatedClass));
        }

        let mut members: Vec<char> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error_at(UnfoldErrorKind::UnclosedClass, open)),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let start = self.byte_pos();
                    self.bump();
                    if self.peek() != Some('d') {
                        return Err(self.error_at(UnfoldErrorKind::UnsupportedEscape, start));
                    }
                    self.bump();
                    members.extend('0'..='9');
                    // A `-` directly after the shorthand cannot start a
                    // range; it is a member on its own.
                    if self.peek() == Some('-') && self.peek_at(1) != Some(']') {
                        self.bump();
                        members.push('-');
                    }
                }
                Some(from) => {
                    let from_pos = self.byte_pos();
                    self.bump();
                    let is_range = self.peek() == Some('-')
                        && self.peek_at(1).is_some()
                        && self.peek_at(1) != Some(']');
                    if is_range {
                        self.bump();
                        if self.peek() == Some('\\') {
                            return Err(self.error_here(UnfoldErrorKind::UnsupportedEscape));
                        }
                        let to = self.bump().expect("range end present");
                        if (to as u32) < (from as u32) {
                            return Err(self.error_at(UnfoldErrorKind::InvalidRange, from_pos));
                        }
                        members.extend(from..=to);
                    } else {
                        members.push(from);
                    }
                }
            }
        }

        if members.is_empty() {
            return Err(self.error_at(UnfoldErrorKind::EmptyClass, open));
        }

        let mut words: Vec<String> = members.into_iter().map(|c| c.to_string()).collect();
        if self.consume_optional()? {
            words.insert(0, String::new());
        }
        Ok(words)
    }
}
