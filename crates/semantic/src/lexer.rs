// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tolerant scanning helpers
//!
//! The extractor never tokenizes SQL fully. It works on a *code view* of the
//! input: a copy of identical byte length in which string literal contents,
//! quoted identifier contents and comments are blanked out, so parentheses,
//! commas and keywords inside them cannot confuse the structural scan. Every
//! offset found in the code view is valid in the original text, and names are
//! sliced from the original text at those offsets.

use std::ops::Range;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

/// Blank literal contents, quoted identifier contents and comments, preserving
/// byte offsets
///
/// Quote characters are kept so literals still read as operands and quoted
/// names still read as identifiers. Unterminated literals and comments blank
/// to the end of input.
///
/// # Examples
///
/// ```
/// use sql_scope_semantic::lexer::blank_literals;
///
/// let code = blank_literals("SELECT '(x' -- )\nFROM t");
/// assert_eq!(code, "SELECT '  '     \nFROM t");
/// ```
pub fn blank_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '\'' => {
                    state = State::SingleQuote;
                    out.push(c);
                }
                '"' => {
                    state = State::DoubleQuote;
                    out.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = State::LineComment;
                    out.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            State::SingleQuote | State::DoubleQuote => {
                let quote = if state == State::SingleQuote { '\'' } else { '"' };
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        chars.next();
                        out.push_str("  ");
                    } else {
                        state = State::Code;
                        out.push(c);
                    }
                } else {
                    blank(&mut out, c);
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat_n(' ', c.len_utf8()));
    }
}

/// Identifier byte: ASCII alphanumerics, `_`, `$`, `#`, `@`, or any non-ASCII byte
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'#' | b'@') || b >= 0x80
}

/// A keyword located in the code view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Index into the keyword list that matched
    pub keyword: usize,
    /// Byte offset of the first character of the keyword
    pub start: usize,
    /// Byte offset just past the keyword
    pub end: usize,
}

/// Find the first keyword from `keywords` at parenthesis depth 0, at or after `from`
///
/// Matching is ASCII case-insensitive on whole words. A keyword made of several
/// words (`"ORDER BY"`) matches with any whitespace between them. Keywords that
/// do not start with a letter (`";"`) match literally.
pub fn find_top_level_keyword(code: &str, from: usize, keywords: &[&str]) -> Option<KeywordMatch> {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut i = from.min(bytes.len());

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                let at_word_start = i == 0 || !is_ident_byte(bytes[i - 1]);
                for (k, keyword) in keywords.iter().enumerate() {
                    let is_word = keyword.as_bytes().first().is_some_and(u8::is_ascii_alphabetic);
                    if is_word && !at_word_start {
                        continue;
                    }
                    if let Some(end) = match_keyword_at(bytes, i, keyword) {
                        return Some(KeywordMatch {
                            keyword: k,
                            start: i,
                            end,
                        });
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Match `keyword` at `pos`, returning the end offset on success
pub(crate) fn match_keyword_at(bytes: &[u8], pos: usize, keyword: &str) -> Option<usize> {
    let mut i = pos;
    for (n, word) in keyword.split_whitespace().enumerate() {
        if n > 0 {
            let ws_start = i;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i == ws_start {
                return None;
            }
        }
        let w = word.as_bytes();
        if i + w.len() > bytes.len() || !bytes[i..i + w.len()].eq_ignore_ascii_case(w) {
            return None;
        }
        i += w.len();
        let is_word = w.first().is_some_and(u8::is_ascii_alphabetic);
        if is_word && i < bytes.len() && is_ident_byte(bytes[i]) {
            return None;
        }
    }
    Some(i)
}

/// Split at `separator` bytes found at parenthesis depth 0
///
/// Returns the ranges between separators, untrimmed; the last range runs to
/// the end of `code`.
pub fn split_top_level(code: &str, separator: u8) -> Vec<Range<usize>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, &b) in code.as_bytes().iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if b == separator && depth == 0 => {
                parts.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(start..code.len());
    parts
}

/// Shrink `range` so it neither starts nor ends with ASCII whitespace in `code`
pub fn trim_range(code: &str, range: Range<usize>) -> Range<usize> {
    let bytes = code.as_bytes();
    let mut start = range.start;
    let mut end = range.end;
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    start..end
}

/// Read the identifier-like word starting at `pos` (after skipping whitespace)
///
/// Returns the word's range, or `None` when the next non-blank byte does not
/// start a word.
pub(crate) fn next_word(code: &str, pos: usize) -> Option<Range<usize>> {
    let bytes = code.as_bytes();
    let mut start = pos;
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    if start >= bytes.len() || !(bytes[start].is_ascii_alphabetic() || bytes[start] == b'_' || bytes[start] >= 0x80) {
        return None;
    }
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some(start..end)
}

/// `true` when the code after `pos` begins with `word` as a whole word
pub(crate) fn starts_with_word(code: &str, pos: usize, word: &str) -> bool {
    next_word(code, pos).is_some_and(|r| code[r].eq_ignore_ascii_case(word))
}
