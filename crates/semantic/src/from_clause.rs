// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # FROM-clause parsing
//!
//! Turns the masked FROM clause of one scope into [`TableReference`]s.
//! Entries are separated by top-level commas and `JOIN`s; join conditions
//! (`ON ...`, `USING (...)`) are dropped. Derived tables appear as the
//! placeholder and are linked to their scope by the extractor.
//!
//! Structure is matched on the blanked code view; names are sliced from the
//! original text at the same offsets, so quoted names keep their contents.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::clauses::SUBQUERY_PLACEHOLDER;
use crate::keywords::{is_join_modifier, is_reserved};
use crate::lexer::{find_top_level_keyword, split_top_level, starts_with_word, trim_range};
use crate::scope::TableReference;

/// Identifier: bare word or double-quoted name
pub(crate) const IDENT: &str = r#"(?:[A-Za-z_][A-Za-z0-9_$#@]*|"[^"]*")"#;

/// `[qualifier.]name [[AS] alias]` where name may be the subquery placeholder
static TABLE_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:((?:{IDENT}\s*\.\s*)*{IDENT})\s*\.\s*)?({IDENT}|\(__SUBSELECT__\))(?:\s+(?:AS\s+)?({IDENT}))?"
    ))
    .expect("table entry pattern is valid")
});

/// A FROM entry plus the ordinal of its placeholder within the clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedReference {
    pub reference: TableReference,
    /// Zero-based count of placeholders before this one, derived tables only
    pub placeholder: Option<usize>,
}

/// Parse a masked FROM clause given as original `text` and its blanked `code`
pub(crate) fn parse_from_clause(text: &str, code: &str) -> Vec<ParsedReference> {
    entry_ranges(code)
        .into_iter()
        .filter_map(|range| parse_entry(text, code, range))
        .collect()
}

fn entry_ranges(code: &str) -> Vec<Range<usize>> {
    let mut entries = Vec::new();
    for part in split_top_level(code, b',') {
        let scoped = &code[..part.end];
        let mut start = part.start;
        loop {
            let join = find_top_level_keyword(scoped, start, &["JOIN"]);
            entries.push(start..join.map_or(part.end, |j| j.start));
            match join {
                Some(j) => start = j.end,
                None => break,
            }
        }
    }
    entries
}

fn parse_entry(text: &str, code: &str, range: Range<usize>) -> Option<ParsedReference> {
    let mut end = range.end;
    if let Some(condition) = find_top_level_keyword(&code[..range.end], range.start, &["ON", "USING"]) {
        end = condition.start;
    }
    let mut range = trim_range(code, range.start..end);

    // `LEFT OUTER` before the next JOIN belongs to the join, not this entry
    loop {
        let entry = &code[range.clone()];
        match entry.rsplit_once(|c: char| c.is_ascii_whitespace()) {
            Some((head, last)) if is_join_modifier(last) => {
                range = trim_range(code, range.start..range.start + head.len());
            }
            None if is_join_modifier(entry) => return None,
            _ => break,
        }
    }

    if starts_with_word(code, range.start, "LATERAL") {
        range = trim_range(code, range.start + "LATERAL".len()..range.end);
    }
    if range.is_empty() {
        return None;
    }

    let offset = range.start;
    let entry_code = &code[range];
    let entry_text = &text[offset..offset + entry_code.len()];
    let caps = TABLE_ENTRY_RE.captures(entry_code)?;
    let name = caps.get(2)?;
    let alias = caps
        .get(3)
        .filter(|a| a.as_str().starts_with('"') || !is_reserved(a.as_str()))
        .map(|a| unquote(&entry_text[a.range()]));

    if name.as_str().eq_ignore_ascii_case(SUBQUERY_PLACEHOLDER) {
        let mut reference = TableReference::derived();
        reference.alias = alias;
        let placeholder = code[..offset].matches(SUBQUERY_PLACEHOLDER).count();
        return Some(ParsedReference {
            reference,
            placeholder: Some(placeholder),
        });
    }

    if !name.as_str().starts_with('"') && is_reserved(name.as_str()) {
        return None;
    }

    let mut reference = TableReference::table(unquote(&entry_text[name.range()]));
    reference.schema = caps
        .get(1)
        .map(|m| unquote_path(&entry_text[m.range()], m.as_str()));
    reference.alias = alias;
    Some(ParsedReference {
        reference,
        placeholder: None,
    })
}

/// Strip surrounding double quotes and undo `""` escapes
pub(crate) fn unquote(ident: &str) -> String {
    match ident.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => ident.to_string(),
    }
}

/// Unquote each part of a dotted path; dots are located in `code` so a
/// quoted part may itself contain one
fn unquote_path(text: &str, code: &str) -> String {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, b) in code.bytes().enumerate() {
        if b == b'.' {
            parts.push(unquote(text[start..i].trim()));
            start = i + 1;
        }
    }
    parts.push(unquote(text[start..].trim()));
    parts.join(".")
}
