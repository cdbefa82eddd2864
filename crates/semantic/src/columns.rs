// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Exposed-column extraction from a masked SELECT list.
//!
//! Items are split and matched on the blanked code view; names are sliced
//! from the original text at the same offsets.

use std::sync::LazyLock;

use regex::Regex;

use crate::from_clause::{unquote, IDENT};
use crate::keywords::is_reserved;
use crate::lexer::{split_top_level, trim_range};

static TRAILING_ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\s+(AS\s+)?({IDENT})$")).expect("trailing alias pattern is valid")
});

static QUALIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{IDENT}\s*\.\s*)+({IDENT})$")).expect("qualified column pattern is valid")
});

static SIMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({IDENT})$")).expect("column pattern is valid"));

/// Names a SELECT list makes available to an enclosing query
///
/// Items are taken in order. `*` and `x.*` expose nothing, and items whose
/// name cannot be determined (`a + 1`) are skipped.
pub(crate) fn exposed_columns(select_text: &str, select_code: &str) -> Vec<String> {
    split_top_level(select_code, b',')
        .into_iter()
        .filter_map(|range| {
            let range = trim_range(select_code, range);
            column_name(&select_text[range.clone()], &select_code[range])
        })
        .collect()
}

fn column_name(text: &str, code: &str) -> Option<String> {
    if code.is_empty() || code == "*" || code.ends_with(".*") {
        return None;
    }

    if let Some(caps) = TRAILING_ALIAS_RE.captures(code) {
        let whole = caps.get(0)?;
        let alias = caps.get(2)?;
        let explicit = caps.get(1).is_some();
        let after_operand = code[..whole.start()]
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | ')' | '\'' | '"' | ']'));
        if (explicit || after_operand) && (alias.as_str().starts_with('"') || !is_reserved(alias.as_str())) {
            return Some(unquote(&text[alias.range()]));
        }
    }

    if let Some(caps) = QUALIFIED_RE.captures(code) {
        return caps.get(1).map(|m| unquote(&text[m.range()]));
    }

    SIMPLE_RE
        .captures(code)
        .and_then(|caps| caps.get(1))
        .filter(|m| m.as_str().starts_with('"') || !is_reserved(m.as_str()))
        .map(|m| unquote(&text[m.range()]))
}
