// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause decomposition
//!
//! Splits the content of one scope into its SELECT list, FROM clause and
//! WHERE clause. Directly nested subqueries are first replaced by
//! [`SUBQUERY_PLACEHOLDER`] so that only keywords belonging to the current
//! nesting level are seen.

use std::ops::Range;

use crate::lexer::{find_top_level_keyword, next_word, trim_range, KeywordMatch};
use crate::scope::Span;

/// Fixed token standing in for a masked child subquery
pub const SUBQUERY_PLACEHOLDER: &str = "(__SUBSELECT__)";

const SELECT_LIST_END: &[&str] = &[
    "FROM", "WHERE", "GROUP BY", "ORDER BY", "HAVING", "UNION", "INTERSECT", "EXCEPT", "FETCH",
    "LIMIT", "OFFSET", "FOR", ";",
];

const FROM_END: &[&str] = &[
    "WHERE", "GROUP BY", "ORDER BY", "HAVING", "UNION", "INTERSECT", "EXCEPT", "FETCH", "LIMIT",
    "OFFSET", "FOR", "WITH", ";",
];

const WHERE_END: &[&str] = &[
    "GROUP BY", "ORDER BY", "HAVING", "UNION", "INTERSECT", "EXCEPT", "FETCH", "LIMIT", "OFFSET",
    "FOR", "WITH", ";",
];

/// Scope content with its direct children masked
///
/// `text` and `code` have identical byte layout; `code` is the blanked view
/// used for every structural decision.
#[derive(Debug, Clone, Default)]
pub(crate) struct MaskedContent {
    pub text: String,
    pub code: String,
    /// Child scope index for each placeholder, in order of appearance
    pub placeholders: Vec<usize>,
}

impl MaskedContent {
    /// Slice `text` at a range found in `code`
    pub fn text_at(&self, range: &Range<usize>) -> String {
        self.text.get(range.clone()).unwrap_or_default().to_string()
    }

    /// Number of placeholders that start before `offset`
    pub fn placeholders_before(&self, offset: usize) -> usize {
        self.code
            .get(..offset)
            .map_or(0, |prefix| prefix.matches(SUBQUERY_PLACEHOLDER).count())
    }
}

/// Replace each child span inside `content` by the placeholder
///
/// `children` holds `(span, scope index)` pairs of direct children; spans are
/// absolute offsets into `sql`/`code`.
pub(crate) fn mask_children(
    sql: &str,
    code: &str,
    content: Range<usize>,
    children: &[(Span, usize)],
) -> MaskedContent {
    let mut sorted: Vec<&(Span, usize)> = children
        .iter()
        .filter(|(span, _)| span.start >= content.start && span.end <= content.end)
        .collect();
    sorted.sort_by_key(|(span, _)| span.start);

    let mut masked = MaskedContent::default();
    let mut cursor = content.start;
    for (span, index) in sorted {
        if span.start < cursor {
            continue;
        }
        masked.text.push_str(&sql[cursor..span.start]);
        masked.code.push_str(&code[cursor..span.start]);
        masked.text.push_str(SUBQUERY_PLACEHOLDER);
        masked.code.push_str(SUBQUERY_PLACEHOLDER);
        masked.placeholders.push(*index);
        cursor = span.end;
    }
    masked.text.push_str(&sql[cursor..content.end]);
    masked.code.push_str(&code[cursor..content.end]);
    masked
}

/// Byte ranges of the three clauses inside masked code
///
/// An absent clause is an empty range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseRanges {
    pub select_list: Range<usize>,
    pub from_clause: Range<usize>,
    pub where_clause: Range<usize>,
}

/// Locate the SELECT list, FROM clause and WHERE clause in `code`
///
/// Statements without SELECT (`DELETE FROM t WHERE ...`) still get their FROM
/// and WHERE clauses.
pub fn decompose(code: &str) -> ClauseRanges {
    let mut clauses = ClauseRanges::default();
    let len = code.len();

    let mut next: Option<(&str, KeywordMatch)> = match find_top_level_keyword(code, 0, &["SELECT"]) {
        Some(select) => {
            let mut start = select.end;
            if let Some(word) = next_word(code, start) {
                let quantifier = &code[word.clone()];
                if quantifier.eq_ignore_ascii_case("DISTINCT") || quantifier.eq_ignore_ascii_case("ALL") {
                    start = word.end;
                }
            }
            let stop = find_top_level_keyword(code, start, SELECT_LIST_END);
            clauses.select_list = trim_range(code, start..stop.map_or(len, |m| m.start));
            stop.map(|m| (SELECT_LIST_END[m.keyword], m))
        }
        None => {
            let leading = &["FROM", "WHERE"];
            find_top_level_keyword(code, 0, leading).map(|m| (leading[m.keyword], m))
        }
    };

    if let Some(("FROM", from)) = next {
        let stop = find_top_level_keyword(code, from.end, FROM_END);
        clauses.from_clause = trim_range(code, from.end..stop.map_or(len, |m| m.start));
        next = stop.map(|m| (FROM_END[m.keyword], m));
    }

    if let Some(("WHERE", filter)) = next {
        let stop = find_top_level_keyword(code, filter.end, WHERE_END);
        clauses.where_clause = trim_range(code, filter.end..stop.map_or(len, |m| m.start));
    }

    clauses
}
