// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Reserved words
//!
//! Words that can never be a table name, table alias, or column alias when
//! they show up in a position the extractor would otherwise capture.

const RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "FETCH", "FIRST", "FOR",
    "FROM", "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO",
    "IS", "JOIN", "LATERAL", "LEFT", "LIKE", "LIMIT", "NATURAL", "NOT", "NULL", "OFFSET", "ON",
    "ONLY", "OR", "ORDER", "OUTER", "RIGHT", "ROWS", "SELECT", "SET", "TABLE", "THEN", "UNION",
    "UPDATE", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
];

/// Join-type words that may precede `JOIN`
pub(crate) const JOIN_MODIFIERS: &[&str] =
    &["INNER", "LEFT", "RIGHT", "FULL", "CROSS", "OUTER", "NATURAL"];

/// Check whether `word` is reserved (ASCII case-insensitive)
///
/// # Examples
///
/// ```
/// use sql_scope_semantic::keywords::is_reserved;
///
/// assert!(is_reserved("where"));
/// assert!(!is_reserved("orders"));
/// ```
pub fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|k| k.eq_ignore_ascii_case(word))
}

pub(crate) fn is_join_modifier(word: &str) -> bool {
    JOIN_MODIFIERS.iter().any(|k| k.eq_ignore_ascii_case(word))
}
