// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scope extraction
//!
//! One pass over the input builds the whole scope tree:
//!
//! 1. Blank literals, quoted identifiers and comments ([`blank_literals`]).
//! 2. Scan parentheses with a stack; every balanced pair whose content starts
//!    with `SELECT` is a subquery. Unmatched `(` produce nothing.
//! 3. Assign each subquery the smallest enclosing subquery (or the main
//!    query) as parent and derive levels from the parents.
//! 4. For every scope, mask direct children, decompose the clauses, parse the
//!    FROM list and compute exposed columns.
//! 5. Link derived-table references to the scopes producing their rows.
//!
//! Extraction never fails; malformed input yields fewer scopes or emptier
//! fields.

use std::cmp::Reverse;
use std::ops::Range;

use tracing::{debug, instrument};

use crate::clauses::{decompose, mask_children};
use crate::columns::exposed_columns;
use crate::from_clause::parse_from_clause;
use crate::keywords::is_reserved;
use crate::lexer::{blank_literals, next_word, starts_with_word, trim_range};
use crate::scope::{Scope, Span};

/// Words that may legally follow the alias of a derived table
const ALIAS_TERMINATORS: &[&str] = &[
    "ON", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "NATURAL", "USING", "GROUP",
    "ORDER", "HAVING", "UNION", "INTERSECT", "EXCEPT", "FETCH", "LIMIT", "OFFSET", "FOR", "WITH",
];

/// A balanced `( SELECT ... )` found by the scan
#[derive(Debug)]
struct Subquery {
    open: usize,
    close: usize,
    content: Range<usize>,
    alias: Option<String>,
}

/// Builds the scope tree of a SQL text
pub struct ScopeExtractor;

impl ScopeExtractor {
    /// Extract all scopes of `sql`
    ///
    /// The result always contains the main scope at position 0; a scope's
    /// position in the vector equals its [`Scope::index`].
    #[instrument(skip_all, fields(len = sql.len()))]
    pub fn extract(sql: &str) -> Vec<Scope> {
        let code = blank_literals(sql);
        let subqueries = Self::find_subqueries(&code);
        debug!(count = subqueries.len(), "Found subqueries");

        let mut scopes = Vec::with_capacity(subqueries.len() + 1);
        let mut content_ranges = Vec::with_capacity(subqueries.len() + 1);
        scopes.push(Scope::main(sql));
        content_ranges.push(0..sql.len());

        for (i, subquery) in subqueries.into_iter().enumerate() {
            let mut scope = Scope::main(sql[subquery.open + 1..subquery.close].trim());
            scope.index = i + 1;
            scope.span = Span::new(subquery.open, subquery.close + 1);
            scope.alias = subquery.alias;
            scopes.push(scope);
            content_ranges.push(subquery.content);
        }

        Self::assign_parents(&mut scopes);

        for i in 0..scopes.len() {
            Self::populate(sql, &code, &mut scopes, i, content_ranges[i].clone());
        }

        debug!(scopes = scopes.len(), "Extracted scopes");
        scopes
    }

    /// Balanced parenthesis pairs holding a SELECT, in order of closing
    fn find_subqueries(code: &str) -> Vec<Subquery> {
        let mut stack = Vec::new();
        let mut found = Vec::new();

        for (i, b) in code.bytes().enumerate() {
            match b {
                b'(' => stack.push(i),
                b')' => {
                    let Some(open) = stack.pop() else {
                        continue;
                    };
                    let content = trim_range(code, open + 1..i);
                    if starts_with_word(code, content.start, "SELECT") {
                        found.push(Subquery {
                            open,
                            close: i,
                            content,
                            alias: Self::alias_after(code, i + 1),
                        });
                    }
                }
                _ => {}
            }
        }

        found
    }

    /// Alias written right after a closing parenthesis: `) [AS] name`
    fn alias_after(code: &str, pos: usize) -> Option<String> {
        let mut word = next_word(code, pos)?;
        if code[word.clone()].eq_ignore_ascii_case("AS") {
            word = next_word(code, word.end)?;
        }
        let alias = &code[word.clone()];
        if is_reserved(alias) {
            return None;
        }

        let rest = code[word.end..].trim_start();
        let terminated = rest.is_empty()
            || rest.starts_with([',', ')', ';'])
            || next_word(code, word.end)
                .is_some_and(|w| ALIAS_TERMINATORS.iter().any(|t| code[w.clone()].eq_ignore_ascii_case(t)));
        terminated.then(|| alias.to_string())
    }

    /// Parent is the smallest subquery span strictly containing the open
    /// parenthesis, else the main scope
    fn assign_parents(scopes: &mut [Scope]) {
        let spans: Vec<Span> = scopes.iter().map(|s| s.span).collect();
        for i in 1..scopes.len() {
            let open = spans[i].start;
            let parent = (1..spans.len())
                .filter(|&j| j != i && spans[j].strictly_contains(open))
                .min_by_key(|&j| spans[j].len())
                .unwrap_or(0);
            scopes[i].parent_index = Some(parent);
        }

        // parents always have strictly longer spans
        let mut order: Vec<usize> = (1..scopes.len()).collect();
        order.sort_by_key(|&i| Reverse(spans[i].len()));
        for i in order {
            let parent = scopes[i].parent_index.unwrap_or(0);
            scopes[i].level = scopes[parent].level + 1;
        }
    }

    /// Fill clauses, tables and exposed columns of scope `i`
    fn populate(sql: &str, code: &str, scopes: &mut [Scope], i: usize, content: Range<usize>) {
        let children: Vec<(Span, usize)> = scopes
            .iter()
            .filter(|s| s.parent_index == Some(i))
            .map(|s| (s.span, s.index))
            .collect();
        let masked = mask_children(sql, code, content, &children);
        let clauses = decompose(&masked.code);

        let mut tables = Vec::new();
        let from = clauses.from_clause.clone();
        let base = masked.placeholders_before(from.start);
        for parsed in parse_from_clause(&masked.text[from.clone()], &masked.code[from]) {
            let mut reference = parsed.reference;
            if reference.is_derived_table {
                let by_alias = reference.alias.as_deref().and_then(|alias| {
                    scopes.iter().find(|s| {
                        s.parent_index == Some(i)
                            && s.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(alias))
                    })
                });
                reference.derived_table_scope_index = by_alias.map(|s| s.index).or_else(|| {
                    parsed
                        .placeholder
                        .and_then(|ordinal| masked.placeholders.get(base + ordinal).copied())
                });
                debug!(
                    scope = i,
                    alias = ?reference.alias,
                    linked = ?reference.derived_table_scope_index,
                    "Linked derived table"
                );
            }
            tables.push(reference);
        }

        let scope = &mut scopes[i];
        scope.select_list = masked.text_at(&clauses.select_list);
        scope.from_clause = masked.text_at(&clauses.from_clause);
        scope.where_clause = masked.text_at(&clauses.where_clause);
        let select = clauses.select_list.clone();
        scope.exposed_columns = exposed_columns(&masked.text[select.clone()], &masked.code[select]);
        scope.tables = tables;
    }
}
