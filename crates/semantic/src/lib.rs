// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # SQL Scope Semantic Layer
//!
//! Tolerant scope extraction and visibility resolution for SQL text that is
//! still being edited.
//!
//! ## Overview
//!
//! - **Scope extraction**: split a statement into its main query and every
//!   parenthesized subquery, each with its clauses, FROM entries and exposed
//!   columns
//! - **Visibility resolution**: for a caret offset, list the aliases, tables and
//!   derived tables that can be referenced there, including the enclosing
//!   query's aliases for correlated subqueries
//!
//! Incomplete or malformed SQL never fails; it yields fewer scopes or emptier
//! fields.
//!
//! ## Core Concepts
//!
//! ### Scopes
//!
//! ```rust
//! use sql_scope_semantic::extract_scopes;
//!
//! let scopes = extract_scopes("SELECT * FROM (SELECT id, name FROM users) u");
//! assert_eq!(scopes.len(), 2);
//! assert_eq!(scopes[1].alias.as_deref(), Some("u"));
//! assert_eq!(scopes[1].exposed_columns, vec!["id", "name"]);
//! assert_eq!(scopes[0].tables[0].derived_table_scope_index, Some(1));
//! ```
//!
//! ### Visibility
//!
//! ```rust
//! use sql_scope_semantic::{extract_scopes, resolve_visibility};
//!
//! let sql = "SELECT * FROM orders o WHERE EXISTS (SELECT 1 FROM items i WHERE i.order_id = o.id)";
//! let scopes = extract_scopes(sql);
//! let caret = sql.find("i.order_id").unwrap();
//!
//! let resolution = resolve_visibility(&scopes, caret);
//! let visibility = resolution.visibility.unwrap();
//! assert_eq!(visibility.aliases[0].name, "i");
//! assert_eq!(visibility.parent_aliases[0].name, "o");
//! ```

pub mod clauses;
mod columns;
pub mod extractor;
mod from_clause;
pub mod keywords;
pub mod lexer;
pub mod scope;
pub mod visibility;

pub use clauses::SUBQUERY_PLACEHOLDER;
pub use extractor::ScopeExtractor;
pub use scope::{char_to_byte_offset, Scope, Span, TableReference};
pub use visibility::{
    DerivedTableColumnSet, ScopeResolution, TableColumnSet, Visibility, VisibilityOptions,
    VisibilityResolver, VisibleAlias, UNNAMED_DERIVED_TABLE,
};

/// Extract all scopes of `sql`; shorthand for [`ScopeExtractor::extract`]
pub fn extract_scopes(sql: &str) -> Vec<Scope> {
    ScopeExtractor::extract(sql)
}

/// Innermost scope at `caret` and what is visible there
pub fn resolve_visibility(scopes: &[Scope], caret: usize) -> ScopeResolution<'_> {
    VisibilityResolver::resolve(scopes, caret)
}
