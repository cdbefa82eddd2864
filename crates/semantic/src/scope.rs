// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Scope data model
//!
//! A [`Scope`] is one SELECT block: the main query or any parenthesized
//! subquery. Scopes live in a flat `Vec` produced by one extraction pass and
//! refer to each other only by [`Scope::index`], so the whole tree is a plain
//! value that can be cloned, serialized, or shared across threads.
//!
//! All offsets are byte offsets into the UTF-8 input. Editors that count
//! characters can convert with [`char_to_byte_offset`].

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the SQL text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `true` when `offset` lies in `[start, end)`
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// `true` when `offset` lies strictly between the two ends
    pub fn strictly_contains(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry of a FROM clause
///
/// Either a named object (`tables`, `DBM.ORDERS o`) or a derived table
/// (`(SELECT ...) x`). Exactly one of `table_name.is_some()` and
/// `is_derived_table` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReference {
    /// Optional schema qualifier
    pub schema: Option<String>,

    /// Referenced table or view; `None` for derived tables
    pub table_name: Option<String>,

    /// Name other parts of the query use for this reference
    pub alias: Option<String>,

    /// The reference is a parenthesized subquery
    pub is_derived_table: bool,

    /// Index of the scope producing the rows of a derived table, when linked
    pub derived_table_scope_index: Option<usize>,
}

impl TableReference {
    /// Create a reference to a named table
    ///
    /// # Examples
    ///
    /// ```
    /// use sql_scope_semantic::TableReference;
    ///
    /// let table = TableReference::table("ORDERS").with_schema("DBM").with_alias("o");
    /// assert_eq!(table.full_name(), "DBM.ORDERS");
    /// assert_eq!(table.display_name(), Some("o"));
    /// ```
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            table_name: Some(name.into()),
            alias: None,
            is_derived_table: false,
            derived_table_scope_index: None,
        }
    }

    /// Create a reference to a derived table (not yet linked to a scope)
    pub fn derived() -> Self {
        Self {
            schema: None,
            table_name: None,
            alias: None,
            is_derived_table: true,
            derived_table_scope_index: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// `SCHEMA.TABLE`, `TABLE`, or an empty string for derived tables
    pub fn full_name(&self) -> String {
        match (&self.schema, &self.table_name) {
            (Some(schema), Some(table)) => format!("{schema}.{table}"),
            (None, Some(table)) => table.clone(),
            _ => String::new(),
        }
    }

    /// Alias if present, otherwise the table name
    ///
    /// Derived tables without an alias have no display name.
    pub fn display_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.table_name.as_deref())
    }

    /// Check if this reference answers to `name` (alias or table name, case-insensitive)
    pub fn matches(&self, name: &str) -> bool {
        self.alias
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(name))
            || self
                .table_name
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(name))
    }
}

/// Represents one SELECT block of a SQL statement
///
/// The main query is always index 0 at level 0 and spans the whole input.
/// Every other scope is a subquery whose span includes its parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Nesting depth; the main query is 0
    pub level: usize,

    /// Unique identifier in discovery order
    pub index: usize,

    /// Region of the input this scope occupies
    pub span: Span,

    /// Scope text without the enclosing parentheses
    pub content: String,

    /// Alias written after the closing parenthesis (derived tables)
    pub alias: Option<String>,

    /// Index of the lexically enclosing scope; `None` only for the main scope
    pub parent_index: Option<usize>,

    /// Text between SELECT and FROM, nested subqueries masked
    pub select_list: String,

    /// Text of the FROM clause, nested subqueries masked
    pub from_clause: String,

    /// Text of the WHERE clause, nested subqueries masked
    pub where_clause: String,

    /// FROM-clause entries in order of appearance
    pub tables: Vec<TableReference>,

    /// Column names this scope exposes to an enclosing query
    pub exposed_columns: Vec<String>,
}

impl Scope {
    /// Create an empty main scope covering `sql`
    pub fn main(sql: &str) -> Self {
        Self {
            level: 0,
            index: 0,
            span: Span::new(0, sql.len()),
            content: sql.to_string(),
            alias: None,
            parent_index: None,
            select_list: String::new(),
            from_clause: String::new(),
            where_clause: String::new(),
            tables: Vec::new(),
            exposed_columns: Vec::new(),
        }
    }

    pub fn is_main(&self) -> bool {
        self.parent_index.is_none()
    }

    /// Find a FROM entry of this scope by alias or table name
    pub fn find_table(&self, name: &str) -> Option<&TableReference> {
        self.tables.iter().find(|t| t.matches(name))
    }
}

/// Convert a character index (as counted by an editor) into a byte offset
///
/// Indices past the end clamp to `text.len()`.
///
/// # Examples
///
/// ```
/// use sql_scope_semantic::char_to_byte_offset;
///
/// assert_eq!(char_to_byte_offset("SELECT 'é' x", 10), 11);
/// assert_eq!(char_to_byte_offset("abc", 99), 3);
/// ```
pub fn char_to_byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
