// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Visibility resolution
//!
//! Given the scopes of a statement and a caret offset, answer "which names can
//! be referenced here?". The innermost scope at the caret contributes its own
//! FROM entries; a subquery also sees its parent's entries, which is what makes
//! correlated references such as `WHERE o.id = c.order_id` resolvable.

use serde::{Deserialize, Serialize};
use sql_scope_catalog::ColumnMetadata;
use tracing::debug;

use crate::scope::{Scope, TableReference};

/// Name used for a derived table that has no alias anywhere
pub const UNNAMED_DERIVED_TABLE: &str = "subquery";

/// A name usable at the caret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleAlias {
    /// Alias, else table name, else derived-scope alias, else `subquery`
    pub name: String,
    /// `SCHEMA.TABLE`; empty for derived tables
    pub full_table_name: String,
    pub is_derived_table: bool,
    /// Scope whose FROM clause declares the name
    pub source_scope_index: usize,
    pub is_from_parent_scope: bool,
}

/// Columns of a named table, filled in by a catalog-aware caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumnSet {
    pub alias: String,
    pub full_table_name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

/// Columns a derived table exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTableColumnSet {
    pub alias: String,
    pub exposed_columns: Vec<String>,
    pub scope_index: usize,
}

/// Everything that can be referenced at one caret position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub aliases: Vec<VisibleAlias>,
    pub parent_aliases: Vec<VisibleAlias>,
    pub table_columns: Vec<TableColumnSet>,
    pub derived_table_columns: Vec<DerivedTableColumnSet>,
}

impl Visibility {
    /// Look up a visible name, current scope first (case-insensitive)
    pub fn find_alias(&self, name: &str) -> Option<&VisibleAlias> {
        self.aliases
            .iter()
            .chain(&self.parent_aliases)
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Knobs for [`VisibilityResolver::visibility_at_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityOptions {
    /// Also list grandparent and further ancestor aliases, nearest first
    pub include_ancestor_aliases: bool,
}

impl VisibilityOptions {
    pub fn with_ancestor_aliases(mut self, include: bool) -> Self {
        self.include_ancestor_aliases = include;
        self
    }
}

/// Result of resolving a caret
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeResolution<'a> {
    pub scope: Option<&'a Scope>,
    pub visibility: Option<Visibility>,
}

/// Caret-to-scope and scope-to-visibility queries
pub struct VisibilityResolver;

impl VisibilityResolver {
    /// Innermost scope whose span contains `caret`
    ///
    /// Ties on level go to the smaller span. A caret outside every span
    /// (e.g. at end of input) falls back to the main scope; `None` only for an
    /// empty scope list.
    pub fn scope_at(scopes: &[Scope], caret: usize) -> Option<&Scope> {
        scopes
            .iter()
            .filter(|s| s.span.contains(caret))
            .max_by(|a, b| {
                a.level
                    .cmp(&b.level)
                    .then_with(|| b.span.len().cmp(&a.span.len()))
            })
            .or_else(|| scopes.iter().find(|s| s.is_main()))
            .or_else(|| scopes.first())
    }

    /// Names visible inside `scope`
    pub fn visibility_at(scopes: &[Scope], scope: &Scope) -> Visibility {
        Self::visibility_at_with(scopes, scope, VisibilityOptions::default())
    }

    /// Names visible inside `scope`, with options
    pub fn visibility_at_with(scopes: &[Scope], scope: &Scope, options: VisibilityOptions) -> Visibility {
        let mut visibility = Visibility::default();

        for table in &scope.tables {
            visibility.aliases.push(Self::visible_alias(scopes, scope, table, false));
            if table.is_derived_table {
                if let Some(derived) = Self::derived_columns(scopes, table) {
                    visibility.derived_table_columns.push(derived);
                }
            } else {
                visibility.table_columns.push(TableColumnSet {
                    alias: table.display_name().unwrap_or_default().to_string(),
                    full_table_name: table.full_name(),
                    columns: Vec::new(),
                });
            }
        }

        if scope.level > 0 {
            let mut ancestor = scope.parent_index.and_then(|p| find_scope(scopes, p));
            while let Some(parent) = ancestor {
                for table in &parent.tables {
                    visibility
                        .parent_aliases
                        .push(Self::visible_alias(scopes, parent, table, true));
                }
                if !options.include_ancestor_aliases {
                    break;
                }
                ancestor = parent.parent_index.and_then(|p| find_scope(scopes, p));
            }
        }

        debug!(
            scope = scope.index,
            aliases = visibility.aliases.len(),
            parent_aliases = visibility.parent_aliases.len(),
            "Resolved visibility"
        );
        visibility
    }

    /// Scope at `caret` together with its visibility
    pub fn resolve(scopes: &[Scope], caret: usize) -> ScopeResolution<'_> {
        let scope = Self::scope_at(scopes, caret);
        ScopeResolution {
            scope,
            visibility: scope.map(|s| Self::visibility_at(scopes, s)),
        }
    }

    fn visible_alias(
        scopes: &[Scope],
        owner: &Scope,
        table: &TableReference,
        is_from_parent_scope: bool,
    ) -> VisibleAlias {
        let name = if table.is_derived_table {
            derived_name(scopes, table)
        } else {
            table.display_name().unwrap_or_default().to_string()
        };
        VisibleAlias {
            name,
            full_table_name: table.full_name(),
            is_derived_table: table.is_derived_table,
            source_scope_index: owner.index,
            is_from_parent_scope,
        }
    }

    fn derived_columns(scopes: &[Scope], table: &TableReference) -> Option<DerivedTableColumnSet> {
        let index = table.derived_table_scope_index?;
        let source = find_scope(scopes, index)?;
        Some(DerivedTableColumnSet {
            alias: derived_name(scopes, table),
            exposed_columns: source.exposed_columns.clone(),
            scope_index: index,
        })
    }
}

fn find_scope(scopes: &[Scope], index: usize) -> Option<&Scope> {
    scopes
        .get(index)
        .filter(|s| s.index == index)
        .or_else(|| scopes.iter().find(|s| s.index == index))
}

fn derived_name(scopes: &[Scope], table: &TableReference) -> String {
    table
        .alias
        .clone()
        .or_else(|| {
            table
                .derived_table_scope_index
                .and_then(|i| find_scope(scopes, i))
                .and_then(|s| s.alias.clone())
        })
        .unwrap_or_else(|| UNNAMED_DERIVED_TABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScopeExtractor;

    #[test]
    fn test_scope_at_end_of_input_is_main() {
        let sql = "SELECT * FROM (SELECT a FROM t) x";
        let scopes = ScopeExtractor::extract(sql);
        let scope = VisibilityResolver::scope_at(&scopes, sql.len()).unwrap();
        assert_eq!(scope.index, 0);
        assert!(VisibilityResolver::scope_at(&[], 0).is_none());
    }

    #[test]
    fn test_parens_belong_to_subquery() {
        let sql = "SELECT * FROM (SELECT a FROM t) x";
        let scopes = ScopeExtractor::extract(sql);
        let open = sql.find('(').unwrap();
        let close = sql.find(')').unwrap();
        assert_eq!(VisibilityResolver::scope_at(&scopes, open).unwrap().index, 1);
        assert_eq!(VisibilityResolver::scope_at(&scopes, close).unwrap().index, 1);
        assert_eq!(VisibilityResolver::scope_at(&scopes, close + 1).unwrap().index, 0);
    }

    #[test]
    fn test_unaliased_derived_table_is_named_subquery() {
        let sql = "SELECT * FROM (SELECT a FROM t)";
        let scopes = ScopeExtractor::extract(sql);
        let visibility = VisibilityResolver::visibility_at(&scopes, &scopes[0]);
        assert_eq!(visibility.aliases[0].name, UNNAMED_DERIVED_TABLE);
        assert_eq!(visibility.derived_table_columns[0].exposed_columns, vec!["a"]);
    }

    #[test]
    fn test_ancestor_aliases_are_opt_in() {
        let sql = "SELECT * FROM a WHERE EXISTS (SELECT 1 FROM b WHERE EXISTS (SELECT 1 FROM c WHERE c.x = a.x))";
        let scopes = ScopeExtractor::extract(sql);
        let innermost = scopes.iter().find(|s| s.level == 2).unwrap();

        let default = VisibilityResolver::visibility_at(&scopes, innermost);
        let names: Vec<_> = default.parent_aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);

        let options = VisibilityOptions::default().with_ancestor_aliases(true);
        let full = VisibilityResolver::visibility_at_with(&scopes, innermost, options);
        let names: Vec<_> = full.parent_aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(full.find_alias("A").unwrap().is_from_parent_scope);
    }

    #[test]
    fn test_main_scope_has_no_parent_aliases() {
        let scopes = ScopeExtractor::extract("SELECT * FROM t");
        let visibility = VisibilityResolver::visibility_at(&scopes, &scopes[0]);
        assert!(visibility.parent_aliases.is_empty());
        assert_eq!(visibility.table_columns[0].alias, "t");
        assert!(visibility.table_columns[0].columns.is_empty());
    }
}
