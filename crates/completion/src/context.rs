// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion context
//!
//! Ties extraction, caret resolution and catalog hydration together for one
//! request:
//!
//! ```text
//! SQL text + caret
//!     → extract_scopes()
//!     → VisibilityResolver::scope_at() / visibility_at_with()
//!     → ColumnHydrator::hydrate()
//!     → HydratedVisibility
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use sql_scope_catalog::{CachedCatalog, Catalog, TableMetadata};
use sql_scope_semantic::{extract_scopes, Scope, Visibility, VisibilityResolver};
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::error::CompletionResult;
use crate::hydrate::ColumnHydrator;

/// Visibility at a caret with table columns filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydratedVisibility {
    /// Index of the innermost scope at the caret
    pub scope_index: usize,
    /// Nesting level of that scope
    pub level: usize,
    pub visibility: Visibility,
    /// Tables whose column lookup failed
    pub unresolved_tables: Vec<String>,
}

/// Distinct full names of the named tables in the main scope
///
/// Derived tables are skipped; comparison is case-insensitive and the first
/// spelling wins.
pub fn referenced_tables(scopes: &[Scope]) -> Vec<String> {
    let Some(main) = scopes.iter().find(|s| s.is_main()) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    main.tables
        .iter()
        .filter(|t| !t.is_derived_table)
        .map(|t| t.full_name())
        .filter(|name| !name.is_empty() && seen.insert(name.to_ascii_uppercase()))
        .collect()
}

/// Per-document resolution entry point for a host editor
pub struct CompletionContext {
    config: EngineConfig,
    catalog: Arc<dyn Catalog>,
    hydrator: ColumnHydrator,
}

impl CompletionContext {
    /// Create a context; the catalog is wrapped in a column cache unless
    /// `cache_ttl_secs` is 0
    pub fn new(config: EngineConfig, catalog: Arc<dyn Catalog>) -> CompletionResult<Self> {
        config.validate()?;

        let catalog: Arc<dyn Catalog> = if config.cache_ttl_secs > 0 {
            Arc::new(CachedCatalog::new(catalog, config.cache_ttl()))
        } else {
            catalog
        };
        let hydrator =
            ColumnHydrator::new(Arc::clone(&catalog)).with_default_schema(config.default_schema.clone());

        Ok(Self {
            config,
            catalog,
            hydrator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh edit debouncer for this context's configured interval
    pub fn debouncer(&self) -> Debouncer {
        Debouncer::from_config(&self.config)
    }

    /// Scope, visibility and table columns at `caret` (byte offset)
    #[instrument(skip_all, fields(caret = caret, len = sql.len()))]
    pub async fn resolve(&self, sql: &str, caret: usize) -> CompletionResult<HydratedVisibility> {
        let scopes = extract_scopes(sql);
        let Some(scope) = VisibilityResolver::scope_at(&scopes, caret) else {
            return Ok(HydratedVisibility {
                scope_index: 0,
                level: 0,
                visibility: Visibility::default(),
                unresolved_tables: Vec::new(),
            });
        };

        let mut visibility =
            VisibilityResolver::visibility_at_with(&scopes, scope, self.config.visibility_options());
        let unresolved_tables = self.hydrator.hydrate(&mut visibility).await;
        debug!(
            scope = scope.index,
            unresolved = unresolved_tables.len(),
            "Resolved caret"
        );

        Ok(HydratedVisibility {
            scope_index: scope.index,
            level: scope.level,
            visibility,
            unresolved_tables,
        })
    }

    /// Every table the catalog knows, for completing after FROM or JOIN
    pub async fn available_tables(&self) -> CompletionResult<Vec<TableMetadata>> {
        Ok(self.catalog.list_tables().await?)
    }
}
