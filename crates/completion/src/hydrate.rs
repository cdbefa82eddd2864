// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Column hydration
//!
//! The visibility resolver reports which tables are in reach but leaves their
//! column lists empty. [`ColumnHydrator`] fills them through a [`Catalog`].
//! A lookup that fails is logged and leaves that entry empty; the rest of the
//! visibility is still usable for completion.

use std::collections::HashMap;
use std::sync::Arc;

use sql_scope_catalog::{Catalog, ColumnMetadata};
use sql_scope_semantic::Visibility;
use tracing::{debug, instrument, warn};

/// Fills `TableColumnSet::columns` from a catalog
#[derive(Clone)]
pub struct ColumnHydrator {
    catalog: Arc<dyn Catalog>,
    default_schema: Option<String>,
}

impl ColumnHydrator {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            default_schema: None,
        }
    }

    /// Qualify bare table names with `schema` before lookup
    pub fn with_default_schema(mut self, schema: Option<String>) -> Self {
        self.default_schema = schema;
        self
    }

    /// Name passed to the catalog for a table reference
    pub fn lookup_name(&self, full_table_name: &str) -> String {
        match &self.default_schema {
            Some(schema) if !full_table_name.contains('.') => format!("{schema}.{full_table_name}"),
            _ => full_table_name.to_string(),
        }
    }

    /// Fill every table column set of `visibility`
    ///
    /// Each distinct table is looked up once. Returns the names whose lookup
    /// failed, in order of first appearance.
    #[instrument(skip_all, fields(tables = visibility.table_columns.len()))]
    pub async fn hydrate(&self, visibility: &mut Visibility) -> Vec<String> {
        let mut resolved: HashMap<String, Option<Vec<ColumnMetadata>>> = HashMap::new();
        let mut unresolved = Vec::new();

        for set in &mut visibility.table_columns {
            if set.full_table_name.is_empty() {
                continue;
            }
            let name = self.lookup_name(&set.full_table_name);
            let key = name.to_ascii_uppercase();

            if !resolved.contains_key(&key) {
                let columns = match self.catalog.get_columns(&name).await {
                    Ok(columns) => {
                        debug!(table = %name, count = columns.len(), "Loaded columns");
                        Some(columns)
                    }
                    Err(err) => {
                        warn!(table = %name, error = %err, "Column lookup failed");
                        unresolved.push(set.full_table_name.clone());
                        None
                    }
                };
                resolved.insert(key.clone(), columns);
            }

            if let Some(Some(columns)) = resolved.get(&key) {
                set.columns = columns.clone();
            }
        }

        unresolved
    }
}
