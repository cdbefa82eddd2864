// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! A catalog backed by predefined table metadata, either built in code or
//! loaded from a JSON document of the form `{"tables": [TableMetadata, ...]}`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_scope_catalog::StaticCatalog;
//!
//! let catalog = StaticCatalog::from_json(&std::fs::read_to_string("schema.json")?)?;
//! let columns = catalog.get_columns("DBM.ORDERS").await?;
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::metadata::{ColumnMetadata, TableMetadata};
use crate::{Catalog, CatalogError, CatalogResult};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    default_schema: Option<String>,
    tables: Vec<TableMetadata>,
}

/// Static catalog with predefined schema data
///
/// Lookups are case-insensitive. An unqualified name resolves through the
/// default schema first, then to the single table of that name in any schema.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Keyed by upper-cased `SCHEMA.NAME`
    tables: HashMap<String, TableMetadata>,
    default_schema: Option<String>,
}

impl StaticCatalog {
    /// Create an empty static catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from its JSON representation
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        if let Some(schema) = document.default_schema {
            catalog = catalog.with_default_schema(schema);
        }
        for table in document.tables {
            if table.name.trim().is_empty() {
                return Err(CatalogError::ConfigurationError(
                    "table entry without a name".to_string(),
                ));
            }
            catalog = catalog.add_table(table);
        }
        Ok(catalog)
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        let key = table.qualified_name().to_ascii_uppercase();
        self.tables.insert(key, table);
        self
    }

    /// Schema used for unqualified table names
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Number of tables in the catalog
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find a table by qualified or unqualified name
    pub fn find_table(&self, name: &str) -> CatalogResult<&TableMetadata> {
        let key = name.trim().to_ascii_uppercase();
        if let Some(table) = self.tables.get(&key) {
            return Ok(table);
        }
        if key.contains('.') {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }

        if let Some(schema) = &self.default_schema {
            let qualified = format!("{}.{}", schema.to_ascii_uppercase(), key);
            if let Some(table) = self.tables.get(&qualified) {
                return Ok(table);
            }
        }

        let matches: Vec<&TableMetadata> = self
            .tables
            .values()
            .filter(|t| t.name.eq_ignore_ascii_case(&key))
            .collect();
        match matches.as_slice() {
            [] => Err(CatalogError::TableNotFound(name.to_string())),
            [table] => Ok(table),
            many => {
                let mut schemas: Vec<String> = many.iter().map(|t| t.schema.clone()).collect();
                schemas.sort();
                Err(CatalogError::AmbiguousTable {
                    name: name.to_string(),
                    schemas,
                })
            }
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.find_table(table).map(|t| t.columns.clone())
    }

    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        let mut tables: Vec<TableMetadata> = self.tables.values().cloned().collect();
        tables.sort_by_key(|t| t.qualified_name());
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    fn sample() -> StaticCatalog {
        StaticCatalog::new()
            .add_table(
                TableMetadata::new("ORDERS", "DBM")
                    .with_columns(vec![ColumnMetadata::new("ID", DataType::Integer)]),
            )
            .add_table(
                TableMetadata::new("ORDERS", "ARCHIVE")
                    .with_columns(vec![ColumnMetadata::new("ID", DataType::Integer)]),
            )
            .add_table(
                TableMetadata::new("CUSTOMER", "DBM")
                    .with_columns(vec![ColumnMetadata::new("NAME", DataType::Varchar(Some(50)))]),
            )
    }

    #[test]
    fn test_qualified_lookup_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.find_table("dbm.orders").unwrap().schema, "DBM");
    }

    #[test]
    fn test_unique_unqualified_lookup() {
        let catalog = sample();
        assert_eq!(catalog.find_table("customer").unwrap().name, "CUSTOMER");
    }

    #[test]
    fn test_ambiguous_unqualified_lookup() {
        let catalog = sample();
        match catalog.find_table("ORDERS") {
            Err(CatalogError::AmbiguousTable { schemas, .. }) => {
                assert_eq!(schemas, vec!["ARCHIVE".to_string(), "DBM".to_string()]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_default_schema_breaks_ambiguity() {
        let catalog = sample().with_default_schema("dbm");
        assert_eq!(catalog.find_table("ORDERS").unwrap().schema, "DBM");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "default_schema": "DBM",
            "tables": [
                {"name": "T", "schema": "DBM", "columns": [
                    {"name": "A", "data_type": "INTEGER", "nullable": false}
                ]}
            ]
        }"#;
        let catalog = StaticCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let table = catalog.find_table("t").unwrap();
        assert_eq!(table.columns[0].data_type, DataType::Integer);
        assert!(!table.columns[0].nullable);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            StaticCatalog::from_json("not json"),
            Err(CatalogError::SerializationError(_))
        ));
    }
}
