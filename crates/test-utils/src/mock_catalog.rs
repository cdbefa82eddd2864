// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use sql_scope_catalog::{Catalog, CatalogError, CatalogResult, ColumnMetadata, DataType, TableMetadata};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory mock catalog for testing
///
/// Lookups accept `SCHEMA.TABLE` or a bare table name, case-insensitively.
/// Every `get_columns` call is counted so caching layers can be checked.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    tables: HashMap<String, TableMetadata>,
    unavailable: HashSet<String>,
    lookups: Arc<AtomicUsize>,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        self.tables.insert(table.qualified_name().to_ascii_uppercase(), table);
        self
    }

    /// Make lookups of `name` fail with a connection error
    pub fn add_unavailable(mut self, name: &str) -> Self {
        self.unavailable.insert(name.to_ascii_uppercase());
        self
    }

    /// Get a table by qualified or bare name
    pub fn get_table(&self, name: &str) -> Option<&TableMetadata> {
        let key = name.trim().to_ascii_uppercase();
        self.tables
            .get(&key)
            .or_else(|| self.tables.values().find(|t| t.name.eq_ignore_ascii_case(&key)))
    }

    /// Number of `get_columns` calls served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.contains(&table.trim().to_ascii_uppercase()) {
            return Err(CatalogError::ConnectionFailed(format!("mock catalog offline for {table}")));
        }
        self.get_table(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| CatalogError::TableNotFound(table.to_string()))
    }

    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        let mut tables: Vec<TableMetadata> = self.tables.values().cloned().collect();
        tables.sort_by_key(|t| t.qualified_name());
        Ok(tables)
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard test schema: `DBM.ORDERS`, `DBM.CUSTOMERS`,
    /// `DBM.ITEMS` and `DBM.VIP_CUSTOMERS`
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_table(
                TableMetadata::new("ORDERS", "DBM")
                    .with_columns(vec![
                        ColumnMetadata::new("ID", DataType::BigInt).with_primary_key(),
                        ColumnMetadata::new("CUST_ID", DataType::BigInt).with_nullable(false),
                        ColumnMetadata::new("ORDER_DATE", DataType::Date),
                        ColumnMetadata::new("AMOUNT", DataType::Decimal(Some(12), Some(2))),
                        ColumnMetadata::new("STATUS", DataType::Char(Some(1))).with_nullable(false),
                    ])
                    .with_comment("Customer orders"),
            )
            .add_table(
                TableMetadata::new("CUSTOMERS", "DBM").with_columns(vec![
                    ColumnMetadata::new("ID", DataType::BigInt).with_primary_key(),
                    ColumnMetadata::new("NAME", DataType::Varchar(Some(100))).with_nullable(false),
                    ColumnMetadata::new("REGION", DataType::Varchar(Some(20))),
                ]),
            )
            .add_table(
                TableMetadata::new("ITEMS", "DBM").with_columns(vec![
                    ColumnMetadata::new("ID", DataType::BigInt).with_primary_key(),
                    ColumnMetadata::new("ORDER_ID", DataType::BigInt).with_nullable(false),
                    ColumnMetadata::new("PRODUCT", DataType::Varchar(Some(60))),
                    ColumnMetadata::new("QTY", DataType::Integer),
                ]),
            )
            .add_table(
                TableMetadata::new("VIP_CUSTOMERS", "DBM").with_columns(vec![
                    ColumnMetadata::new("ID", DataType::BigInt).with_primary_key(),
                    ColumnMetadata::new("TIER", DataType::SmallInt),
                ]),
            );

        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Make lookups of one table fail
    pub fn with_unavailable(mut self, name: &str) -> Self {
        self.catalog = self.catalog.add_unavailable(name);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}
