// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the catalog crate

use std::sync::Arc;
use std::time::Duration;

use sql_scope_catalog::{CachedCatalog, Catalog, CatalogError, DataType, StaticCatalog};

const CATALOG_JSON: &str = r#"{
    "default_schema": "DBM",
    "tables": [
        {
            "name": "ORDERS",
            "schema": "DBM",
            "comment": "Customer orders",
            "columns": [
                { "name": "ID", "data_type": "BIGINT", "nullable": false, "is_primary_key": true },
                { "name": "AMOUNT", "data_type": "DECIMAL(12,2)" },
                { "name": "STATUS", "data_type": "CHAR(1)", "nullable": false }
            ]
        },
        {
            "name": "ORDERS",
            "schema": "ARCHIVE",
            "columns": [
                { "name": "ID", "data_type": "BIGINT" }
            ]
        },
        {
            "name": "CUSTOMERS",
            "schema": "CRM",
            "columns": [
                { "name": "ID", "data_type": "INTEGER" },
                { "name": "NAME", "data_type": "VARCHAR(100)" }
            ]
        }
    ]
}"#;

fn load() -> StaticCatalog {
    StaticCatalog::from_json(CATALOG_JSON).unwrap()
}

#[tokio::test]
async fn test_catalog_trait_object() {
    let catalog: Arc<dyn Catalog> = Arc::new(load());

    let tables = catalog.list_tables().await.unwrap();
    let names: Vec<String> = tables.iter().map(|t| t.qualified_name()).collect();
    assert_eq!(names, vec!["ARCHIVE.ORDERS", "CRM.CUSTOMERS", "DBM.ORDERS"]);

    let columns = catalog.get_columns("dbm.orders").await.unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[1].data_type, DataType::Decimal(Some(12), Some(2)));
    assert!(columns[0].is_primary_key);
}

#[tokio::test]
async fn test_unqualified_lookup_rules() {
    let catalog = load();

    // default schema wins over other schemas
    let orders = catalog.get_columns("ORDERS").await.unwrap();
    assert_eq!(orders.len(), 3);

    // unique name in a non-default schema
    let customers = catalog.get_columns("customers").await.unwrap();
    assert_eq!(customers.len(), 2);

    let missing = catalog.get_columns("CRM.ORDERS").await;
    assert_eq!(missing, Err(CatalogError::TableNotFound("CRM.ORDERS".to_string())));
}

#[tokio::test]
async fn test_ambiguous_without_default_schema() {
    let json = CATALOG_JSON.replace(r#""default_schema": "DBM","#, "");
    let catalog = StaticCatalog::from_json(&json).unwrap();

    match catalog.get_columns("orders").await {
        Err(CatalogError::AmbiguousTable { schemas, .. }) => {
            assert_eq!(schemas, vec!["ARCHIVE", "DBM"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_documents() {
    assert!(matches!(
        StaticCatalog::from_json("{ not json"),
        Err(CatalogError::SerializationError(_))
    ));
    assert!(matches!(
        StaticCatalog::from_json(r#"{"tables": [{"name": " ", "schema": "X"}]}"#),
        Err(CatalogError::ConfigurationError(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cached_static_catalog() {
    let catalog = CachedCatalog::new(load(), Duration::from_secs(60));

    let first = catalog.get_columns("DBM.ORDERS").await.unwrap();
    let second = catalog.get_columns("dbm.orders").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(catalog.cached_tables().await, 1);

    catalog.clear().await;
    assert_eq!(catalog.cached_tables().await, 0);
    assert_eq!(catalog.inner().len(), 3);
}
