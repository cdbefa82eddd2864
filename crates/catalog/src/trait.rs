// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for column lookup
//!
//! The scope engine only decides *which* tables need columns; the host asks
//! an implementation of this trait for the columns themselves.

use std::sync::Arc;

use crate::error::CatalogResult;
use crate::metadata::{ColumnMetadata, TableMetadata};

/// Catalog trait for database schema abstraction
///
/// Implementations can connect to live databases, read from static files, or
/// wrap another catalog with a cache (see [`crate::CachedCatalog`]).
///
/// # Examples
///
/// ```rust,ignore
/// use sql_scope_catalog::{Catalog, CatalogError};
///
/// async fn column_names(catalog: &impl Catalog, table: &str) -> Result<Vec<String>, CatalogError> {
///     let columns = catalog.get_columns(table).await?;
///     Ok(columns.into_iter().map(|c| c.name).collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Get column metadata for a specific table
    ///
    /// # Arguments
    ///
    /// * `table` - Table name, optionally schema-qualified (`"SCHEMA.TABLE"`)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>>;

    /// List all tables known to the catalog
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>>;
}

/// Forwarding impl for shared catalogs such as `Arc<dyn Catalog>`
#[async_trait::async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        (**self).get_columns(table).await
    }

    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        (**self).list_tables().await
    }
}
