// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Scope - Catalog Layer
//!
//! This crate is the column lookup collaborator of the scope engine. The
//! engine reports which tables are visible at the caret; the host turns those
//! table names into column lists through the [`Catalog`] trait defined here.
//!
//! ## Implementations
//!
//! - [`StaticCatalog`]: in-memory tables, optionally loaded from JSON
//! - [`CachedCatalog`]: TTL cache in front of any other catalog
//!
//! ## Metadata Types
//!
//! - [`TableMetadata`]: Table name, schema and columns
//! - [`ColumnMetadata`]: Column name, type, nullability, primary key flag
//! - [`DataType`]: SQL data type representation
//!
//! ## Implementing the Catalog Trait
//!
//! ```rust,ignore
//! use sql_scope_catalog::{Catalog, CatalogResult, ColumnMetadata, TableMetadata};
//! use async_trait::async_trait;
//!
//! struct MyCatalog;
//!
//! #[async_trait]
//! impl Catalog for MyCatalog {
//!     async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
//!         // Your implementation here
//!     }
//!
//!     async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
//!         // Your implementation here
//!     }
//! }
//! ```

pub mod cached;
pub mod error;
pub mod metadata;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use cached::CachedCatalog;
pub use error::{CatalogError, CatalogResult};
pub use metadata::{ColumnMetadata, DataType, TableMetadata};
pub use r#static::StaticCatalog;
pub use r#trait::Catalog;
