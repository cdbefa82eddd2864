// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Scope Completion
//!
//! Host-side glue between the scope engine and a column catalog.
//!
//! ## Architecture
//!
//! - [`EngineConfig`]: debounce interval, ancestor aliases, cache TTL, default schema
//! - [`Debouncer`]: decides when a pause in typing warrants re-resolution
//! - [`ColumnHydrator`]: fills visible tables' column lists from a [`Catalog`](sql_scope_catalog::Catalog)
//! - [`CompletionContext`]: extract, resolve and hydrate for one caret
//! - [`referenced_tables`]: named tables of the main query, e.g. for prompt context
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sql_scope_completion::{CompletionContext, EngineConfig};
//!
//! let context = CompletionContext::new(EngineConfig::default(), Arc::new(catalog))?;
//! let hydrated = context.resolve("SELECT o. FROM DBM.ORDERS o", 9).await?;
//! for set in &hydrated.visibility.table_columns {
//!     println!("{}: {} columns", set.alias, set.columns.len());
//! }
//! ```

pub mod config;
pub mod context;
pub mod debounce;
pub mod error;
pub mod hydrate;

pub use config::{ConfigError, EngineConfig};
pub use context::{referenced_tables, CompletionContext, HydratedVisibility};
pub use debounce::Debouncer;
pub use error::{CompletionError, CompletionResult};
pub use hydrate::ColumnHydrator;
