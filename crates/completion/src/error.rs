// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use sql_scope_catalog::CatalogError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Completion errors
///
/// Scope extraction itself never fails; errors come from the configuration
/// or from catalog calls whose failure cannot be degraded to an empty result.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Catalog-related error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
