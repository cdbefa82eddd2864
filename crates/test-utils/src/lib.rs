// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sql-scope
//!
//! This crate provides common testing components including:
//! - Mock catalog implementations
//! - Column metadata assertions
//! - Sample SQL fixtures and caret markers

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::SqlAssertions;
pub use fixtures::{split_caret, SqlFixtures, CARET_MARKER};
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
