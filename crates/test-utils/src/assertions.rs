// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Column metadata assertions

use sql_scope_catalog::{ColumnMetadata, DataType};

/// Custom assertion helpers for catalog-backed tests
pub struct SqlAssertions;

impl SqlAssertions {
    /// Assert that a column has the given properties
    pub fn assert_column(column: &ColumnMetadata, name: &str, data_type: DataType, nullable: bool) {
        assert_eq!(column.name, name, "Column name mismatch");
        assert_eq!(column.data_type, data_type, "Column data type mismatch");
        assert_eq!(column.nullable, nullable, "Column nullable mismatch");
    }

    /// Assert that a column is a primary key
    pub fn assert_primary_key(column: &ColumnMetadata) {
        assert!(
            column.is_primary_key,
            "Column '{}' is not a primary key",
            column.name
        );
    }

    /// Assert the column names, in order
    pub fn assert_column_names(columns: &[ColumnMetadata], expected: &[&str]) {
        let actual: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(actual, expected, "Column names mismatch");
    }
}
