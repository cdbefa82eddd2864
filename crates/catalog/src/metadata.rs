// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! These are the records a column lookup hands back to the host: one
//! [`ColumnMetadata`] per column (name, data type, nullability, primary-key
//! flag) grouped under a [`TableMetadata`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL data type as reported by a catalog
///
/// Catalog files spell types as plain strings (`"VARCHAR(40)"`), so the
/// serde representation goes through [`DataType::parse`] and `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    // Numeric types
    SmallInt,
    Integer,
    BigInt,
    Decimal(Option<u32>, Option<u32>),
    Real,
    Double,

    // String types
    Char(Option<usize>),
    Varchar(Option<usize>),
    Clob,
    Text,

    // Binary types
    Binary,
    Blob,

    // Date/Time types
    Date,
    Time,
    Timestamp,

    Boolean,
    Xml,
    Json,

    // Unknown/Other (with original type name)
    Other(String),
}

impl DataType {
    /// Parse a catalog type name such as `VARCHAR(40)` or `DECIMAL(10,2)`
    ///
    /// Unknown names are preserved as [`DataType::Other`].
    pub fn parse(type_name: &str) -> Self {
        let trimmed = type_name.trim();
        let (base, args) = match trimmed.find('(') {
            Some(open) => {
                let close = trimmed.rfind(')').unwrap_or(trimmed.len());
                let inner = if close > open { &trimmed[open + 1..close] } else { "" };
                (trimmed[..open].trim(), Some(inner))
            }
            None => (trimmed, None),
        };
        let mut numbers = args
            .into_iter()
            .flat_map(|a| a.split(','))
            .map(|n| n.trim().parse::<u32>().ok());
        let first = numbers.next().flatten();
        let second = numbers.next().flatten();

        match base.to_ascii_uppercase().as_str() {
            "SMALLINT" | "INT2" => DataType::SmallInt,
            "INT" | "INTEGER" | "INT4" => DataType::Integer,
            "BIGINT" | "INT8" => DataType::BigInt,
            "DECIMAL" | "NUMERIC" | "DEC" => DataType::Decimal(first, second),
            "REAL" | "FLOAT4" => DataType::Real,
            "DOUBLE" | "DOUBLE PRECISION" | "FLOAT" | "FLOAT8" => DataType::Double,
            "CHAR" | "CHARACTER" => DataType::Char(first.map(|n| n as usize)),
            "VARCHAR" | "CHARACTER VARYING" => DataType::Varchar(first.map(|n| n as usize)),
            "CLOB" => DataType::Clob,
            "TEXT" => DataType::Text,
            "BINARY" | "VARBINARY" => DataType::Binary,
            "BLOB" | "BYTEA" => DataType::Blob,
            "DATE" => DataType::Date,
            "TIME" => DataType::Time,
            "TIMESTAMP" | "DATETIME" => DataType::Timestamp,
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "XML" => DataType::Xml,
            "JSON" | "JSONB" => DataType::Json,
            _ => DataType::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::SmallInt => write!(f, "SMALLINT"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Decimal(Some(p), Some(s)) => write!(f, "DECIMAL({p},{s})"),
            DataType::Decimal(Some(p), None) => write!(f, "DECIMAL({p})"),
            DataType::Decimal(None, _) => write!(f, "DECIMAL"),
            DataType::Real => write!(f, "REAL"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Char(Some(n)) => write!(f, "CHAR({n})"),
            DataType::Char(None) => write!(f, "CHAR"),
            DataType::Varchar(Some(n)) => write!(f, "VARCHAR({n})"),
            DataType::Varchar(None) => write!(f, "VARCHAR"),
            DataType::Clob => write!(f, "CLOB"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Binary => write!(f, "BINARY"),
            DataType::Blob => write!(f, "BLOB"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Xml => write!(f, "XML"),
            DataType::Json => write!(f, "JSON"),
            DataType::Other(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        DataType::parse(&value)
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether this is a primary key column
    #[serde(default)]
    pub is_primary_key: bool,
    /// Column comment/description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    /// Create a new column metadata with builder pattern
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            is_primary_key: false,
            comment: None,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: mark as primary key (implies NOT NULL)
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Metadata for a database table or view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Schema name
    pub schema: String,
    /// Column definitions
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Table comment/description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TableMetadata {
    /// Create new table metadata with builder pattern
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            comment: None,
        }
    }

    /// Builder method: add columns
    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// `SCHEMA.NAME`, or just the name when the schema is empty
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    /// Get column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get primary key columns
    pub fn primary_keys(&self) -> Vec<&ColumnMetadata> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }
}
