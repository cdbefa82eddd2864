// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine Configuration
//!
//! Host-facing settings for caret resolution: how long to wait after the
//! last edit, how far up the scope chain aliases are listed, and how long
//! catalog column lists are cached.
//!
//! ## Example
//!
//! ```rust
//! use sql_scope_completion::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "debounce_ms": 150, "default_schema": "DBM" }"#).unwrap();
//! assert_eq!(config.debounce_ms, 150);
//! assert_eq!(config.cache_ttl_secs, 300);
//! ```

use serde::{Deserialize, Serialize};
use sql_scope_semantic::VisibilityOptions;
use std::time::Duration;

/// Upper bound for the debounce interval
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Main engine configuration
///
/// Missing fields in a JSON document take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause after the last edit before re-resolving (milliseconds)
    pub debounce_ms: u64,

    /// List grandparent and further ancestor aliases as well
    pub include_ancestor_aliases: bool,

    /// Column cache time-to-live in seconds; 0 disables caching
    pub cache_ttl_secs: u64,

    /// Schema used to qualify bare table names before catalog lookup
    pub default_schema: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            include_ancestor_aliases: false,
            cache_ttl_secs: 300,
            default_schema: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - The debounce interval does not exceed [`MAX_DEBOUNCE_MS`]
    /// - A default schema, when given, is not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::InvalidValue {
                field: "debounce_ms",
                reason: format!("must not exceed {MAX_DEBOUNCE_MS}"),
            });
        }

        if self
            .default_schema
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "default_schema",
                reason: "must not be blank".to_string(),
            });
        }

        Ok(())
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_ancestor_aliases(mut self, include: bool) -> Self {
        self.include_ancestor_aliases = include;
        self
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Options passed to the visibility resolver
    pub fn visibility_options(&self) -> VisibilityOptions {
        VisibilityOptions::default().with_ancestor_aliases(self.include_ancestor_aliases)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Document is not valid JSON or has wrongly typed fields
    #[error("Invalid configuration document: {0}")]
    Parse(String),

    /// A field has an out-of-range value
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
