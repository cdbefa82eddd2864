// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cached Catalog
//!
//! Wraps another catalog and remembers column lookups per table for a fixed
//! time-to-live. The scope engine itself stays cache-free; hosts that
//! re-resolve on every pause in typing put this in front of a live catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::metadata::{ColumnMetadata, TableMetadata};
use crate::{Catalog, CatalogResult};

#[derive(Debug, Clone)]
struct CacheEntry {
    loaded_at: Instant,
    columns: Vec<ColumnMetadata>,
}

/// Catalog wrapper with a per-table TTL cache for `get_columns`
///
/// Failed lookups are never cached. `list_tables` is passed through.
pub struct CachedCatalog<C> {
    inner: C,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<C: Catalog> CachedCatalog<C> {
    /// Wrap `inner`, keeping column lists for `ttl`
    pub fn new(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Borrow the wrapped catalog
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop the cached columns of one table
    pub async fn invalidate(&self, table: &str) {
        self.entries.write().await.remove(&cache_key(table));
    }

    /// Drop every cached entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("column cache cleared");
    }

    /// Number of live (unexpired) entries
    pub async fn cached_tables(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| now.duration_since(e.loaded_at) < self.ttl)
            .count()
    }
}

fn cache_key(table: &str) -> String {
    table.trim().to_ascii_uppercase()
}

#[async_trait]
impl<C: Catalog> Catalog for CachedCatalog<C> {
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        let key = cache_key(table);
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.loaded_at.elapsed() < self.ttl {
                    debug!(table = %key, "column cache hit");
                    return Ok(entry.columns.clone());
                }
            }
        }

        debug!(table = %key, "column cache miss");
        let columns = self.inner.get_columns(table).await?;
        self.entries.write().await.insert(
            key,
            CacheEntry {
                loaded_at: Instant::now(),
                columns: columns.clone(),
            },
        );
        Ok(columns)
    }

    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        self.inner.list_tables().await
    }
}
