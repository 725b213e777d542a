//! Process-wide record-type registry.
//!
//! Single `DashMap<TableId, Arc<RecordType>>` shared by all request
//! workers. Lock-free concurrent access; `Arc`-based cloning keeps reads
//! cheap. A first-access race on one table may synthesize the type twice;
//! both results are equivalent and either may win the slot, which is
//! acceptable since synthesis is pure over the metadata passed in. Entries
//! never expire: metadata mutators must call [`RecordTypeRegistry::invalidate`].

use crate::error::SchemaError;
use crate::record_type::{synthesize, RecordType};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tabularium_commons::models::{Field, Slug, Table, TableId};

/// Registry counters, exposed for operational visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Process-wide cache of synthesized record types keyed by `TableId`.
#[derive(Debug, Default)]
pub struct RecordTypeRegistry {
    cache: DashMap<TableId, Arc<RecordType>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record type for a table, if one was synthesized already.
    pub fn get(&self, table_id: TableId) -> Option<Arc<RecordType>> {
        match self.cache.get(&table_id) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Get the record type for a table, synthesizing and caching it on a
    /// miss.
    ///
    /// `bypass_cache` forces a fresh synthesis whose result replaces the
    /// cached entry; use it after mutating table or field metadata when the
    /// new rows are already at hand (otherwise call `invalidate` first).
    pub fn get_or_synthesize(
        &self,
        slug: &Slug,
        table: &Table,
        fields: &[Field],
        bypass_cache: bool,
    ) -> Result<Arc<RecordType>, SchemaError> {
        if !bypass_cache {
            if let Some(cached) = self.get(table.id) {
                return Ok(cached);
            }
        }

        let record_type = Arc::new(synthesize(slug, table, fields)?);
        log::debug!(
            "Synthesized record type {} for table {}",
            record_type.type_name,
            table.id
        );
        self.cache.insert(table.id, Arc::clone(&record_type));
        Ok(record_type)
    }

    /// Drop the cached type for a table. Returns whether an entry existed.
    ///
    /// Metadata mutation does NOT invalidate automatically; callers that
    /// edit tables or fields own this call.
    pub fn invalidate(&self, table_id: TableId) -> bool {
        let removed = self.cache.remove(&table_id).is_some();
        if removed {
            log::info!("Invalidated record type for table {}", table_id);
        }
        removed
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entries: self.cache.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
