//! Extraction results keyed by file identity.
//!
//! Keys are `{filename}-{mtime_ms}`, so editing a file makes its old entry
//! unreachable. Nothing is persisted; a restart starts cold.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::models::ExtractedRecord;

/// Cache key for a file as it currently exists on disk.
pub fn cache_key(filename: &str, modified_ms: u128) -> String {
    format!("{}-{}", filename, modified_ms)
}

/// Storage for extraction results.
#[async_trait]
pub trait ExtractionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ExtractedRecord>>;

    async fn set(&self, key: &str, record: ExtractedRecord) -> Result<()>;

    /// Drop every entry, returning how many were removed.
    async fn clear(&self) -> Result<usize>;

    async fn len(&self) -> Result<usize>;
}

/// Process-lifetime cache; safe for concurrent readers and writers.
#[derive(Default)]
pub struct MemoryExtractionCache {
    entries: DashMap<String, ExtractedRecord>,
}

impl MemoryExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtractionCache for MemoryExtractionCache {
    async fn get(&self, key: &str) -> Result<Option<ExtractedRecord>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, record: ExtractedRecord) -> Result<()> {
        self.entries.insert(key.to_string(), record);
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let count = self.entries.len();
        self.entries.clear();
        Ok(count)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}
