//! Reviewer corrections, held per document id for the life of the process.

use std::collections::HashSet;

use dashmap::DashMap;

use super::models::FieldOverrides;

#[derive(Default)]
pub struct OverrideStore {
    patches: DashMap<String, FieldOverrides>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overrides for a document (empty when none).
    pub fn get(&self, document_id: &str) -> FieldOverrides {
        self.patches
            .get(document_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Merge `patch` into the document's overrides; later values win.
    pub fn merge(&self, document_id: &str, patch: FieldOverrides) -> FieldOverrides {
        let mut entry = self.patches.entry(document_id.to_string()).or_default();
        entry.extend(patch);
        entry.value().clone()
    }

    /// Remove every override for a document. Returns whether any existed.
    pub fn clear(&self, document_id: &str) -> bool {
        self.patches.remove(document_id).is_some()
    }

    /// Drop overrides for documents outside `current`. Returns how many went.
    pub fn retain_documents(&self, current: &HashSet<&str>) -> usize {
        let before = self.patches.len();
        self.patches.retain(|id, _| current.contains(id.as_str()));
        before - self.patches.len()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}
