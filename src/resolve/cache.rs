//! Session cache for variable metadata.
//!
//! Caches every successfully resolved variable so repeated scans in one
//! session fetch each id at most once. Entries are never evicted or
//! invalidated automatically: a variable renamed mid-session keeps reporting
//! its old metadata until [`VariableCache::reset`] is called.

use std::collections::HashMap;

use super::VariableMetadata;

/// In-memory, append-only metadata cache. Lives as long as the engine that
/// owns it; a single scan only ever adds entries.
#[derive(Debug, Default)]
pub struct VariableCache {
    entries: HashMap<String, VariableMetadata>,
}

impl VariableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&VariableMetadata> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Store resolved metadata, keyed by its variable id.
    pub fn insert(&mut self, metadata: VariableMetadata) {
        self.entries.insert(metadata.id.clone(), metadata);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. The only way stale metadata leaves the session.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::VariableType;

    fn meta(id: &str, name: &str) -> VariableMetadata {
        VariableMetadata {
            id: id.to_string(),
            name: name.to_string(),
            resolved_type: VariableType::Color,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = VariableCache::new();
        cache.insert(meta("v1", "colors/primary"));

        assert!(cache.contains("v1"));
        assert_eq!(cache.get("v1").unwrap().name, "colors/primary");
        assert!(cache.get("v2").is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut cache = VariableCache::new();
        cache.insert(meta("v1", "a"));
        cache.insert(meta("v2", "b"));
        assert_eq!(cache.len(), 2);

        cache.reset();
        assert!(cache.is_empty());
        assert!(!cache.contains("v1"));
    }

    #[test]
    fn test_insert_overwrites_same_id() {
        let mut cache = VariableCache::new();
        cache.insert(meta("v1", "old"));
        cache.insert(meta("v1", "new"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("v1").unwrap().name, "new");
    }
}
