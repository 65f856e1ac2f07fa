//! Cache of parse results keyed by source code and resource location.
//!
//! Entries hold the complete result of [`crate::parse_chunk_source`], syntax errors included, so a
//! hit returns the very same `Arc`s as the parse that populated it.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::parsed_chunk::ParseSourceResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: String,
    code: String,
}

/// Thread-safe parse cache.
///
/// ## Notes
/// - Lookups take a read lock, insertions a write lock. Values are immutable once inserted.
/// - Invalidation is all-or-nothing.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: RwLock<HashMap<CacheKey, ParseSourceResult>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of a previous parse of `code` loaded from `resource`.
    pub fn get(&self, resource: &str, code: &str) -> Option<ParseSourceResult> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let key = CacheKey {
            resource: resource.to_string(),
            code: code.to_string(),
        };
        let found = entries.get(&key).cloned();
        if found.is_some() {
            tracing::debug!(resource, "parse cache hit");
        } else {
            tracing::debug!(resource, "parse cache miss");
        }
        found
    }

    /// Store a parse result, replacing any previous result for the same key.
    pub fn put(&self, resource: &str, code: &str, result: ParseSourceResult) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            CacheKey {
                resource: resource.to_string(),
                code: code.to_string(),
            },
            result,
        );
    }

    pub fn invalidate_all_entries(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(count = entries.len(), "invalidating parse cache");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::parsed_chunk::{ChunkParseOptions, parse_chunk_source};
    use crate::source::InMemorySource;

    fn parsed(code: &str) -> ParseSourceResult {
        parse_chunk_source(Arc::new(InMemorySource::new("test", code)), &ChunkParseOptions::default())
    }

    #[test]
    fn test_get_put() {
        let cache = ParseCache::new();
        assert!(cache.get("/a.ix", "1").is_none());

        cache.put("/a.ix", "1", parsed("1"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/a.ix", "1").is_some());
        assert!(cache.get("/a.ix", "2").is_none());
        assert!(cache.get("/b.ix", "1").is_none());
    }

    #[test]
    fn test_put_replaces_entry() {
        let cache = ParseCache::new();
        cache.put("/a.ix", "1", parsed("1"));
        cache.put("/a.ix", "1", parsed("1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_all_entries() {
        let cache = ParseCache::new();
        cache.put("/a.ix", "1", parsed("1"));
        cache.put("/b.ix", "?", parsed("?"));
        assert_eq!(cache.len(), 2);

        cache.invalidate_all_entries();
        assert!(cache.is_empty());
        assert!(cache.get("/a.ix", "1").is_none());
    }
}
