use std::sync::Arc;

use inox::{ChunkParseOptions, ChunkSource, InMemorySource, ParseCache, parse_chunk_source};

/// A module that comes from an addressable location.
#[derive(Debug)]
struct RemoteModule {
    url: String,
    code: String,
}

impl RemoteModule {
    fn new(url: &str, code: &str) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_string(),
            code: code.to_string(),
        })
    }
}

impl ChunkSource for RemoteModule {
    fn name(&self) -> &str {
        &self.url
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn resource(&self) -> Option<&str> {
        Some(&self.url)
    }
}

fn cached_options() -> (Arc<ParseCache>, ChunkParseOptions) {
    let cache = Arc::new(ParseCache::new());
    let options = ChunkParseOptions {
        cache: Some(cache.clone()),
        ..ChunkParseOptions::default()
    };
    (cache, options)
}

#[test]
fn same_resource_and_code_returns_the_cached_tree() {
    let (cache, options) = cached_options();

    let first = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 1"), &options).unwrap();
    let second = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 1"), &options).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn syntax_errors_are_cached_too() {
    let (_, options) = cached_options();

    let first = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = ("), &options).unwrap_err();
    let second = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = ("), &options).unwrap_err();

    assert!(Arc::ptr_eq(&first.error, &second.error));
    assert!(Arc::ptr_eq(first.parsed.as_ref().unwrap(), second.parsed.as_ref().unwrap()));
    assert!(first.error.as_syntax().is_some());
}

#[test]
fn modified_code_is_parsed_again() {
    let (cache, options) = cached_options();

    let first = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 1"), &options).unwrap();
    let second = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 2"), &options).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.code_units().len(), 5);
    assert_eq!(cache.len(), 2);
}

#[test]
fn sources_without_a_resource_bypass_the_cache() {
    let (cache, options) = cached_options();

    let first = parse_chunk_source(Arc::new(InMemorySource::new("repl", "a = 1")), &options).unwrap();
    let second = parse_chunk_source(Arc::new(InMemorySource::new("repl", "a = 1")), &options).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(cache.is_empty());
}

#[test]
fn invalidation_forces_a_new_parse() {
    let (cache, options) = cached_options();

    let first = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 1"), &options).unwrap();
    cache.invalidate_all_entries();
    let second = parse_chunk_source(RemoteModule::new("https://example.com/a.ix", "a = 1"), &options).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}
