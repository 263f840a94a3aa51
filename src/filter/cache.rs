//! Filter parsing cache keyed by the JSON text of a filter array

use crate::error::Result;
use crate::filter::builder::FilterBuilder;
use crate::filter::composite::AndNode;
use ahash::AHashMap;
use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Upper bound on cached filter texts
pub const MAX_CACHED_FILTERS: usize = 256;

/// Global filter cache with fast hashing (ahash)
static FILTER_CACHE: Lazy<RwLock<AHashMap<String, AndNode>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(MAX_CACHED_FILTERS);
    RwLock::new(map)
});

/// Get or parse a filter from JSON text, using the cache for repeated definitions
pub fn get_or_parse(json: &str, is_root: bool) -> Result<FilterBuilder> {
    // Fast path: check read lock first
    {
        let cache = FILTER_CACHE.read();
        if let Some(filter) = cache.get(json) {
            return Ok(FilterBuilder::from_filter(filter.clone(), is_root));
        }
    }

    // Slow path: parse and cache
    debug!("Filter cache miss ({} bytes)", json.len());
    let builder = FilterBuilder::from_json(json, is_root)?;

    {
        let mut cache = FILTER_CACHE.write();
        insert_bounded(&mut cache, json, builder.filter());
    }

    Ok(builder)
}

/// Insert under the size cap; a full cache is dropped wholesale before a new key goes in
fn insert_bounded(cache: &mut AHashMap<String, AndNode>, json: &str, filter: &AndNode) {
    if cache.len() >= MAX_CACHED_FILTERS && !cache.contains_key(json) {
        debug!("Filter cache full ({} entries), clearing", cache.len());
        cache.clear();
    }
    cache.insert(json.to_string(), filter.clone());
}

/// Clear the filter cache
pub fn clear_cache() {
    let mut cache = FILTER_CACHE.write();
    cache.clear();
}

/// Number of cached filters
pub fn cache_size() -> usize {
    let cache = FILTER_CACHE.read();
    cache.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use parking_lot::{const_mutex, Mutex};

    // Tests touching the global cache run one at a time
    static CACHE_LOCK: Mutex<()> = const_mutex(());

    fn leaf_text(property: &str, value: usize) -> String {
        format!(r#"[{{"operation":"=","property":"{}","value":{}}}]"#, property, value)
    }

    #[test]
    fn test_cache_hit_keeps_tree() {
        let _guard = CACHE_LOCK.lock();
        let text = r#"[{"operation":"=","property":"cache_hit","value":1}]"#;

        let first = get_or_parse(text, false).unwrap();
        assert!(FILTER_CACHE.read().get(text).is_some());

        let second = get_or_parse(text, true).unwrap();
        assert_eq!(first.filter(), second.filter());
        assert!(!first.is_root_filter());
        assert!(second.is_root_filter());
    }

    #[test]
    fn test_failed_parse_not_cached() {
        let _guard = CACHE_LOCK.lock();
        let text = r#"[{"operation":"NAND","children":[]}]"#;
        let err = get_or_parse(text, false).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterOperation(_)));
        assert!(FILTER_CACHE.read().get(text).is_none());
    }

    #[test]
    fn test_cache_stays_bounded() {
        let _guard = CACHE_LOCK.lock();
        for i in 0..MAX_CACHED_FILTERS * 2 + 7 {
            let text = leaf_text("bounded", i);
            get_or_parse(&text, false).unwrap();
            assert!(cache_size() <= MAX_CACHED_FILTERS);
            assert!(FILTER_CACHE.read().get(&text).is_some());
        }
    }

    #[test]
    fn test_full_cache_keeps_existing_key() {
        let filter = AndNode::new();
        let mut cache = AHashMap::new();
        for i in 0..MAX_CACHED_FILTERS {
            insert_bounded(&mut cache, &leaf_text("full", i), &filter);
        }
        assert_eq!(cache.len(), MAX_CACHED_FILTERS);

        // Re-inserting a present key does not trigger a reset
        insert_bounded(&mut cache, &leaf_text("full", 0), &filter);
        assert_eq!(cache.len(), MAX_CACHED_FILTERS);

        insert_bounded(&mut cache, &leaf_text("full", MAX_CACHED_FILTERS), &filter);
        assert_eq!(cache.len(), 1);
    }
}
