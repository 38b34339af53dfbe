//! Status cache for probed URLs
//!
//! Remembers the HTTP status observed for each URL during a run so that a
//! link target is probed at most once, no matter how many pages link to it.

use std::collections::HashMap;
use url::Url;

/// Maps a normalized URL to the first status observed for it
#[derive(Debug, Default)]
pub struct StatusCache {
    statuses: HashMap<Url, u16>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached status for `url`, if it has been observed
    pub fn lookup(&self, url: &Url) -> Option<u16> {
        self.statuses.get(url).copied()
    }

    /// Records a status for `url`
    ///
    /// The first write for a key wins; later writes are ignored.
    ///
    /// # Returns
    ///
    /// * `true` - The status was recorded
    /// * `false` - A status was already known for this URL
    pub fn record(&mut self, url: Url, status: u16) -> bool {
        match self.statuses.entry(url) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(status);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_lookup_miss() {
        let cache = StatusCache::new();
        assert_eq!(cache.lookup(&url("http://a.test/")), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_record_then_lookup() {
        let mut cache = StatusCache::new();
        assert!(cache.record(url("http://a.test/"), 200));
        assert_eq!(cache.lookup(&url("http://a.test/")), Some(200));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_write_wins() {
        let mut cache = StatusCache::new();
        assert!(cache.record(url("http://a.test/x"), 404));
        assert!(!cache.record(url("http://a.test/x"), 200));
        assert_eq!(cache.lookup(&url("http://a.test/x")), Some(404));
        assert_eq!(cache.len(), 1);
    }
}
