//! Spill store: exact fallback for hash-colliding strings.
//!
//! Holds the rare strings whose content hash collides with a different
//! string already resident in the primary index. Lookups here are exact
//! (keyed by the string itself, not its content hash), so membership can
//! never produce a false positive. By construction every spilled entry is
//! shadowed by a resident entry sharing its hash; the containers maintain
//! that invariant eagerly on removal.

use hashbrown::HashMap;

/// `Spill<String>` backs the map, `Spill<()>` the set.
#[derive(Debug, Default)]
pub(crate) struct Spill<V> {
    entries: HashMap<String, V>,
}

impl<V> Spill<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_capacity(entries: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Overwrites and returns any previous value for the same key.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    /// Find a spilled key by predicate; used to promote a collider after
    /// its shadowing resident is removed. O(len), and the spill is rare
    /// by construction.
    pub fn find_key<F>(&self, mut pred: F) -> Option<&str>
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.keys().map(String::as_str).find(|&k| pred(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: exact membership; insert overwrites per key.
    #[test]
    fn insert_get_overwrite() {
        let mut s: Spill<String> = Spill::new();
        assert_eq!(s.insert("k".to_string(), "v1".to_string()), None);
        assert_eq!(
            s.insert("k".to_string(), "v2".to_string()),
            Some("v1".to_string())
        );
        assert_eq!(s.get("k").map(String::as_str), Some("v2"));
        assert_eq!(s.len(), 1);
        assert!(s.contains("k"));
        assert!(!s.contains("other"));
    }

    /// Invariant: remove returns the owned value exactly once.
    #[test]
    fn remove_is_single_shot() {
        let mut s: Spill<()> = Spill::new();
        s.insert("member".to_string(), ());
        assert_eq!(s.remove("member"), Some(()));
        assert_eq!(s.remove("member"), None);
        assert_eq!(s.len(), 0);
    }

    /// Invariant: `find_key` sees every live key.
    #[test]
    fn find_key_scans_all() {
        let mut s: Spill<()> = Spill::with_capacity(4);
        for k in ["a", "bb", "ccc"] {
            s.insert(k.to_string(), ());
        }
        assert_eq!(s.find_key(|k| k.len() == 2), Some("bb"));
        assert_eq!(s.find_key(|k| k.len() == 4), None);
    }
}
