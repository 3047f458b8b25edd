use std::collections::{HashMap, VecDeque};

/// In-memory map holding at most `capacity` entries.
/// Once full, inserting a new key evicts the oldest one.
pub struct BoundedStore<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    order: VecDeque<String>,
}

impl<V> BoundedStore<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Inserts or replaces a value. Returns the key evicted to make room, if any.
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: String, value: V) -> Option<String> {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }

        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                return Some(oldest);
            }
        }
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut store = BoundedStore::new(2);
        assert_eq!(store.insert("a".to_string(), 1), None);
        assert_eq!(store.insert("b".to_string(), 2), None);
        assert_eq!(store.insert("c".to_string(), 3), Some("a".to_string()));
        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_none());
        assert_eq!(store.get("c"), Some(&3));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut store = BoundedStore::new(2);
        store.insert("a".to_string(), 1);
        store.insert("b".to_string(), 2);
        assert_eq!(store.insert("a".to_string(), 10), None);
        assert_eq!(store.get("a"), Some(&10));
        // "a" is still the oldest entry
        assert_eq!(store.insert("c".to_string(), 3), Some("a".to_string()));
    }

    #[test]
    fn test_remove_frees_a_place() {
        let mut store = BoundedStore::new(2);
        store.insert("a".to_string(), 1);
        store.insert("b".to_string(), 2);
        assert_eq!(store.remove("a"), Some(1));
        assert_eq!(store.remove("a"), None);
        assert_eq!(store.insert("c".to_string(), 3), None);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let mut store = BoundedStore::new(0);
        store.insert("a".to_string(), 1);
        assert_eq!(store.get("a"), Some(&1));
    }
}
