/// Keyword filters and their hit counters, kept in insertion order.
///
/// Only ever touched from the session's event loop, so it carries no locking.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    filters: Vec<(String, u64)>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword with a zero counter. Returns false if it already exists.
    pub fn add(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if self.contains(&keyword) {
            return false;
        }
        self.filters.push((keyword, 0));
        true
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|(k, _)| k != keyword);
        self.filters.len() != before
    }

    /// Remove everything, returning how many filters were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.filters.len();
        self.filters.clear();
        count
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.filters.iter().any(|(k, _)| k == keyword)
    }

    pub fn count(&self, keyword: &str) -> Option<u64> {
        self.filters.iter().find(|(k, _)| k == keyword).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.filters.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_clear() {
        let mut filters = FilterRegistry::new();
        assert!(filters.add("rust"));
        assert!(filters.add("multi word"));
        assert!(!filters.add("rust"));
        assert_eq!(filters.len(), 2);
        assert_eq!(filters.count("rust"), Some(0));

        assert!(filters.remove("rust"));
        assert!(!filters.remove("rust"));
        assert_eq!(filters.count("rust"), None);

        assert_eq!(filters.clear(), 1);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_insertion_order() {
        let mut filters = FilterRegistry::new();
        filters.add("b");
        filters.add("a");
        filters.add("c");
        let keys: Vec<&str> = filters.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
