// Tue Jan 13 2026 - Alex

use crate::structure::type_info::is_valid_custom_type_name;
use crate::structure::{FieldNode, Layout};
use ahash::{AHashMap, AHashSet};
use std::fmt;

/// Identity of a resolved layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    /// A declared type name, shared by every member of that type.
    Named(String),
    /// The structural path of one member.
    Positional(String),
}

impl LayoutKey {
    /// Named when the declared type is a custom identifier, positional otherwise.
    pub fn for_member(node: &FieldNode) -> Self {
        if is_valid_custom_type_name(node.type_name()) {
            Self::Named(node.type_name().to_string())
        } else {
            Self::Positional(node.path().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) | Self::Positional(name) => name,
        }
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "named:{}", name),
            Self::Positional(path) => write!(f, "path:{}", path),
        }
    }
}

/// Layouts resolved during one pass over one batch.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: AHashMap<LayoutKey, Layout>,
    hits: usize,
    misses: usize,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries the member's named key first, then its positional key.
    pub fn lookup(&mut self, node: &FieldNode) -> Option<Layout> {
        let named = match LayoutKey::for_member(node) {
            key @ LayoutKey::Named(_) => self.entries.get(&key).copied(),
            LayoutKey::Positional(_) => None,
        };
        let found = named.or_else(|| {
            self.entries
                .get(&LayoutKey::Positional(node.path().to_string()))
                .copied()
        });
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn get(&self, key: &LayoutKey) -> Option<Layout> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: LayoutKey, layout: Layout) {
        self.entries.insert(key, layout);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Type identities currently being resolved on the recursion stack.
#[derive(Debug, Default, Clone)]
pub struct InProgress {
    keys: AHashSet<LayoutKey>,
}

impl InProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key is already in progress.
    pub fn enter(&mut self, key: LayoutKey) -> bool {
        self.keys.insert(key)
    }

    pub fn leave(&mut self, key: &LayoutKey) {
        self.keys.remove(key);
    }

    pub fn contains(&self, key: &LayoutKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Alignment, TypeDescriptor};

    fn member(path: &str, type_name: &str) -> FieldNode {
        FieldNode::new(
            path.rsplit('/').next().unwrap_or(path).to_string(),
            path.to_string(),
            type_name.to_string(),
            TypeDescriptor::parse_lossy(type_name),
        )
    }

    #[test]
    fn test_key_selection() {
        assert_eq!(LayoutKey::for_member(&member("A/b", "Config")), LayoutKey::Named("Config".to_string()));
        assert_eq!(LayoutKey::for_member(&member("A/b", "int64")), LayoutKey::Positional("A/b".to_string()));
        assert_eq!(LayoutKey::for_member(&member("A/c", "[]Config")), LayoutKey::Positional("A/c".to_string()));
    }

    #[test]
    fn test_named_lookup_shared_across_paths() {
        let mut cache = LayoutCache::new();
        let layout = Layout::new(24, Alignment::new(8).unwrap());
        cache.insert(LayoutKey::for_member(&member("A/x", "Config")), layout);

        assert_eq!(cache.lookup(&member("B/y", "Config")), Some(layout));
        assert_eq!(cache.lookup(&member("B/z", "int8")), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_named_falls_back_to_positional() {
        let mut cache = LayoutCache::new();
        let layout = Layout::new(4, Alignment::new(4).unwrap());
        cache.insert(LayoutKey::Positional("A/x".to_string()), layout);
        assert_eq!(cache.lookup(&member("A/x", "Other")), Some(layout));
    }

    #[test]
    fn test_in_progress_guard() {
        let mut guard = InProgress::new();
        let key = LayoutKey::Named("Node".to_string());
        assert!(guard.enter(key.clone()));
        assert!(!guard.enter(key.clone()));
        guard.leave(&key);
        assert!(guard.is_empty());
    }
}
