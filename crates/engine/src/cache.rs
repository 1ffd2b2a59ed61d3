//! Explicit in-memory cache for slow-changing lookup lists.
//!
//! One instance is owned by the application and passed where needed; there
//! is no ambient global state. Each entity kind has a fixed invalidation
//! key, and refreshes go through `fresh`: a caller that wants to force a
//! refetch says so explicitly.

use std::collections::HashMap;

/// Cached entity kinds and their invalidation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Safes,
    AreaTags,
    Industries,
    ClientTypes,
}

impl LookupKind {
    /// The fixed cache key for this kind.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Safes => "safes",
            Self::AreaTags => "area_tags",
            Self::Industries => "industries",
            Self::ClientTypes => "client_types",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<&'static str, Vec<LookupEntry>>,
}

impl LookupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the cached list may be used as-is; `false` means the
    /// caller should refetch (missing entry, or an explicit force).
    #[must_use]
    pub fn fresh(&self, kind: LookupKind, force_refresh: bool) -> bool {
        !force_refresh && self.entries.contains_key(kind.key())
    }

    #[must_use]
    pub fn get(&self, kind: LookupKind) -> Option<&[LookupEntry]> {
        self.entries.get(kind.key()).map(Vec::as_slice)
    }

    pub fn put(&mut self, kind: LookupKind, entries: Vec<LookupEntry>) {
        self.entries.insert(kind.key(), entries);
    }

    pub fn invalidate(&mut self, kind: LookupKind) {
        self.entries.remove(kind.key());
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str) -> LookupEntry {
        LookupEntry {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn fresh_reflects_presence_and_force() {
        let mut cache = LookupCache::new();
        assert!(!cache.fresh(LookupKind::Safes, false));

        cache.put(LookupKind::Safes, vec![entry(1, "Cassa centrale")]);
        assert!(cache.fresh(LookupKind::Safes, false));
        assert!(!cache.fresh(LookupKind::Safes, true));
        assert!(!cache.fresh(LookupKind::Industries, false));
    }

    #[test]
    fn invalidate_is_per_kind() {
        let mut cache = LookupCache::new();
        cache.put(LookupKind::Safes, vec![entry(1, "Cassa centrale")]);
        cache.put(LookupKind::AreaTags, vec![entry(9, "Nord")]);

        cache.invalidate(LookupKind::Safes);
        assert!(cache.get(LookupKind::Safes).is_none());
        assert_eq!(cache.get(LookupKind::AreaTags).map(<[_]>::len), Some(1));

        cache.invalidate_all();
        assert!(cache.get(LookupKind::AreaTags).is_none());
    }
}
