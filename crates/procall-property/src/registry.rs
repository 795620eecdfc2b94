//! `PropertyRegistry`: the process-wide set of known property descriptors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::info::PropertyInfo;

struct Entry {
    info: Arc<PropertyInfo>,
    refcount: u32,
}

struct Inner {
    by_name: HashMap<String, Entry>,
}

/// Assigns compact, dense, never-reused 32-bit ids to property descriptors
/// by name. Thread-safe; cheap to call on every marshal/unmarshal since
/// reads only take the shared lock.
pub struct PropertyRegistry {
    inner: RwLock<Inner>,
    next_id: AtomicU32,
    version: AtomicU32,
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner { by_name: HashMap::new() }),
            next_id: AtomicU32::new(1), // id 0 is reserved for Unspecified::Empty
            version: AtomicU32::new(0),
        }
    }

    /// Registers `info` (by name). If the name is new, assigns the next
    /// id and returns a fresh `Arc`. If it already exists, bumps the
    /// refcount and returns the *existing* `Arc` — callers must use the
    /// returned descriptor, not their own, since identity is keyed by name.
    pub fn register(&self, info: PropertyInfo) -> Arc<PropertyInfo> {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.by_name.get_mut(info.name()) {
            entry.refcount += 1;
            return Arc::clone(&entry.info);
        }

        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let mut info = info;
        info.set_unique_id(id);
        let info = Arc::new(info);
        inner.by_name.insert(info.name().to_string(), Entry { info: Arc::clone(&info), refcount: 1 });
        self.version.fetch_add(1, Ordering::AcqRel);
        info
    }

    /// Decrements the refcount for `info`'s name; removes the entry on
    /// reaching zero. The id is never reused even after removal.
    pub fn unregister(&self, info: &PropertyInfo) {
        let mut inner = self.inner.write();
        let Some(entry) = inner.by_name.get_mut(info.name()) else { return };
        entry.refcount -= 1;
        if entry.refcount == 0 {
            inner.by_name.remove(info.name());
            self.version.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Calls `visitor` for every currently registered descriptor and
    /// returns the registry's current snapshot version.
    pub fn enumerate(&self, mut visitor: impl FnMut(&PropertyInfo)) -> u32 {
        let inner = self.inner.read();
        for entry in inner.by_name.values() {
            visitor(&entry.info);
        }
        self.version.load(Ordering::Acquire)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<PropertyInfo>> {
        self.inner.read().by_name.get(name).map(|e| Arc::clone(&e.info))
    }

    pub fn version(&self) -> u32 {
        self.version.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::PropertyType;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_distinct_and_dense() {
        let reg = PropertyRegistry::new();
        let a = reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A"));
        let b = reg.register(PropertyInfo::new(PropertyType::Int32, "b", "B"));
        assert_ne!(a.unique_id(), b.unique_id());
    }

    #[test]
    fn duplicate_registration_returns_same_id_and_bumps_refcount() {
        let reg = PropertyRegistry::new();
        let a1 = reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A"));
        let v1 = reg.version();
        let a2 = reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A (again)"));
        assert_eq!(a1.unique_id(), a2.unique_id());
        // re-registration doesn't change the set, so the version is unchanged
        assert_eq!(reg.version(), v1);
    }

    #[test]
    fn version_strictly_increases_on_set_change() {
        let reg = PropertyRegistry::new();
        let v0 = reg.version();
        let a = reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A"));
        let v1 = reg.version();
        assert!(v1 > v0);
        reg.unregister(&a);
        let v2 = reg.version();
        assert!(v2 > v1);
    }

    #[test]
    fn ids_never_reused_after_unregister() {
        let reg = PropertyRegistry::new();
        let a = reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A"));
        let a_id = a.unique_id();
        reg.unregister(&a);
        let b = reg.register(PropertyInfo::new(PropertyType::Int32, "b", "B"));
        assert_ne!(a_id, b.unique_id());
    }

    #[test]
    fn enumerate_visits_every_registered_descriptor() {
        let reg = PropertyRegistry::new();
        reg.register(PropertyInfo::new(PropertyType::Int32, "a", "A"));
        reg.register(PropertyInfo::new(PropertyType::Int32, "b", "B"));
        let mut names = Vec::new();
        reg.enumerate(|info| names.push(info.name().to_string()));
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
