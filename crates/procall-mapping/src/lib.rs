//! `PropertyMapping`: the per-peer, per-direction translation table from a
//! remote property id to a locally-usable descriptor, plus the
//! monotonically increasing version that guards against stale views.
//!
//! Grounded on `property_mapping.hxx` in the erebus source: a flat vector
//! indexed by remote id, resized on demand, so lookups stay an array
//! index rather than a hash probe.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use procall_property::PropertyInfo;

/// Sentinel meaning "not yet negotiated in this direction". Both sides
/// treat it as a forced mismatch.
pub const WILDCARD_VERSION: u32 = u32::MAX;

/// A peer's descriptor table, indexed by the id *that peer* assigned to
/// each property, together with the version the peer last reported.
///
/// Created empty (version = [`WILDCARD_VERSION`]) when a peer is first
/// seen. Grows monotonically within a version — entries are never
/// removed, only added or overwritten.
pub struct PropertyMapping {
    map: RwLock<Vec<Option<Arc<PropertyInfo>>>>,
    version: AtomicU32,
}

impl Default for PropertyMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self {
            map: RwLock::new(Vec::new()),
            version: AtomicU32::new(WILDCARD_VERSION),
        }
    }

    /// Looks up the local descriptor for a remote id, if known.
    pub fn lookup(&self, remote_id: u32) -> Option<Arc<PropertyInfo>> {
        let map = self.map.read();
        map.get(remote_id as usize).and_then(|slot| slot.clone())
    }

    /// Unconditionally (re)binds `remote_id` to `info`, growing the table
    /// if needed.
    pub fn insert(&self, remote_id: u32, info: Arc<PropertyInfo>) {
        let mut map = self.map.write();
        let idx = remote_id as usize;
        if idx >= map.len() {
            map.resize(idx + 1, None);
        }
        map[idx] = Some(info);
    }

    /// Binds `remote_id` to `info` only if no descriptor is bound there
    /// yet. Returns whether the binding was newly created.
    pub fn insert_if_missing(&self, remote_id: u32, info: Arc<PropertyInfo>) -> bool {
        let mut map = self.map.write();
        let idx = remote_id as usize;
        if idx >= map.len() {
            map.resize(idx + 1, None);
            map[idx] = Some(info);
            return true;
        }

        if map[idx].is_none() {
            map[idx] = Some(info);
            return true;
        }

        false
    }

    pub fn version(&self) -> u32 {
        self.version.load(Ordering::Acquire)
    }

    pub fn set_version(&self, version: u32) {
        self.version.store(version, Ordering::Release);
    }

    /// Whether this mapping has never completed a negotiation round.
    pub fn is_wildcard(&self) -> bool {
        self.version() == WILDCARD_VERSION
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
