use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Service;

/// Maps request names to the [`Service`] that answers them.
///
/// A single service may be registered under several names; unregistering
/// it removes every name it holds. Reads (the hot dispatch path) take a
/// shared lock; register/unregister (rare) take an exclusive one.
#[derive(Default)]
pub struct ServiceRegistry {
    by_name: RwLock<HashMap<String, Arc<dyn Service>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `service` under `name`. Returns `false` without
    /// changing anything if `name` is already taken.
    pub fn register(&self, name: impl Into<String>, service: Arc<dyn Service>) -> bool {
        let mut by_name = self.by_name.write();
        let name = name.into();
        if by_name.contains_key(&name) {
            return false;
        }
        by_name.insert(name, service);
        true
    }

    /// Removes every name currently mapped to `service`. Identity is
    /// compared via `Arc` pointer equality.
    pub fn unregister(&self, service: &Arc<dyn Service>) {
        let mut by_name = self.by_name.write();
        by_name.retain(|_, registered| !Arc::ptr_eq(registered, service));
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.by_name.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
