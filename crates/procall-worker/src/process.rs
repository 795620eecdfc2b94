//! Reference-counted process-wide init/finalize, matching the transport
//! runtime's own lifecycle (e.g. a gRPC library's global init/shutdown):
//! the first guard created runs `init`, the last one dropped runs
//! `finalize`; the subsystem is inert outside that window.

use std::sync::Arc;

struct Shared<F: Fn() + Send + Sync + 'static> {
    finalize: F,
}

impl<F: Fn() + Send + Sync + 'static> Drop for Shared<F> {
    fn drop(&mut self) {
        (self.finalize)();
    }
}

/// A cloneable handle on the process-wide init/finalize window. Clones
/// share the same `Arc`; `finalize` runs exactly once, when the last
/// clone (across the whole process) is dropped.
#[derive(Clone)]
pub struct ProcessGuard<F: Fn() + Send + Sync + 'static>(Arc<Shared<F>>);

impl<F: Fn() + Send + Sync + 'static> ProcessGuard<F> {
    /// Runs `init` now and arranges for `finalize` to run when every
    /// clone of the returned guard has been dropped.
    pub fn new(init: impl FnOnce(), finalize: F) -> Self {
        init();
        Self(Arc::new(Shared { finalize }))
    }

    /// How many live clones (including this one) still hold the window
    /// open.
    pub fn active_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<F: Fn() + Send + Sync + 'static> std::fmt::Debug for ProcessGuard<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessGuard").field("active_count", &self.active_count()).finish()
    }
}

/// The shape `Server`/`Client` actually hold: a boxed finalize closure,
/// since neither wants to be generic over it.
pub type ProcessGuardDyn = ProcessGuard<Box<dyn Fn() + Send + Sync>>;
