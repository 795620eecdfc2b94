//! `SessionStore`: a concurrent `Key -> V` cache with inactivity-based
//! eviction.
//!
//! Grounded on `session_data.hxx` in the erebus source: a shared lock
//! covers lookup, an exclusive lock covers insertion and the
//! opportunistic sweep, and an atomic refcount per entry prevents the
//! sweep from evicting whatever the caller is currently holding.
//!
//! One generalization over the source: `get` never fails. The source's
//! `refs` flag is strictly a 0/1 exclusive lock, so a second concurrent
//! caller for the same key gets an unusable empty `Ref`. Per this
//! system's contract (the anti-eviction lease "merely prevents
//! eviction" — sessions are never used to serialize calls), `V` here is
//! expected to be internally synchronized (an `RwLock`-backed mapping
//! table, say), so a [`Ref`] always derefs to live data; `refs` now only
//! gates whether *this* caller also renews the entry's anti-eviction
//! lease, reported via [`Ref::holds_lease`].

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

struct Entry<V> {
    data: V,
    refs: AtomicU8,
    touched: Mutex<Instant>,
}

impl<V: Default> Entry<V> {
    fn new() -> Self {
        Self { data: V::default(), refs: AtomicU8::new(0), touched: Mutex::new(Instant::now()) }
    }
}

fn try_acquire<V>(entry: &Entry<V>) -> bool {
    entry.refs.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire).is_ok()
}

/// A handle on a session entry. Always derefs to `V`; [`Ref::holds_lease`]
/// reports whether this handle also holds the anti-eviction lease (and
/// will therefore refresh `touched` and release it on drop).
pub struct Ref<V> {
    entry: Arc<Entry<V>>,
    leased: bool,
}

impl<V> Ref<V> {
    pub fn holds_lease(&self) -> bool {
        self.leased
    }
}

impl<V> Deref for Ref<V> {
    type Target = V;
    fn deref(&self) -> &V {
        &self.entry.data
    }
}

impl<V> Drop for Ref<V> {
    fn drop(&mut self) {
        if self.leased {
            *self.entry.touched.lock() = Instant::now();
            self.entry.refs.store(0, Ordering::Release);
        }
    }
}

struct Inner<K, V> {
    entries: HashMap<K, Arc<Entry<V>>>,
    prev_sweep: Instant,
}

/// A concurrent `Key -> V` cache with an inactivity threshold: entries
/// not leased for longer than the threshold are dropped opportunistically
/// whenever a sweep interval has elapsed, never while a [`Ref`] holding
/// the lease is live.
pub struct SessionStore<K, V> {
    threshold: Duration,
    inner: RwLock<Inner<K, V>>,
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    pub fn new(inactivity_threshold: Duration) -> Self {
        Self {
            threshold: inactivity_threshold,
            inner: RwLock::new(Inner { entries: HashMap::new(), prev_sweep: Instant::now() }),
        }
    }

    /// Returns the entry for `key`, creating it if absent.
    pub fn get(&self, key: &K) -> Ref<V> {
        let now = Instant::now();

        // Fast path: entry already exists.
        {
            let inner = self.inner.read();
            if let Some(entry) = inner.entries.get(key) {
                return self.acquire(Arc::clone(entry), now);
            }
        }

        let mut inner = self.inner.write();

        if inner.prev_sweep + self.threshold < now {
            self.sweep(&mut inner, key, now);
            inner.prev_sweep = now;
        }

        // Another thread may have inserted the key while we waited for
        // the exclusive lock.
        if let Some(entry) = inner.entries.get(key) {
            return self.acquire(Arc::clone(entry), now);
        }

        let entry = Arc::new(Entry::new());
        inner.entries.insert(key.clone(), Arc::clone(&entry));
        self.acquire(entry, now)
    }

    fn acquire(&self, entry: Arc<Entry<V>>, now: Instant) -> Ref<V> {
        let leased = try_acquire(&entry);
        if leased {
            *entry.touched.lock() = now;
        }
        Ref { entry, leased }
    }

    /// Drops every entry (other than `key`) not currently leased whose
    /// last-touched time is older than the inactivity threshold.
    ///
    /// `key` is excluded from the sweep even if stale — this avoids
    /// evicting the very entry the caller is about to acquire. Visiting
    /// (and failing to evict) a surviving entry bumps its `touched` time,
    /// same as acquiring it would; this mirrors the source's behavior,
    /// quirky as it is.
    fn sweep(&self, inner: &mut Inner<K, V>, key: &K, now: Instant) {
        let mut evicted = 0u32;
        inner.entries.retain(|k, entry| {
            if k == key {
                return true;
            }

            if try_acquire(entry) {
                let stale = *entry.touched.lock() + self.threshold < now;
                *entry.touched.lock() = Instant::now();
                entry.refs.store(0, Ordering::Release);
                if stale {
                    evicted += 1;
                }
                !stale
            } else {
                true // leased elsewhere right now; leave it alone
            }
        });
        if evicted > 0 {
            tracing::debug!(evicted, "session sweep reclaimed inactive entries");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
