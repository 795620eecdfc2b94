//! Fire-and-forget task spawning with panic visibility.
//!
//! The reactor model spawns one task per in-flight call/stream; nothing
//! awaits those tasks' handles directly (the transport layer drives
//! completion via callbacks), so a panicking task would otherwise vanish
//! silently. `spawn_supervised` logs instead.

use std::future::Future;

use tokio::task::JoinHandle;

/// Spawns `fut` and logs (at `error` level) if it panics, or at `debug`
/// level if it was cancelled. `name` identifies the task kind in the log
/// line — e.g. `"generic-call"`, `"get-property-mapping"`.
///
/// Returns a handle to the supervising task itself, which resolves once
/// `fut` has finished one way or another.
pub fn spawn_supervised<F>(name: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let inner = tokio::spawn(fut);
    tokio::spawn(async move {
        match inner.await {
            Ok(()) => {}
            Err(err) if err.is_panic() => {
                tracing::error!(task = name, "task panicked");
            }
            Err(_) => {
                tracing::debug!(task = name, "task cancelled");
            }
        }
    })
}
