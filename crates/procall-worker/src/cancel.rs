//! Cooperative cancellation for in-flight calls and streams.
//!
//! A client cancelling a streaming call (by returning `Cancel` from a
//! completion) must propagate down to the server's stream task, which
//! ends the stream on its next scheduling point — there is no
//! preemption, only cooperative checks at await points.

use tokio_util::sync::CancellationToken;

/// A cancellation handle shared between a call's reactor task and
/// whatever observes its completion (transport cancellation, an
/// explicit client request, or a parent scope shutting down).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(CancellationToken);

impl CancelToken {
    pub fn new() -> Self {
        Self(CancellationToken::new())
    }

    /// A token tied to this one's lifetime: cancelling the parent
    /// cancels every child, but cancelling a child does not affect the
    /// parent or its siblings.
    pub fn child(&self) -> Self {
        Self(self.0.child_token())
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Resolves once this token (or an ancestor) is cancelled. Intended
    /// to be raced against the next unit of call-handling work via
    /// `tokio::select!`.
    pub async fn cancelled(&self) {
        self.0.cancelled().await;
    }
}
