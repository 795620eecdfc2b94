//! Shared async runtime primitives for the server and client reactors:
//! cooperative cancellation, supervised task spawning, and a
//! reference-counted process-wide init/finalize guard.
//!
//! Grounded on the teacher's `xeno-worker` crate (shared worker runtime
//! primitives and task orchestration) for shape and dependency choice;
//! the bodies are written fresh for this runtime's narrower need of one
//! task per in-flight call.

mod cancel;
mod process;
mod supervise;

pub use cancel::CancelToken;
pub use process::{ProcessGuard, ProcessGuardDyn};
pub use supervise::spawn_supervised;
