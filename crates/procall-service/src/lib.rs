//! The service contract: named handlers for unary requests and
//! server-side streams, plus a registry that maps request names to them.
//!
//! Grounded on `Er::Ipc::IService`/the `registerService`/`unregisterService`
//! pair in `erebus_service.hxx`: a service answers zero or more request
//! names and owns all of its own stream state; the core only routes.

mod error;
mod registry;

pub use error::{ServiceError, Result};
pub use registry::ServiceRegistry;

use async_trait::async_trait;
use procall_property::PropertyBag;

/// Opaque handle to an in-flight server-side stream. Only meaningful to
/// the [`Service`] that produced it via [`Service::begin_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub u64);

/// A named, thread-safe handler for unary requests and server-streaming
/// calls.
///
/// A single `Service` instance may be registered under several names
/// (see [`ServiceRegistry::register`]). `request` and the streaming trio
/// must tolerate concurrent invocations for different `client_id`s; a
/// single stream, once begun, is walked by exactly one caller at a time.
#[async_trait]
pub trait Service: Send + Sync {
    /// Handles a single request-reply call. Must be reentrant across
    /// distinct `client_id`s called concurrently.
    async fn request(&self, name: &str, client_id: u32, args: &PropertyBag) -> Result<PropertyBag>;

    /// Begins a server-side stream, returning a handle used in
    /// subsequent [`Service::next`]/[`Service::end_stream`] calls.
    async fn begin_stream(&self, name: &str, client_id: u32, args: &PropertyBag) -> Result<StreamId>;

    /// Produces the next frame of a stream previously begun with
    /// [`Service::begin_stream`]. An empty [`PropertyBag`] signals
    /// end-of-stream; the caller must still call [`Service::end_stream`]
    /// afterward.
    async fn next(&self, id: StreamId) -> Result<PropertyBag>;

    /// Releases stream state. Must be called exactly once per stream
    /// that was successfully begun, including on cancellation or
    /// transport failure. `id` is invalid after this call.
    async fn end_stream(&self, id: StreamId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    struct Echo {
        next_id: AtomicU64,
        streams: Mutex<std::collections::HashMap<u64, Vec<PropertyBag>>>,
    }

    impl Echo {
        fn new() -> Self {
            Self { next_id: AtomicU64::new(1), streams: Mutex::new(Default::default()) }
        }
    }

    #[async_trait]
    impl Service for Echo {
        async fn request(&self, _name: &str, _client_id: u32, args: &PropertyBag) -> Result<PropertyBag> {
            Ok(args.clone())
        }

        async fn begin_stream(&self, _name: &str, _client_id: u32, args: &PropertyBag) -> Result<StreamId> {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let frames = vec![args.clone(), PropertyBag::new()];
            self.streams.lock().unwrap().insert(id, frames);
            Ok(StreamId(id))
        }

        async fn next(&self, id: StreamId) -> Result<PropertyBag> {
            let mut streams = self.streams.lock().unwrap();
            let frames = streams.get_mut(&id.0).expect("unknown stream id");
            Ok(if frames.is_empty() { PropertyBag::new() } else { frames.remove(0) })
        }

        async fn end_stream(&self, id: StreamId) {
            self.streams.lock().unwrap().remove(&id.0);
        }
    }

    #[tokio::test]
    async fn echo_request_round_trips() {
        let svc = Echo::new();
        let args = PropertyBag::new();
        let reply = svc.request("echo", 1, &args).await.unwrap();
        assert_eq!(reply.len(), args.len());
    }

    #[tokio::test]
    async fn stream_ends_with_empty_bag() {
        let svc = Echo::new();
        let id = svc.begin_stream("echo", 1, &PropertyBag::new()).await.unwrap();
        let first = svc.next(id).await.unwrap();
        assert!(first.is_empty());
        let second = svc.next(id).await.unwrap();
        assert!(second.is_empty());
        svc.end_stream(id).await;
    }
}
