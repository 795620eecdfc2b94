//! Server-side call dispatch core.
//!
//! This crate holds everything `procall-server`'s transport adapters need
//! that doesn't depend on a concrete transport: configuration shapes,
//! per-client session bookkeeping, exception marshalling, and the
//! [`dispatch::Server`] that answers Ping/GetPropertyMapping/
//! PutPropertyMapping/GenericCall/GenericStream.

mod config;
mod dispatch;
mod exception;
mod session;

pub use config::{Endpoint, KeepAlive, ServerConfig, Tls};
pub use dispatch::Server;
pub use session::ClientSessions;
