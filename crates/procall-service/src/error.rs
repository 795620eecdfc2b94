use procall_property::PropertyBag;
use thiserror::Error;

/// Errors a [`crate::Service`] may raise. Distinct from transport errors
/// and mapping-expiry signals (those are handled above the service
/// boundary) — everything here is marshalled into the outgoing reply as
/// an exception frame, never surfaced as a transport failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("length violation: {0}")]
    LengthViolation(String),

    #[error("bad cast: {0}")]
    BadCast(String),

    /// A structured application-level failure, carrying a message and an
    /// arbitrary property bag for the caller to interpret.
    #[error("{message}")]
    Application { message: String, props: PropertyBag },

    #[error("{0}")]
    Unknown(String),

    #[error("no service registered for request {0:?}")]
    UnknownRequest(String),

    #[error("unknown stream id")]
    UnknownStream,
}

pub type Result<T> = std::result::Result<T, ServiceError>;
