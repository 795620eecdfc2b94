//! Call outcomes and transport status translation.
//!
//! Grounded on `mapGrpcStatus` in `protocol.cxx`/`grpc_client.cxx`: a
//! fixed switch from the transport's status space into this crate's
//! `ResultCode`. The mapping is part of the contract, not an
//! implementation detail — callers compare against these variants.

/// The outcome carried in a [`crate::ServiceReply`], distinct from
/// transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CallResult {
    Success = 0,
    Failure = 1,
    PropertyMappingExpired = 2,
}

/// Transport-independent status, translated from whatever status space
/// the underlying transport uses (gRPC's `StatusCode` in the reference
/// deployment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    Canceled,
    Failure,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    AccessDenied,
    Unauthenticated,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
}

/// A transport status code, abstracted from any one transport crate.
/// `procall-server`/`procall-client` translate their transport's native
/// status type into this before calling [`map_transport_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
}

/// Translates a transport status into this crate's [`ResultCode`].
/// Unrecognized/default cases fall back to `Failure`, matching the
/// source's `default: return Er::Result::Failure`.
pub fn map_transport_status(status: TransportStatus) -> ResultCode {
    match status {
        TransportStatus::Ok => ResultCode::Ok,
        TransportStatus::Cancelled => ResultCode::Canceled,
        TransportStatus::Unknown => ResultCode::Failure,
        TransportStatus::InvalidArgument => ResultCode::InvalidArgument,
        TransportStatus::DeadlineExceeded => ResultCode::DeadlineExceeded,
        TransportStatus::NotFound => ResultCode::NotFound,
        TransportStatus::AlreadyExists => ResultCode::AlreadyExists,
        TransportStatus::PermissionDenied => ResultCode::AccessDenied,
        TransportStatus::Unauthenticated => ResultCode::Unauthenticated,
        TransportStatus::ResourceExhausted => ResultCode::ResourceExhausted,
        TransportStatus::FailedPrecondition => ResultCode::FailedPrecondition,
        TransportStatus::Aborted => ResultCode::Aborted,
        TransportStatus::OutOfRange => ResultCode::OutOfRange,
        TransportStatus::Unimplemented => ResultCode::Unimplemented,
        TransportStatus::Internal => ResultCode::Internal,
        TransportStatus::Unavailable => ResultCode::Unavailable,
        TransportStatus::DataLoss => ResultCode::DataLoss,
    }
}
