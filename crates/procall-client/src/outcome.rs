//! Decoded outcomes of a unary call and of a single stream frame.
//!
//! Grounded on `IClient::IReceiver`/`IStreamReceiver` in `client.hxx`: the
//! source delivers one of `PropertyBag` / `Exception` / transport
//! `ResultCode` through virtual callbacks. Translated here to plain
//! returned enums — a transport adapter matches on the outcome instead of
//! implementing a receiver interface.

use procall_property::PropertyBag;
use procall_wire::ResultCode;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientException {
    pub message: String,
    pub props: PropertyBag,
}

/// The result of a unary call, once a `ServiceReply` has arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Reply(PropertyBag),
    /// The server's per-client mapping session expired or was never
    /// established; the caller should re-run `PutPropertyMapping` and
    /// retry.
    ServerMappingExpired,
    /// The server answered with a mapping version the client hasn't
    /// cached; the caller should re-run `GetPropertyMapping` and retry.
    ClientMappingExpired,
    Exception(ClientException),
    /// A reply with a failure result and no exception attached — the
    /// source's "unexpected error" fallback.
    TransportFailure(ResultCode),
}

/// The result of consuming one frame from a `GenericStream` reply.
///
/// Precedence matches `ServiceReplyStreamReader::OnReadDone`: a server
/// mapping expiry is reported before a client mapping mismatch, which in
/// turn is reported before an application exception.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Frame(PropertyBag),
    EndOfStream,
    ServerMappingExpired,
    ClientMappingExpired,
    Exception(ClientException),
    TransportFailure(ResultCode),
}
