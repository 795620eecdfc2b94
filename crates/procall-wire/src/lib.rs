//! Logical wire schemas and the `Property` <-> wire translation.
//!
//! Deliberately transport-agnostic: nothing here names gRPC, protobuf, or
//! any other concrete transport. `procall-server`/`procall-client` adapt
//! these types to whatever transport they're built against.

mod codec;
mod error;
mod messages;
mod status;

pub use codec::{decode, decode_info, encode, encode_info};
pub use error::{Result, WireError};
pub use messages::{
    ExceptionReply, GetPropertyMappingReply, PingReply, PingRequest, PropertyInfoWire,
    PropertyValueWire, PropertyWire, PutPropertyMappingRequest, ServiceReply, ServiceRequest, Void,
};
pub use status::{map_transport_status, CallResult, ResultCode, TransportStatus};
