//! Logical wire message schemas. Field names are contract: they mirror
//! what a transport-generated type (protobuf, capnproto, ...) would name
//! these fields, independent of the transport chosen by `procall-server`/
//! `procall-client`.

/// A single property value on the wire: a remote id plus exactly one of
/// the scalar/heap payload slots. Grounded on `erebus.proto`'s `Property`
/// message — a protobuf `oneof` becomes a Rust enum.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyWire {
    pub id: u32,
    pub value: PropertyValueWire,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValueWire {
    Empty,
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingRequest {
    pub client_id: u32,
    pub timestamp: u64,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingReply {
    pub client_id: u32,
    pub timestamp: u64,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfoWire {
    pub id: u32,
    pub ty: u32,
    pub name: String,
    pub readable_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetPropertyMappingReply {
    pub mapping_version: u32,
    pub mapping: PropertyInfoWire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Void;

#[derive(Debug, Clone, PartialEq)]
pub struct PutPropertyMappingRequest {
    pub client_id: u32,
    pub mapping_version: u32,
    pub mapping: PropertyInfoWire,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionReply {
    pub message: String,
    pub props: Vec<PropertyWire>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub request: String,
    pub client_id: u32,
    pub mapping_version: u32,
    pub args: Vec<PropertyWire>,
    pub cookie: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReply {
    pub result: super::CallResult,
    pub mapping_version: u32,
    pub props: Vec<PropertyWire>,
    pub exception: Option<ExceptionReply>,
}
