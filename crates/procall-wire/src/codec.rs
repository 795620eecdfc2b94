//! `Property` <-> wire codec.
//!
//! Grounded on `assignProperty`/`getProperty` in `protocol.cxx`: there the
//! wire variant is dispatched through a table indexed by `PropertyType`;
//! here the match arms play the same role without needing a table, since
//! the compiler already builds the jump table for us.

use procall_property::{Binary, Descriptor, Property, PropertyInfo, PropertyType};

use crate::error::{Result, WireError};
use crate::messages::{PropertyInfoWire, PropertyValueWire, PropertyWire};

/// Encodes a `Property` for transmission under `remote_id` — the id
/// *this direction's* peer uses for the property, per the negotiated
/// `PropertyMapping`.
pub fn encode(prop: &Property, remote_id: u32) -> PropertyWire {
    let value = match prop.ty() {
        PropertyType::Empty => PropertyValueWire::Empty,
        PropertyType::Bool => PropertyValueWire::Bool(prop.get_bool()),
        PropertyType::Int32 => PropertyValueWire::Int32(prop.get_int32()),
        PropertyType::UInt32 => PropertyValueWire::UInt32(prop.get_uint32()),
        PropertyType::Int64 => PropertyValueWire::Int64(prop.get_int64()),
        PropertyType::UInt64 => PropertyValueWire::UInt64(prop.get_uint64()),
        PropertyType::Double => PropertyValueWire::Double(prop.get_double()),
        PropertyType::String => PropertyValueWire::String(prop.get_string().to_string()),
        PropertyType::Binary => PropertyValueWire::Binary(prop.get_binary().bytes().to_vec()),
        other => panic!("property type {other} has no wire representation"),
    };
    PropertyWire { id: remote_id, value }
}

fn wire_value_type(value: &PropertyValueWire) -> PropertyType {
    match value {
        PropertyValueWire::Empty => PropertyType::Empty,
        PropertyValueWire::Bool(_) => PropertyType::Bool,
        PropertyValueWire::Int32(_) => PropertyType::Int32,
        PropertyValueWire::UInt32(_) => PropertyType::UInt32,
        PropertyValueWire::Int64(_) => PropertyType::Int64,
        PropertyValueWire::UInt64(_) => PropertyType::UInt64,
        PropertyValueWire::Double(_) => PropertyType::Double,
        PropertyValueWire::String(_) => PropertyType::String,
        PropertyValueWire::Binary(_) => PropertyType::Binary,
    }
}

/// Decodes a wire property into a `Property` tagged with `info`. The
/// caller resolves `info` via the local [`procall_mapping::PropertyMapping`]
/// before calling this — the codec itself knows nothing about mapping
/// negotiation.
///
/// A peer is untrusted: its frame's variant is checked against `info`'s
/// registered type before dispatch, since `Property::bool`/`int32`/...
/// assert that match and would otherwise panic on a stale or adversarial
/// frame.
pub fn decode(wire: &PropertyWire, info: impl Into<Descriptor>) -> Result<Property> {
    let info = info.into();
    let carried = wire_value_type(&wire.value);
    if carried != info.get().ty() {
        return Err(WireError::TypeMismatch {
            name: info.get().name().to_string(),
            expected: info.get().ty().to_string(),
            carried: carried.to_string(),
        });
    }

    Ok(match &wire.value {
        PropertyValueWire::Empty => Property::empty(),
        PropertyValueWire::Bool(v) => Property::bool(*v, info),
        PropertyValueWire::Int32(v) => Property::int32(*v, info),
        PropertyValueWire::UInt32(v) => Property::uint32(*v, info),
        PropertyValueWire::Int64(v) => Property::int64(*v, info),
        PropertyValueWire::UInt64(v) => Property::uint64(*v, info),
        PropertyValueWire::Double(v) => Property::double(*v, info),
        PropertyValueWire::String(v) => Property::string(v.clone(), info),
        PropertyValueWire::Binary(v) => Property::binary(Binary::new(v.clone()), info),
    })
}

/// Encodes a property descriptor for the `GetPropertyMapping` stream.
pub fn encode_info(info: &PropertyInfo) -> PropertyInfoWire {
    PropertyInfoWire {
        id: info.unique_id().unwrap_or(0),
        ty: info.ty().to_wire(),
        name: info.name().to_string(),
        readable_name: info.readable_name().to_string(),
    }
}

/// Decodes a `PropertyInfoWire` frame into an owned descriptor, as seen
/// by a `PutPropertyMapping` receiver.
pub fn decode_info(wire: &PropertyInfoWire) -> Result<PropertyInfo> {
    let ty = PropertyType::from_wire(wire.ty).ok_or(WireError::UnsupportedType(wire.ty))?;
    Ok(PropertyInfo::with_id(ty, wire.name.clone(), wire.readable_name.clone(), wire.id))
}
