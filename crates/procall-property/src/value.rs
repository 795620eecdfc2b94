//! The `Property` tagged-union value and its shared heap payloads.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::info::{unspecified_empty, Binary, PropertyInfo, PropertyType};
use crate::map::PropertyMap;

/// A descriptor attached to a [`Property`]: either a process-static
/// reference (the common case, for properties registered once via
/// [`crate::PropertyRegistry`]) or a shared transient one (allocated by
/// the property-mapping layer for descriptors learned from a peer).
#[derive(Debug, Clone)]
pub enum Descriptor {
    Static(&'static PropertyInfo),
    Shared(Arc<PropertyInfo>),
}

impl Descriptor {
    pub fn get(&self) -> &PropertyInfo {
        match self {
            Descriptor::Static(info) => info,
            Descriptor::Shared(info) => info,
        }
    }
}

impl From<&'static PropertyInfo> for Descriptor {
    fn from(info: &'static PropertyInfo) -> Self {
        Descriptor::Static(info)
    }
}

impl From<Arc<PropertyInfo>> for Descriptor {
    fn from(info: Arc<PropertyInfo>) -> Self {
        Descriptor::Shared(info)
    }
}

/// The inhabited payload of a `Property`. Scalars are inline and trivially
/// copyable; `String`/`Binary`/`Map` share an `Arc`'d heap allocation, so
/// cloning a large property is cheap and mutation is impossible by
/// construction — callers replace, they never edit in place.
#[derive(Debug, Clone)]
enum Payload {
    Empty,
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(Arc<String>),
    Binary(Arc<Binary>),
    Map(Arc<PropertyMap>),
}

/// A typed value tagged with a globally named descriptor.
///
/// `type()` always matches the inhabited payload; copying preserves type
/// and cheaply shares large payloads; a `Property` is never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct Property {
    info: Descriptor,
    payload: Payload,
}

impl Property {
    /// The canonical empty property, tagged with the process-wide
    /// "unspecified" descriptor.
    pub fn empty() -> Self {
        Self {
            info: Descriptor::Static(unspecified_empty()),
            payload: Payload::Empty,
        }
    }

    pub fn bool(v: bool, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Bool, "property info type mismatch");
        Self { info, payload: Payload::Bool(v) }
    }

    pub fn int32(v: i32, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Int32, "property info type mismatch");
        Self { info, payload: Payload::Int32(v) }
    }

    pub fn uint32(v: u32, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::UInt32, "property info type mismatch");
        Self { info, payload: Payload::UInt32(v) }
    }

    pub fn int64(v: i64, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Int64, "property info type mismatch");
        Self { info, payload: Payload::Int64(v) }
    }

    pub fn uint64(v: u64, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::UInt64, "property info type mismatch");
        Self { info, payload: Payload::UInt64(v) }
    }

    pub fn double(v: f64, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Double, "property info type mismatch");
        Self { info, payload: Payload::Double(v) }
    }

    pub fn string(v: impl Into<String>, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::String, "property info type mismatch");
        Self { info, payload: Payload::String(Arc::new(v.into())) }
    }

    pub fn binary(v: impl Into<Binary>, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Binary, "property info type mismatch");
        Self { info, payload: Payload::Binary(Arc::new(v.into())) }
    }

    pub fn map(v: PropertyMap, info: impl Into<Descriptor>) -> Self {
        let info = info.into();
        assert_eq!(info.get().ty(), PropertyType::Map, "property info type mismatch");
        Self { info, payload: Payload::Map(Arc::new(v)) }
    }

    pub fn ty(&self) -> PropertyType {
        match &self.payload {
            Payload::Empty => PropertyType::Empty,
            Payload::Bool(_) => PropertyType::Bool,
            Payload::Int32(_) => PropertyType::Int32,
            Payload::UInt32(_) => PropertyType::UInt32,
            Payload::Int64(_) => PropertyType::Int64,
            Payload::UInt64(_) => PropertyType::UInt64,
            Payload::Double(_) => PropertyType::Double,
            Payload::String(_) => PropertyType::String,
            Payload::Binary(_) => PropertyType::Binary,
            Payload::Map(_) => PropertyType::Map,
        }
    }

    pub fn info(&self) -> &PropertyInfo {
        self.info.get()
    }

    pub fn empty_value(&self) -> bool {
        matches!(self.payload, Payload::Empty)
    }

    pub fn get_bool(&self) -> bool {
        match self.payload {
            Payload::Bool(v) => v,
            _ => panic!("Property::get_bool on a {} property", self.ty()),
        }
    }

    pub fn get_int32(&self) -> i32 {
        match self.payload {
            Payload::Int32(v) => v,
            _ => panic!("Property::get_int32 on a {} property", self.ty()),
        }
    }

    pub fn get_uint32(&self) -> u32 {
        match self.payload {
            Payload::UInt32(v) => v,
            _ => panic!("Property::get_uint32 on a {} property", self.ty()),
        }
    }

    pub fn get_int64(&self) -> i64 {
        match self.payload {
            Payload::Int64(v) => v,
            _ => panic!("Property::get_int64 on a {} property", self.ty()),
        }
    }

    pub fn get_uint64(&self) -> u64 {
        match self.payload {
            Payload::UInt64(v) => v,
            _ => panic!("Property::get_uint64 on a {} property", self.ty()),
        }
    }

    pub fn get_double(&self) -> f64 {
        match self.payload {
            Payload::Double(v) => v,
            _ => panic!("Property::get_double on a {} property", self.ty()),
        }
    }

    pub fn get_string(&self) -> &str {
        match &self.payload {
            Payload::String(v) => v,
            _ => panic!("Property::get_string on a {} property", self.ty()),
        }
    }

    pub fn get_binary(&self) -> &Binary {
        match &self.payload {
            Payload::Binary(v) => v,
            _ => panic!("Property::get_binary on a {} property", self.ty()),
        }
    }

    pub fn get_map(&self) -> &PropertyMap {
        match &self.payload {
            Payload::Map(v) => v,
            _ => panic!("Property::get_map on a {} property", self.ty()),
        }
    }

    /// The property's name, from its descriptor.
    pub fn name(&self) -> &str {
        self.info.get().name()
    }

    /// Human-readable rendering of the value, for logs and diagnostics.
    pub fn str(&self) -> String {
        match &self.payload {
            Payload::Empty => "[empty]".to_string(),
            Payload::Bool(v) => if *v { "True".to_string() } else { "False".to_string() },
            Payload::Int32(v) => v.to_string(),
            Payload::UInt32(v) => v.to_string(),
            Payload::Int64(v) => v.to_string(),
            Payload::UInt64(v) => v.to_string(),
            Payload::Double(v) => v.to_string(),
            Payload::String(v) => v.as_str().to_string(),
            Payload::Binary(v) => format!("{:02x?}", v.bytes()),
            Payload::Map(v) => v.str(),
        }
    }

    pub fn hash_value(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Property {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        match (&self.payload, &other.payload) {
            (Payload::Empty, Payload::Empty) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int32(a), Payload::Int32(b)) => a == b,
            (Payload::UInt32(a), Payload::UInt32(b)) => a == b,
            (Payload::Int64(a), Payload::Int64(b)) => a == b,
            (Payload::UInt64(a), Payload::UInt64(b)) => a == b,
            (Payload::Double(a), Payload::Double(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => a == b,
            (Payload::Binary(a), Payload::Binary(b)) => a == b,
            (Payload::Map(a), Payload::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.payload {
            Payload::Empty => 0u8.hash(state),
            Payload::Bool(v) => v.hash(state),
            Payload::Int32(v) => v.hash(state),
            Payload::UInt32(v) => v.hash(state),
            Payload::Int64(v) => v.hash(state),
            Payload::UInt64(v) => v.hash(state),
            Payload::Double(v) => v.to_bits().hash(state),
            Payload::String(v) => v.hash(state),
            Payload::Binary(v) => v.hash(state),
            Payload::Map(v) => v.hash(state),
        }
    }
}
