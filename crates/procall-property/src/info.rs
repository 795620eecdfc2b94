//! Property type tags and descriptors.

use std::fmt;

/// The kind of value a [`crate::Property`] carries.
///
/// Numeric ordering is part of the wire contract: codecs index dispatch
/// tables by these values, so variants must never be reordered or have
/// their discriminants changed. `Map` and the reserved vector variants are
/// part of the in-process value model but are not representable on the
/// wire (see `procall-wire`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PropertyType {
    Empty = 0,
    Bool = 1,
    Int32 = 2,
    UInt32 = 3,
    Int64 = 4,
    UInt64 = 5,
    Double = 6,
    String = 7,
    Binary = 8,
    Map = 9,
    // Reserved homogeneous-vector variants. Not yet constructible or
    // representable on the wire; kept so the discriminant space is
    // stable if/when they are implemented.
    Bools = 10,
    Int32s = 11,
    UInt32s = 12,
    Int64s = 13,
    UInt64s = 14,
    Doubles = 15,
    Strings = 16,
    Binaries = 17,
}

impl PropertyType {
    /// Whether values of this type allocate shared heap storage.
    ///
    /// Matches the source's `_allocatesStorage`: everything from `String`
    /// onward is a shared, ref-counted payload rather than an inline scalar.
    pub const fn allocates_storage(self) -> bool {
        matches!(self, PropertyType::String | PropertyType::Binary | PropertyType::Map)
    }

    /// Decode a wire-level `u32` discriminant, if it names a known type.
    pub fn from_wire(value: u32) -> Option<Self> {
        Some(match value {
            0 => PropertyType::Empty,
            1 => PropertyType::Bool,
            2 => PropertyType::Int32,
            3 => PropertyType::UInt32,
            4 => PropertyType::Int64,
            5 => PropertyType::UInt64,
            6 => PropertyType::Double,
            7 => PropertyType::String,
            8 => PropertyType::Binary,
            9 => PropertyType::Map,
            _ => return None,
        })
    }

    pub const fn to_wire(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyType::Empty => "Empty",
            PropertyType::Bool => "Bool",
            PropertyType::Int32 => "Int32",
            PropertyType::UInt32 => "UInt32",
            PropertyType::Int64 => "Int64",
            PropertyType::UInt64 => "UInt64",
            PropertyType::Double => "Double",
            PropertyType::String => "String",
            PropertyType::Binary => "Binary",
            PropertyType::Map => "Map",
            PropertyType::Bools => "Bools",
            PropertyType::Int32s => "Int32s",
            PropertyType::UInt32s => "UInt32s",
            PropertyType::Int64s => "Int64s",
            PropertyType::UInt64s => "UInt64s",
            PropertyType::Doubles => "Doubles",
            PropertyType::Strings => "Strings",
            PropertyType::Binaries => "Binaries",
        };
        f.write_str(s)
    }
}

/// An opaque byte sequence, distinct from `String`.
///
/// Equality is byte-exact and hashing matches equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Binary {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

/// The stable identity of a property kind: type, dotted name, and a
/// human-readable label.
///
/// Descriptors are either process-static (registered once via
/// [`crate::PropertyRegistry`] and living for the process lifetime) or
/// transient (allocated by the property-mapping layer for descriptors
/// received from a peer). `unique_id` is `None` until the descriptor has
/// been assigned an id by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    ty: PropertyType,
    name: String,
    readable_name: String,
    unique_id: Option<u32>,
}

impl PropertyInfo {
    /// Creates a descriptor with no assigned id. Call
    /// [`PropertyRegistry::register`] (or the mapping layer's transient
    /// allocator) to assign one.
    pub fn new(ty: PropertyType, name: impl Into<String>, readable_name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            readable_name: readable_name.into(),
            unique_id: None,
        }
    }

    /// Creates an already-identified descriptor, e.g. one reconstructed
    /// from a wire `PropertyInfoWire` frame.
    pub fn with_id(ty: PropertyType, name: impl Into<String>, readable_name: impl Into<String>, id: u32) -> Self {
        Self {
            ty,
            name: name.into(),
            readable_name: readable_name.into(),
            unique_id: Some(id),
        }
    }

    pub fn ty(&self) -> PropertyType {
        self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn readable_name(&self) -> &str {
        &self.readable_name
    }

    pub fn unique_id(&self) -> Option<u32> {
        self.unique_id
    }

    pub(crate) fn set_unique_id(&mut self, id: u32) {
        self.unique_id = Some(id);
    }
}

/// The process-wide descriptor naming an absent/default property. Used as
/// the `info()` of an [`crate::Property::empty`] value with no descriptor.
pub fn unspecified_empty() -> &'static PropertyInfo {
    use std::sync::OnceLock;
    static EMPTY: OnceLock<PropertyInfo> = OnceLock::new();
    EMPTY.get_or_init(|| PropertyInfo::with_id(PropertyType::Empty, "/unspecified/empty", "(empty)", 0))
}
