//! The property model: a tagged-union value type with large-payload
//! shared ownership, identity by a compact integer, and a process-wide
//! registry.
//!
//! `Property` values are inert once built — mutation is forbidden, new
//! values replace old ones. `String`/`Binary`/`Map` payloads share an
//! `Arc`'d allocation so cloning stays cheap regardless of size.

mod bag;
mod info;
mod map;
mod registry;
mod value;

pub use bag::{get, update, PropertyBag};
pub use info::{unspecified_empty, Binary, PropertyInfo, PropertyType};
pub use map::PropertyMap;
pub use registry::PropertyRegistry;
pub use value::{Descriptor, Property};
