//! Property-list serialization.
//!
//! Property lists are the engine's text format for asset metadata and configuration: one
//! `Name=Value` per line, braces for nesting, a bare class token in front of each object.
//! Classes describe their properties in explicit schema tables ([`PropertyClass`]); the
//! [`SchemaRegistry`] caches those tables, [`serialize`] writes objects and [`deserialize`]
//! reads them back while inferring [`PropertySerializationFlags`].

mod flags;
pub mod inference;
mod reader;
mod registry;
mod schema;
mod text;
mod value;
mod writer;

pub use flags::PropertySerializationFlags;
pub use reader::{deserialize, deserialize_object};
pub use registry::SchemaRegistry;
pub use schema::{ClassRef, ClassSchema, FieldDescriptor, PropertyClass, PropertyObject, SchemaBuilder};
pub use text::{decode_text, encode_cp1252};
pub use value::{EnumDescriptor, EnumMember, PropertyEnum, PropertyType, PropertyValue, ValueKind};
pub use writer::{ARRAY_TOKEN, DYNAMIC_PROPERTIES, ITEM_COUNT, serialize};
