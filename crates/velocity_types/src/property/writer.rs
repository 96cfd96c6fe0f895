//! Property-list writer.
//!
//! ```text
//! Sequence
//! {
//!     Dynamic Properties=2
//!     {
//!         Menu Position X=12
//!         Menu Position Y=40
//!     }
//!     FPS=24
//!     Blit Type=Normal
//!     Frame Order=Array
//!     {
//!         Item Count=2
//!         Frame=0
//!         Frame=1
//!     }
//! }
//! ```
//!
//! Dynamic properties are collected on the side and inserted right after the opening brace
//! of their object once its body is complete.

use std::fmt::Write as _;

use super::flags::PropertySerializationFlags;
use super::registry::SchemaRegistry;
use super::schema::{FieldDescriptor, PropertyObject};
use super::value::{PropertyValue, ValueKind};

/// Key of the relocated dynamic block.
pub const DYNAMIC_PROPERTIES: &str = "Dynamic Properties";

/// Key of the element count line inside an array block.
pub const ITEM_COUNT: &str = "Item Count";

/// Value written for list-typed properties.
pub const ARRAY_TOKEN: &str = "Array";

/// Serializes `object` as a property list.
pub fn serialize(
	registry: &SchemaRegistry,
	object: &dyn PropertyObject,
	flags: PropertySerializationFlags,
) -> String {
	let mut writer = PropertyWriter {
		registry,
		flags,
		out: String::new(),
	};
	writer.line(0, object.class_name());
	writer.write_body(object, 0);
	writer.out
}

struct PropertyWriter<'a> {
	registry: &'a SchemaRegistry,
	flags: PropertySerializationFlags,
	out: String,
}

impl PropertyWriter<'_> {
	fn line(&mut self, depth: usize, text: &str) {
		push_line(&mut self.out, depth, text);
	}

	fn write_body(&mut self, object: &dyn PropertyObject, depth: usize) {
		let schema = self.registry.resolve(object.class_ref());
		self.line(depth, "{");
		let body_start = self.out.len();

		let mut dynamic = Vec::new();
		for field in schema.fields() {
			if !field.should_write(object.as_any(), self.flags) {
				continue;
			}
			if field.is_dynamic() {
				dynamic.push(field);
				continue;
			}
			let value = field.get(object.as_any());
			self.write_field(field.name(), field.kind(), value.as_ref().or(field.default_value()), depth + 1);
		}

		if !dynamic.is_empty() {
			let block = self.dynamic_block(object, &dynamic, depth + 1);
			self.out.insert_str(body_start, &block);
		}
		self.line(depth, "}");
	}

	fn dynamic_block(&mut self, object: &dyn PropertyObject, fields: &[&FieldDescriptor], depth: usize) -> String {
		let body = std::mem::take(&mut self.out);
		push_line(&mut self.out, depth, &format!("{DYNAMIC_PROPERTIES}={}", fields.len()));
		push_line(&mut self.out, depth, "{");
		for field in fields {
			let value = field.get(object.as_any());
			self.write_field(field.name(), field.kind(), value.as_ref().or(field.default_value()), depth + 1);
		}
		push_line(&mut self.out, depth, "}");
		std::mem::replace(&mut self.out, body)
	}

	fn write_field(&mut self, name: &str, kind: &ValueKind, value: Option<&PropertyValue>, depth: usize) {
		match value {
			None => self.line(depth, &format!("{name}=")),
			Some(PropertyValue::Object(object)) => {
				self.line(depth, &format!("{name}={}", object.class_name()));
				self.write_body(&**object, depth);
			}
			Some(PropertyValue::List(items)) => {
				let (item_kind, item_name) = match kind {
					ValueKind::List {
						item,
						item_name,
					} => (item.as_ref().clone(), *item_name),
					_ => (ValueKind::Text, "Item"),
				};
				self.line(depth, &format!("{name}={ARRAY_TOKEN}"));
				self.line(depth, "{");
				self.line(depth + 1, &format!("{ITEM_COUNT}={}", items.len()));
				for item in items {
					self.write_field(item_name, &item_kind, item.as_ref(), depth + 1);
				}
				self.line(depth, "}");
			}
			Some(scalar) => {
				let text = kind.format_scalar(scalar);
				self.line(depth, &format!("{name}={text}"));
			}
		}
	}
}

fn push_line(out: &mut String, depth: usize, text: &str) {
	for _ in 0..depth {
		out.push('\t');
	}
	let _ = writeln!(out, "{text}");
}
