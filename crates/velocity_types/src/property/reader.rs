//! Property-list reader.
//!
//! A forward-only scanner over trimmed lines. It is best-effort: unknown properties,
//! unparsable values and mismatched classes are skipped, and the only reported outcome is
//! whether the expected root class was found.
//!
//! Line kinds:
//!
//! ```text
//! <blank>            skipped
//! {  }               nesting
//! Key=Value          property; `Array` and class values continue in a braced block
//! ClassName          root marker when it matches the target, else a block to skip
//! ```

use log::debug;

use super::flags::PropertySerializationFlags;
use super::inference;
use super::registry::SchemaRegistry;
use super::schema::{ClassRef, ClassSchema, PropertyClass, PropertyObject};
use super::value::{PropertyValue, ValueKind};
use super::writer::DYNAMIC_PROPERTIES;

/// Reads the first `T` block of `text` into `target`.
///
/// Returns false when no line names the class of `T`. Properties read before that point are
/// not applied. `flags` is updated from the inference table as properties are assigned.
pub fn deserialize<T: PropertyClass>(
	registry: &SchemaRegistry,
	text: &str,
	target: &mut T,
	flags: &mut PropertySerializationFlags,
) -> bool {
	deserialize_object(registry, text, target, flags)
}

/// Type-erased form of [`deserialize`].
pub fn deserialize_object(
	registry: &SchemaRegistry,
	text: &str,
	target: &mut dyn PropertyObject,
	flags: &mut PropertySerializationFlags,
) -> bool {
	let mut reader = PropertyReader {
		registry,
		lines: text.lines().map(str::trim).collect(),
		cursor: 0,
		flags,
	};
	reader.read_root(target)
}

struct PropertyReader<'a, 'f> {
	registry: &'a SchemaRegistry,
	lines: Vec<&'a str>,
	cursor: usize,
	flags: &'f mut PropertySerializationFlags,
}

/// Outcome of reading one value.
enum Parsed {
	/// Assign this value; `None` assigns null
	Assign(Option<PropertyValue>),
	/// Leave the field untouched
	Skip,
}

impl<'a> PropertyReader<'a, '_> {
	fn next_line(&mut self) -> Option<&'a str> {
		let line = self.lines.get(self.cursor).copied();
		if line.is_some() {
			self.cursor += 1;
		}
		line
	}

	/// Consumes an opening brace when it is the next non-blank line.
	fn open_block(&mut self) -> bool {
		let mut ahead = self.cursor;
		while let Some(line) = self.lines.get(ahead) {
			if line.is_empty() {
				ahead += 1;
				continue;
			}
			if *line == "{" {
				self.cursor = ahead + 1;
				return true;
			}
			return false;
		}
		false
	}

	/// Skips to the brace closing an already opened block.
	fn skip_block(&mut self) {
		let mut depth = 1usize;
		while let Some(line) = self.next_line() {
			match line {
				"{" => depth += 1,
				"}" => {
					depth -= 1;
					if depth == 0 {
						return;
					}
				}
				_ => {}
			}
		}
	}

	fn skip_optional_block(&mut self) {
		if self.open_block() {
			self.skip_block();
		}
	}

	fn read_root(&mut self, target: &mut dyn PropertyObject) -> bool {
		let class_name = target.class_name();
		while let Some(line) = self.next_line() {
			if line.is_empty() || line == "}" {
				continue;
			}
			if line == "{" {
				self.skip_block();
				continue;
			}
			if line.contains('=') {
				// properties outside of any class block
				self.skip_optional_block();
				continue;
			}
			if line == class_name {
				let schema = self.registry.resolve(target.class_ref());
				if self.open_block() {
					self.read_members(target, &schema);
				}
				return true;
			}
			debug!("skipping {line} block while looking for {class_name}");
			self.skip_optional_block();
		}
		false
	}

	/// Reads properties up to the closing brace of the current block.
	fn read_members(&mut self, target: &mut dyn PropertyObject, schema: &ClassSchema) {
		while let Some(line) = self.next_line() {
			if line.is_empty() {
				continue;
			}
			if line == "}" {
				return;
			}
			if line == "{" {
				self.skip_block();
				continue;
			}
			let Some((key, value)) = line.split_once('=') else {
				debug!("{}: skipping nested {line}", schema.class_name());
				self.skip_optional_block();
				continue;
			};
			let (key, value) = (key.trim(), value.trim());

			if key == DYNAMIC_PROPERTIES {
				if self.open_block() {
					self.read_members(target, schema);
				}
				continue;
			}

			let Some(field) = schema.resolve(key, *self.flags) else {
				debug!("{}: unknown property {key}", schema.class_name());
				self.skip_optional_block();
				continue;
			};

			let value = match self.read_value(field.kind(), value) {
				Parsed::Assign(value) => value,
				Parsed::Skip => {
					debug!("{}: unreadable value for {key}: {value}", schema.class_name());
					continue;
				}
			};

			if field.set(target.as_any_mut(), value) {
				inference::on_assigned(schema.class_name(), field.name(), self.flags);
			} else {
				debug!("{}: value does not fit {key}", schema.class_name());
			}
		}
	}

	fn read_value(&mut self, kind: &ValueKind, text: &str) -> Parsed {
		match kind {
			ValueKind::Object(class) => self.read_object(*class, text),
			ValueKind::List {
				item,
				..
			} => self.read_list(item, text),
			scalar => {
				// scalars never own a block; a stray one is dropped
				self.skip_optional_block();
				if text.is_empty() {
					Parsed::Assign(None)
				} else {
					scalar.parse_scalar(text).map_or(Parsed::Skip, |v| Parsed::Assign(Some(v)))
				}
			}
		}
	}

	fn read_object(&mut self, class: ClassRef, text: &str) -> Parsed {
		if !self.open_block() {
			return if text.is_empty() { Parsed::Assign(None) } else { Parsed::Skip };
		}

		let resolved = if text.is_empty() || text == class.name() {
			Some((class, self.registry.resolve(class)))
		} else {
			self.registry.lookup_name(text)
		};
		let Some((class, schema)) = resolved else {
			debug!("unknown class {text} where {} was expected", class.name());
			self.skip_block();
			return Parsed::Skip;
		};

		let mut object = class.create();
		self.read_members(&mut *object, &schema);
		Parsed::Assign(Some(PropertyValue::Object(object)))
	}

	fn read_list(&mut self, item: &ValueKind, text: &str) -> Parsed {
		if !self.open_block() {
			return if text.is_empty() { Parsed::Assign(None) } else { Parsed::Skip };
		}

		let mut count = None;
		let mut items = Vec::new();
		while let Some(line) = self.next_line() {
			if line.is_empty() {
				continue;
			}
			if line == "}" {
				break;
			}
			if line == "{" {
				self.skip_block();
				continue;
			}
			let Some((_, value)) = line.split_once('=') else {
				self.skip_optional_block();
				continue;
			};
			let value = value.trim();

			// the first entry is the count, whatever its key
			let Some(expected) = count else {
				count = Some(value.parse::<usize>().unwrap_or(0));
				continue;
			};

			if items.len() >= expected {
				self.skip_optional_block();
				continue;
			}
			match self.read_value(item, value) {
				Parsed::Assign(value) => items.push(value),
				Parsed::Skip => items.push(None),
			}
		}
		Parsed::Assign(Some(PropertyValue::List(items)))
	}
}
