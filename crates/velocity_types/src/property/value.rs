//! Dynamically typed property values and the conversions from Rust field types.

use std::fmt;

use super::schema::{ClassRef, PropertyObject};

/// A single property value as it travels between a typed field and the text format.
///
/// `None` at the use sites (`Option<PropertyValue>`) is the null value.
#[derive(Debug)]
pub enum PropertyValue {
	/// `1` / `0` in text
	Bool(bool),
	/// Signed integer
	Int(i64),
	/// Single precision float
	Float(f32),
	/// Double precision float
	Double(f64),
	/// Free text, written verbatim
	Text(String),
	/// Raw enum discriminant, named through the field's [`EnumDescriptor`]
	Enum(i64),
	/// Nested property object
	Object(Box<dyn PropertyObject>),
	/// List items, `None` entries are null items
	List(Vec<Option<PropertyValue>>),
}

impl Clone for PropertyValue {
	fn clone(&self) -> Self {
		match self {
			Self::Bool(v) => Self::Bool(*v),
			Self::Int(v) => Self::Int(*v),
			Self::Float(v) => Self::Float(*v),
			Self::Double(v) => Self::Double(*v),
			Self::Text(v) => Self::Text(v.clone()),
			Self::Enum(v) => Self::Enum(*v),
			Self::Object(v) => Self::Object(v.clone_boxed()),
			Self::List(v) => Self::List(v.clone()),
		}
	}
}

impl PropertyValue {
	/// Compares two scalar values. Objects and lists never compare equal.
	pub fn scalar_eq(&self, other: &PropertyValue) -> bool {
		match (self, other) {
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) | (Self::Enum(a), Self::Enum(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Double(a), Self::Double(b)) => a == b,
			(Self::Text(a), Self::Text(b)) => a == b,
			_ => false,
		}
	}
}

impl From<bool> for PropertyValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for PropertyValue {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<i64> for PropertyValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f32> for PropertyValue {
	fn from(value: f32) -> Self {
		Self::Float(value)
	}
}

impl From<f64> for PropertyValue {
	fn from(value: f64) -> Self {
		Self::Double(value)
	}
}

impl From<&str> for PropertyValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl PropertyValue {
	/// Wraps an enum member as its raw discriminant.
	pub fn from_enum<E: PropertyEnum>(value: E) -> Self {
		Self::Enum(value.to_raw())
	}
}

/// One member of an enum descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
	/// Discriminant
	pub value: i64,
	/// Descriptor name, untagged members are written as their integer
	pub name: Option<&'static str>,
}

impl EnumMember {
	/// A member written by name.
	pub const fn named(value: i64, name: &'static str) -> Self {
		Self {
			value,
			name: Some(name),
		}
	}

	/// A member written as its raw integer.
	pub const fn raw(value: i64) -> Self {
		Self {
			value,
			name: None,
		}
	}
}

/// Static description of an enum used as a property type.
#[derive(Debug)]
pub struct EnumDescriptor {
	/// Rust type name, for diagnostics
	pub type_name: &'static str,
	/// Declared members
	pub members: &'static [EnumMember],
}

impl EnumDescriptor {
	/// Descriptor name of a discriminant, if the member is tagged.
	pub fn name_of(&self, value: i64) -> Option<&'static str> {
		self.members.iter().find(|m| m.value == value).and_then(|m| m.name)
	}

	/// Text form of a discriminant: its descriptor name or the raw integer.
	pub fn format(&self, value: i64) -> String {
		self.name_of(value).map_or_else(|| value.to_string(), str::to_string)
	}

	/// Parses either a member name or a raw integer.
	pub fn parse(&self, text: &str) -> Option<i64> {
		if let Some(member) = self.members.iter().find(|m| m.name == Some(text)) {
			return Some(member.value);
		}
		text.parse::<i64>().ok()
	}
}

/// An enum that can be stored in a property field.
pub trait PropertyEnum: Copy + Send + Sync + 'static {
	/// Static member table
	fn descriptor() -> &'static EnumDescriptor;
	/// Discriminant of `self`
	fn to_raw(self) -> i64;
	/// Member for a discriminant
	fn from_raw(raw: i64) -> Option<Self>;
}

/// Shape of a field's value, used to resolve the text form while parsing.
#[derive(Clone)]
pub enum ValueKind {
	/// Boolean
	Bool,
	/// Integer
	Int,
	/// Single precision float
	Float,
	/// Double precision float
	Double,
	/// Text
	Text,
	/// Enum with its member table
	Enum(&'static EnumDescriptor),
	/// Nested property object
	Object(ClassRef),
	/// Array of items tagged `item_name`
	List {
		/// Kind of every item
		item: Box<ValueKind>,
		/// Tag written in front of each item
		item_name: &'static str,
	},
}

impl fmt::Debug for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => write!(f, "Bool"),
			Self::Int => write!(f, "Int"),
			Self::Float => write!(f, "Float"),
			Self::Double => write!(f, "Double"),
			Self::Text => write!(f, "Text"),
			Self::Enum(descriptor) => write!(f, "Enum({})", descriptor.type_name),
			Self::Object(class) => write!(f, "Object({})", class.name()),
			Self::List {
				item,
				item_name,
			} => write!(f, "List<{item:?}>({item_name})"),
		}
	}
}

impl ValueKind {
	/// Parses a non-empty scalar text value. Returns `None` for malformed text and for
	/// object/list kinds.
	pub fn parse_scalar(&self, text: &str) -> Option<PropertyValue> {
		match self {
			Self::Bool => match text {
				"1" | "true" | "True" => Some(PropertyValue::Bool(true)),
				"0" | "false" | "False" => Some(PropertyValue::Bool(false)),
				_ => None,
			},
			Self::Int => text.parse::<i64>().ok().map(PropertyValue::Int),
			Self::Float => text.parse::<f32>().ok().map(PropertyValue::Float),
			Self::Double => text.parse::<f64>().ok().map(PropertyValue::Double),
			Self::Text => Some(PropertyValue::Text(text.to_string())),
			Self::Enum(descriptor) => descriptor.parse(text).map(PropertyValue::Enum),
			Self::Object(_) | Self::List { .. } => None,
		}
	}

	/// Formats a scalar value. Objects and lists are written by the serializer itself.
	pub fn format_scalar(&self, value: &PropertyValue) -> String {
		match (self, value) {
			(Self::Enum(descriptor), PropertyValue::Enum(raw) | PropertyValue::Int(raw)) => {
				descriptor.format(*raw)
			}
			(_, PropertyValue::Bool(v)) => if *v { "1" } else { "0" }.to_string(),
			(_, PropertyValue::Int(v) | PropertyValue::Enum(v)) => v.to_string(),
			(_, PropertyValue::Float(v)) => v.to_string(),
			(_, PropertyValue::Double(v)) => v.to_string(),
			(_, PropertyValue::Text(v)) => v.clone(),
			(_, PropertyValue::Object(object)) => object.class_name().to_string(),
			(_, PropertyValue::List(_)) => "Array".to_string(),
		}
	}
}

/// A plain Rust type that maps onto a scalar property value.
pub trait PropertyType: Sized + Send + Sync + 'static {
	/// Value kind used for parsing
	fn kind() -> ValueKind;
	/// Converts the field into a property value
	fn to_value(&self) -> PropertyValue;
	/// Converts a parsed value back into the field type
	fn from_value(value: PropertyValue) -> Option<Self>;
}

impl PropertyType for bool {
	fn kind() -> ValueKind {
		ValueKind::Bool
	}

	fn to_value(&self) -> PropertyValue {
		PropertyValue::Bool(*self)
	}

	fn from_value(value: PropertyValue) -> Option<Self> {
		match value {
			PropertyValue::Bool(v) => Some(v),
			PropertyValue::Int(v) => Some(v != 0),
			_ => None,
		}
	}
}

macro_rules! impl_integer_property {
	($($ty:ty),* $(,)?) => {
		$(
			impl PropertyType for $ty {
				fn kind() -> ValueKind {
					ValueKind::Int
				}

				fn to_value(&self) -> PropertyValue {
					PropertyValue::Int(i64::from(*self))
				}

				fn from_value(value: PropertyValue) -> Option<Self> {
					match value {
						PropertyValue::Int(v) | PropertyValue::Enum(v) => <$ty>::try_from(v).ok(),
						PropertyValue::Bool(v) => Some(<$ty>::from(v)),
						_ => None,
					}
				}
			}
		)*
	};
}

impl_integer_property!(u8, u16, i16, u32, i32, i64);

impl PropertyType for f32 {
	fn kind() -> ValueKind {
		ValueKind::Float
	}

	fn to_value(&self) -> PropertyValue {
		PropertyValue::Float(*self)
	}

	fn from_value(value: PropertyValue) -> Option<Self> {
		match value {
			PropertyValue::Float(v) => Some(v),
			PropertyValue::Double(v) => Some(v as f32),
			PropertyValue::Int(v) => Some(v as f32),
			_ => None,
		}
	}
}

impl PropertyType for f64 {
	fn kind() -> ValueKind {
		ValueKind::Double
	}

	fn to_value(&self) -> PropertyValue {
		PropertyValue::Double(*self)
	}

	fn from_value(value: PropertyValue) -> Option<Self> {
		match value {
			PropertyValue::Double(v) => Some(v),
			PropertyValue::Float(v) => Some(f64::from(v)),
			PropertyValue::Int(v) => Some(v as f64),
			_ => None,
		}
	}
}

impl PropertyType for String {
	fn kind() -> ValueKind {
		ValueKind::Text
	}

	fn to_value(&self) -> PropertyValue {
		PropertyValue::Text(self.clone())
	}

	fn from_value(value: PropertyValue) -> Option<Self> {
		match value {
			PropertyValue::Text(v) => Some(v),
			_ => None,
		}
	}
}
