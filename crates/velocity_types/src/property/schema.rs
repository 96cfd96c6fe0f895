//! Explicit per-class property schemas.
//!
//! Every serializable class lists its properties once, in declaration order, through
//! [`PropertyClass::describe`]. The resulting [`ClassSchema`] holds type-erased accessors so
//! the reader and writer can walk any object without knowing its concrete type.
//!
//! ```text
//! impl PropertyClass for Frame {
//!     const CLASS_NAME = "Frame";
//!     fn describe(schema) {
//!         schema.enumeration("Blit Type", |f| &f.blit_type, |f| &mut f.blit_type);
//!         schema.optional("Quality", ...).include(IMAGE_FORMAT_2);
//!         schema.optional("Comment", ...).exclude(COMPACT);
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::flags::PropertySerializationFlags;
use super::value::{PropertyEnum, PropertyType, PropertyValue, ValueKind};

/// A class that can be written to and read from property-list text.
pub trait PropertyClass: Default + Clone + fmt::Debug + Send + Sync + 'static {
	/// Class token written in front of the object body
	const CLASS_NAME: &'static str;

	/// Declares the properties of the class, in serialization order.
	fn describe(schema: &mut SchemaBuilder<Self>);
}

/// Type-erased view of a [`PropertyClass`] instance.
pub trait PropertyObject: Any + Send + Sync + fmt::Debug {
	/// Class token of the concrete type
	fn class_name(&self) -> &'static str;
	/// Borrow as [`Any`]
	fn as_any(&self) -> &dyn Any;
	/// Mutably borrow as [`Any`]
	fn as_any_mut(&mut self) -> &mut dyn Any;
	/// Clones into a new box
	fn clone_boxed(&self) -> Box<dyn PropertyObject>;
	/// Converts into a boxed [`Any`] for downcasting by value
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
	/// Class handle of the concrete type
	fn class_ref(&self) -> ClassRef;
}

impl<T: PropertyClass> PropertyObject for T {
	fn class_name(&self) -> &'static str {
		T::CLASS_NAME
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn clone_boxed(&self) -> Box<dyn PropertyObject> {
		Box::new(self.clone())
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}

	fn class_ref(&self) -> ClassRef {
		ClassRef::of::<T>()
	}
}

fn create_default<T: PropertyClass>() -> Box<dyn PropertyObject> {
	Box::new(T::default())
}

/// Copyable handle to a property class: its name, type identity, schema builder and
/// default constructor.
#[derive(Clone, Copy)]
pub struct ClassRef {
	name: &'static str,
	type_id: fn() -> TypeId,
	build: fn() -> ClassSchema,
	create: fn() -> Box<dyn PropertyObject>,
}

impl ClassRef {
	/// Handle for `T`.
	pub fn of<T: PropertyClass>() -> Self {
		Self {
			name: T::CLASS_NAME,
			type_id: TypeId::of::<T>,
			build: ClassSchema::build::<T>,
			create: create_default::<T>,
		}
	}

	/// Class token
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type identity of the class
	pub fn type_id(&self) -> TypeId {
		(self.type_id)()
	}

	/// Builds a fresh, uncached schema.
	pub fn build_schema(&self) -> ClassSchema {
		(self.build)()
	}

	/// Creates a default instance.
	pub fn create(&self) -> Box<dyn PropertyObject> {
		(self.create)()
	}
}

impl fmt::Debug for ClassRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ClassRef").field(&self.name).finish()
	}
}

type Getter = Arc<dyn Fn(&dyn Any) -> Option<PropertyValue> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, Option<PropertyValue>) -> bool + Send + Sync>;
type Predicate = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

/// Descriptor of one serialized property.
#[derive(Clone)]
pub struct FieldDescriptor {
	name: &'static str,
	kind: ValueKind,
	default: Option<PropertyValue>,
	nullable: bool,
	dynamic: bool,
	editable: bool,
	transient: bool,
	include: PropertySerializationFlags,
	exclude: PropertySerializationFlags,
	getter: Getter,
	setter: Setter,
	should_serialize: Option<Predicate>,
}

impl fmt::Debug for FieldDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("default", &self.default)
			.field("nullable", &self.nullable)
			.field("dynamic", &self.dynamic)
			.field("include", &self.include)
			.field("exclude", &self.exclude)
			.finish_non_exhaustive()
	}
}

impl FieldDescriptor {
	fn new(name: &'static str, kind: ValueKind, nullable: bool, getter: Getter, setter: Setter) -> Self {
		Self {
			name,
			kind,
			default: None,
			nullable,
			dynamic: false,
			editable: true,
			transient: false,
			include: PropertySerializationFlags::empty(),
			exclude: PropertySerializationFlags::empty(),
			getter,
			setter,
			should_serialize: None,
		}
	}

	/// Declares the value substituted when the field is null.
	pub fn with_default(&mut self, value: impl Into<PropertyValue>) -> &mut Self {
		self.default = Some(value.into());
		self
	}

	/// Moves the field into the `Dynamic Properties` block.
	pub fn dynamic(&mut self) -> &mut Self {
		self.dynamic = true;
		self
	}

	/// Only serialize when at least one of `flags` is active.
	pub fn include(&mut self, flags: PropertySerializationFlags) -> &mut Self {
		self.include |= flags;
		self
	}

	/// Never serialize when any of `flags` is active.
	pub fn exclude(&mut self, flags: PropertySerializationFlags) -> &mut Self {
		self.exclude |= flags;
		self
	}

	/// Marks the field as not editable in tools. Serialization is unaffected.
	pub fn read_only(&mut self) -> &mut Self {
		self.editable = false;
		self
	}

	/// Keeps the field out of the text entirely.
	pub fn transient(&mut self) -> &mut Self {
		self.transient = true;
		self
	}

	/// Serialized name
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Value shape
	pub fn kind(&self) -> &ValueKind {
		&self.kind
	}

	/// Declared default
	pub fn default_value(&self) -> Option<&PropertyValue> {
		self.default.as_ref()
	}

	/// Whether the field can hold null
	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	/// Whether the field goes into the dynamic block
	pub fn is_dynamic(&self) -> bool {
		self.dynamic
	}

	/// Whether tools may edit the field
	pub fn is_editable(&self) -> bool {
		self.editable
	}

	/// Whether the field is kept out of the text
	pub fn is_transient(&self) -> bool {
		self.transient
	}

	/// Include mask
	pub fn include_flags(&self) -> PropertySerializationFlags {
		self.include
	}

	/// Exclude mask
	pub fn exclude_flags(&self) -> PropertySerializationFlags {
		self.exclude
	}

	/// Whether the include/exclude masks admit the field under `flags`.
	pub fn admitted_by(&self, flags: PropertySerializationFlags) -> bool {
		flags.admits(self.include, self.exclude)
	}

	/// Whether the field is written for `object` under `flags`.
	///
	/// The masks are checked first, then the class's should-serialize predicate if it has
	/// one for this field.
	pub fn should_write(&self, object: &dyn Any, flags: PropertySerializationFlags) -> bool {
		if self.transient || !self.admitted_by(flags) {
			return false;
		}
		self.should_serialize.as_ref().is_none_or(|predicate| predicate(object))
	}

	/// Reads the field from `object`. `None` is a null value (or a type mismatch).
	pub fn get(&self, object: &dyn Any) -> Option<PropertyValue> {
		(self.getter)(object)
	}

	/// Writes the field on `object`. Returns false when the value does not fit the field.
	pub fn set(&self, object: &mut dyn Any, value: Option<PropertyValue>) -> bool {
		(self.setter)(object, value)
	}

	/// Re-targets a descriptor of an embedded struct `B` onto its container `T`.
	fn lift<T: 'static, B: 'static>(mut self, lens: fn(&T) -> &B, lens_mut: fn(&mut T) -> &mut B) -> Self {
		let getter = self.getter.clone();
		self.getter = Arc::new(move |object: &dyn Any| {
			object.downcast_ref::<T>().and_then(|outer| getter(lens(outer) as &dyn Any))
		});

		let setter = self.setter.clone();
		self.setter = Arc::new(move |object: &mut dyn Any, value| {
			object.downcast_mut::<T>().is_some_and(|outer| setter(lens_mut(outer) as &mut dyn Any, value))
		});

		if let Some(predicate) = self.should_serialize.take() {
			self.should_serialize = Some(Arc::new(move |object: &dyn Any| {
				object.downcast_ref::<T>().is_some_and(|outer| predicate(lens(outer) as &dyn Any))
			}));
		}
		self
	}
}

/// The schema of one class: its token, type identity and ordered fields.
#[derive(Debug)]
pub struct ClassSchema {
	class_name: &'static str,
	type_id: TypeId,
	fields: Vec<FieldDescriptor>,
}

impl ClassSchema {
	/// Builds the schema of `T` from its [`PropertyClass::describe`] table.
	pub fn build<T: PropertyClass>() -> Self {
		let mut builder = SchemaBuilder::<T>::new();
		T::describe(&mut builder);
		Self {
			class_name: T::CLASS_NAME,
			type_id: TypeId::of::<T>(),
			fields: builder.fields,
		}
	}

	/// Class token
	pub fn class_name(&self) -> &'static str {
		self.class_name
	}

	/// Type identity of the class
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Fields in declaration order
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Resolves a property name read from text.
	///
	/// Prefers the first field with that name whose masks admit `flags`, so a class can
	/// declare the same name once per format generation. Falls back to the first field with
	/// the name.
	pub fn resolve(&self, name: &str, flags: PropertySerializationFlags) -> Option<&FieldDescriptor> {
		let mut candidates = self.fields.iter().filter(|field| field.name == name);
		let first = candidates.next()?;
		if first.admitted_by(flags) {
			return Some(first);
		}
		Some(candidates.find(|field| field.admitted_by(flags)).unwrap_or(first))
	}
}

/// Collects the field table of `T`.
pub struct SchemaBuilder<T> {
	fields: Vec<FieldDescriptor>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: PropertyClass> SchemaBuilder<T> {
	fn new() -> Self {
		Self {
			fields: Vec::new(),
			_marker: PhantomData,
		}
	}

	fn push(&mut self, field: FieldDescriptor) -> &mut FieldDescriptor {
		let index = self.fields.len();
		self.fields.push(field);
		&mut self.fields[index]
	}

	/// A non-nullable scalar property.
	pub fn required<V: PropertyType + Clone>(
		&mut self,
		name: &'static str,
		get: fn(&T) -> &V,
		get_mut: fn(&mut T) -> &mut V,
	) -> &mut FieldDescriptor {
		let getter: Getter =
			Arc::new(move |object: &dyn Any| object.downcast_ref::<T>().map(|t| get(t).to_value()));
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let (Some(target), Some(value)) = (object.downcast_mut::<T>(), value) else {
				return false;
			};
			match V::from_value(value) {
				Some(value) => {
					*get_mut(target) = value;
					true
				}
				None => false,
			}
		});
		self.push(FieldDescriptor::new(name, V::kind(), false, getter, setter))
	}

	/// A nullable scalar property.
	pub fn optional<V: PropertyType + Clone>(
		&mut self,
		name: &'static str,
		get: fn(&T) -> &Option<V>,
		get_mut: fn(&mut T) -> &mut Option<V>,
	) -> &mut FieldDescriptor {
		let getter: Getter = Arc::new(move |object: &dyn Any| {
			object.downcast_ref::<T>().and_then(|t| get(t).as_ref().map(PropertyType::to_value))
		});
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let Some(target) = object.downcast_mut::<T>() else {
				return false;
			};
			match value {
				None => {
					*get_mut(target) = None;
					true
				}
				Some(value) => match V::from_value(value) {
					Some(value) => {
						*get_mut(target) = Some(value);
						true
					}
					None => false,
				},
			}
		});
		self.push(FieldDescriptor::new(name, V::kind(), true, getter, setter))
	}

	/// A list of scalars, written as `Array` with one `item_name=` line per element.
	pub fn list<V: PropertyType + Clone>(
		&mut self,
		name: &'static str,
		item_name: &'static str,
		get: fn(&T) -> &Vec<V>,
		get_mut: fn(&mut T) -> &mut Vec<V>,
	) -> &mut FieldDescriptor {
		let getter: Getter = Arc::new(move |object: &dyn Any| {
			object
				.downcast_ref::<T>()
				.map(|t| PropertyValue::List(get(t).iter().map(|item| Some(item.to_value())).collect()))
		});
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let Some(target) = object.downcast_mut::<T>() else {
				return false;
			};
			match value {
				None => {
					get_mut(target).clear();
					true
				}
				Some(PropertyValue::List(items)) => {
					// null items have no slot in a list of plain values
					*get_mut(target) = items.into_iter().flatten().filter_map(V::from_value).collect();
					true
				}
				Some(_) => false,
			}
		});
		let kind = ValueKind::List {
			item: Box::new(V::kind()),
			item_name,
		};
		self.push(FieldDescriptor::new(name, kind, false, getter, setter))
	}

	/// A nullable enum property, written by descriptor name.
	pub fn enumeration<E: PropertyEnum>(
		&mut self,
		name: &'static str,
		get: fn(&T) -> &Option<E>,
		get_mut: fn(&mut T) -> &mut Option<E>,
	) -> &mut FieldDescriptor {
		let getter: Getter = Arc::new(move |object: &dyn Any| {
			object.downcast_ref::<T>().and_then(|t| get(t).map(PropertyValue::from_enum))
		});
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let Some(target) = object.downcast_mut::<T>() else {
				return false;
			};
			match value {
				None => {
					*get_mut(target) = None;
					true
				}
				Some(PropertyValue::Enum(raw) | PropertyValue::Int(raw)) => match E::from_raw(raw) {
					Some(member) => {
						*get_mut(target) = Some(member);
						true
					}
					None => false,
				},
				Some(_) => false,
			}
		});
		self.push(FieldDescriptor::new(name, ValueKind::Enum(E::descriptor()), true, getter, setter))
	}

	/// A nullable nested object.
	pub fn object<V: PropertyClass>(
		&mut self,
		name: &'static str,
		get: fn(&T) -> &Option<V>,
		get_mut: fn(&mut T) -> &mut Option<V>,
	) -> &mut FieldDescriptor {
		let getter: Getter = Arc::new(move |object: &dyn Any| {
			object
				.downcast_ref::<T>()
				.and_then(|t| get(t).as_ref().map(|v| PropertyValue::Object(Box::new(v.clone()))))
		});
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let Some(target) = object.downcast_mut::<T>() else {
				return false;
			};
			match value {
				None => {
					*get_mut(target) = None;
					true
				}
				Some(PropertyValue::Object(inner)) => match inner.into_any().downcast::<V>() {
					Ok(inner) => {
						*get_mut(target) = Some(*inner);
						true
					}
					Err(_) => false,
				},
				Some(_) => false,
			}
		});
		self.push(FieldDescriptor::new(name, ValueKind::Object(ClassRef::of::<V>()), true, getter, setter))
	}

	/// A list of nullable nested objects.
	pub fn object_list<V: PropertyClass>(
		&mut self,
		name: &'static str,
		item_name: &'static str,
		get: fn(&T) -> &Vec<Option<V>>,
		get_mut: fn(&mut T) -> &mut Vec<Option<V>>,
	) -> &mut FieldDescriptor {
		let getter: Getter = Arc::new(move |object: &dyn Any| {
			object.downcast_ref::<T>().map(|t| {
				PropertyValue::List(
					get(t)
						.iter()
						.map(|item| item.as_ref().map(|v| PropertyValue::Object(Box::new(v.clone()))))
						.collect(),
				)
			})
		});
		let setter: Setter = Arc::new(move |object: &mut dyn Any, value| {
			let Some(target) = object.downcast_mut::<T>() else {
				return false;
			};
			match value {
				None => {
					get_mut(target).clear();
					true
				}
				Some(PropertyValue::List(items)) => {
					*get_mut(target) = items
						.into_iter()
						.map(|item| match item {
							Some(PropertyValue::Object(inner)) => {
								inner.into_any().downcast::<V>().ok().map(|inner| *inner)
							}
							_ => None,
						})
						.collect();
					true
				}
				Some(_) => false,
			}
		});
		let kind = ValueKind::List {
			item: Box::new(ValueKind::Object(ClassRef::of::<V>())),
			item_name,
		};
		self.push(FieldDescriptor::new(name, kind, false, getter, setter))
	}

	/// Splices the fields of an embedded struct `B` at this point of the table.
	pub fn embed<B: PropertyClass>(&mut self, lens: fn(&T) -> &B, lens_mut: fn(&mut T) -> &mut B) -> &mut Self {
		let base = ClassSchema::build::<B>();
		self.fields.extend(base.fields.into_iter().map(|field| field.lift(lens, lens_mut)));
		self
	}

	/// Attaches a should-serialize predicate to every field named `name`.
	pub fn should_serialize(&mut self, name: &'static str, predicate: fn(&T) -> bool) -> &mut Self {
		let predicate: Predicate =
			Arc::new(move |object: &dyn Any| object.downcast_ref::<T>().is_some_and(predicate));
		for field in self.fields.iter_mut().filter(|field| field.name == name) {
			field.should_serialize = Some(predicate.clone());
		}
		self
	}
}
