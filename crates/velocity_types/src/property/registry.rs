//! Schema caches.
//!
//! Schemas are cached twice: by type identity for callers that know the target type, and by
//! class token for the reader, which only sees names in the text. The two caches are filled
//! independently. Entries are written once and never replaced, so every lookup for the same
//! key returns the same [`Arc`].

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::trace;

use super::schema::{ClassRef, ClassSchema, PropertyClass};

/// Registry of property class schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	by_type: RwLock<HashMap<TypeId, Arc<ClassSchema>>>,
	by_name: RwLock<HashMap<&'static str, (ClassRef, Arc<ClassSchema>)>>,
}

impl SchemaRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Schema of `T`, built on first use.
	pub fn schema_of<T: PropertyClass>(&self) -> Arc<ClassSchema> {
		self.resolve(ClassRef::of::<T>())
	}

	/// Schema of `class` from the type-identity cache, built on first use.
	pub fn resolve(&self, class: ClassRef) -> Arc<ClassSchema> {
		let type_id = class.type_id();
		if let Some(schema) = self.by_type.read().unwrap_or_else(PoisonError::into_inner).get(&type_id) {
			return schema.clone();
		}

		// built outside the lock; a racing builder loses and its schema is dropped
		let built = Arc::new(class.build_schema());
		let mut cache = self.by_type.write().unwrap_or_else(PoisonError::into_inner);
		let schema = cache.entry(type_id).or_insert_with(|| {
			trace!("schema cached by type: {}", class.name());
			built
		});
		schema.clone()
	}

	/// Makes `T` resolvable by its class token.
	pub fn register<T: PropertyClass>(&self) -> Arc<ClassSchema> {
		self.register_class(ClassRef::of::<T>())
	}

	/// Makes `class` resolvable by its class token.
	pub fn register_class(&self, class: ClassRef) -> Arc<ClassSchema> {
		if let Some((_, schema)) =
			self.by_name.read().unwrap_or_else(PoisonError::into_inner).get(class.name())
		{
			return schema.clone();
		}

		let built = Arc::new(class.build_schema());
		let mut cache = self.by_name.write().unwrap_or_else(PoisonError::into_inner);
		let (_, schema) = cache.entry(class.name()).or_insert_with(|| {
			trace!("schema cached by name: {}", class.name());
			(class, built)
		});
		schema.clone()
	}

	/// Looks up a registered class by its token.
	pub fn lookup_name(&self, name: &str) -> Option<(ClassRef, Arc<ClassSchema>)> {
		self.by_name
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(name)
			.map(|(class, schema)| (*class, schema.clone()))
	}

	/// Number of schemas in the type-identity cache.
	pub fn cached_types(&self) -> usize {
		self.by_type.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	/// Number of classes registered by name.
	pub fn registered_names(&self) -> usize {
		self.by_name.read().unwrap_or_else(PoisonError::into_inner).len()
	}
}
