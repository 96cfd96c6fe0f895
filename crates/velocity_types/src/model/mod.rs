//! Property-list object models.
//!
//! Asset metadata (`Frame`, `Sequence`, the frame-info list and fonts), level objects and
//! the engine settings. Each type lists its properties in
//! [`describe`](crate::property::PropertyClass::describe), and [`register_engine_classes`]
//! makes all of them resolvable by class token.

mod decoration;
mod font;
mod frame;
mod sequence;
mod settings;

pub use decoration::{Brick, BrickKind, BrickLayout, Decal, Decoration, DecorationShape, ShapePoint};
pub use font::{FontBitmapProperties, FontProperties};
pub use frame::FrameProperties;
pub use sequence::{SequenceFrameInfo, SequenceFrameInfoList, SequenceProperties};
pub use settings::EngineSettings;

use log::debug;

use crate::property::{ClassRef, SchemaRegistry};

/// Every class the engine writes, in registration order.
pub fn engine_classes() -> [ClassRef; 13] {
	[
		ClassRef::of::<FrameProperties>(),
		ClassRef::of::<SequenceProperties>(),
		ClassRef::of::<SequenceFrameInfoList>(),
		ClassRef::of::<SequenceFrameInfo>(),
		ClassRef::of::<FontProperties>(),
		ClassRef::of::<FontBitmapProperties>(),
		ClassRef::of::<Decoration>(),
		ClassRef::of::<Decal>(),
		ClassRef::of::<DecorationShape>(),
		ClassRef::of::<ShapePoint>(),
		ClassRef::of::<Brick>(),
		ClassRef::of::<BrickLayout>(),
		ClassRef::of::<EngineSettings>(),
	]
}

/// Registers every engine class by name.
pub fn register_engine_classes(registry: &SchemaRegistry) {
	for class in engine_classes() {
		registry.register_class(class);
	}
	debug!("registered {} engine classes", registry.registered_names());
}
