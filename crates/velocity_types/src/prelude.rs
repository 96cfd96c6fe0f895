//! Prelude module for `velocity_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and functions.
//!
//! # Examples
//!
//! ```no_run
//! use velocity_types::prelude::*;
//!
//! let context = CodecContext::default();
//! let text = context.serialize(&EngineSettings::default(), PropertySerializationFlags::COMPACT);
//! ```

// Context and options
#[doc(inline)]
pub use crate::context::{CodecContext, DecodeOptions};

// Container types
#[doc(inline)]
pub use crate::file::{
	AtlasImage,
	BlitType,
	BlitTypeRevision,
	FileType,
	Font,
	FontGlyph,
	Frame,
	FrameDecoder,
	FrameMode,
	PixelFormat,
	PlacedFrame,
	Sequence,
	SequenceDecoder,
	SequenceEncoder,
	SequenceFlags,
	SequenceLayout,
	SequenceMode,
	SourceFormat,
	VelocityError,
};

// Geometry and pixels
#[doc(inline)]
pub use crate::geometry::{CanvasPlacement, CropRect};
#[doc(inline)]
pub use crate::imaging::{ImageCrateBackend, ImagingBackend, PixelBuffer};

// Metadata objects
#[doc(inline)]
pub use crate::model::{
	EngineSettings, FontBitmapProperties, FontProperties, FrameProperties, SequenceFrameInfo, SequenceFrameInfoList,
	SequenceProperties,
};

// Property lists
#[doc(inline)]
pub use crate::property::{PropertyClass, PropertySerializationFlags, SchemaRegistry, deserialize, serialize};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
