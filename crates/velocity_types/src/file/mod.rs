//! Binary container support for Velocity Engine assets.

pub(crate) mod error;
pub(crate) mod stream;

pub mod blit;
pub mod codec;
pub mod frame;
pub mod probe;
pub mod sequence;

// Re-export unified error type
pub use error::{FileType, VelocityError};

// Re-export main container types
pub use blit::{BlitType, BlitTypeRevision};
pub use codec::PixelFormat;
pub use frame::{Frame, FrameDecoder, FrameDecoderState, FrameHeader, FrameMode};
pub use sequence::{
	AtlasImage, EmbeddedHeader, Font, FontGlyph, FontHeader, PlacedFrame, Sequence, SequenceDecoder,
	SequenceDecoderState, SequenceEncoder, SequenceFlags, SequenceFlagsBridge, SequenceLayout, SequenceMode,
	SourceFormat,
};
