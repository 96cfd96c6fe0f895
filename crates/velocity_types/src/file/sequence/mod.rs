//! Animation sequence containers.
//!
//! Sequences come in two families. Atlas sequences store every frame in one image and
//! describe the frames in a frame-info list; embedded sequences store a full mode 2 frame
//! container per frame. The family is not self-describing; callers pick the
//! [`SequenceMode`].
//!
//! # Atlas layouts
//!
//! The layout is detected by probing for a zlib header at offset 9 (standard), then at
//! offset 21 (font). If neither is found the container is HD.
//!
//! ```text
//! HD:                              Standard / font:
//!   u32  property list size          (font only)
//!   ...  property list text            u32  first character code
//!   DDS:                               u32  last character code
//!     ...  BC3 blocks to the end       i32  x-height
//!   otherwise:                       u8   signature 0x01
//!     u8   scan byte                 u32  deflated size
//!     u32  image size                u32  inflated size
//!     ...  RGBA8888                  ...  zlib frame-info list
//!     u32  width                     compressed atlas:        uncompressed atlas:
//!     u32  height                      u8   scan byte           u32  JPEG size
//!                                      u32  deflated size       ...  JPEG bytes
//!                                      u32  inflated size       u8   pad
//!                                      ...  zlib planar RGBA    u32  inflated mask size
//!                                      u32  width               ...  zlib mask to the end
//!                                      u32  height
//! ```
//!
//! # Embedded layout
//!
//! ```text
//! u32  source format magic ("VS01".."VS06")
//! ...  positional property block, layout per source format
//! i32  hot spot x, i32 hot spot y
//! i32  center x, i32 center y
//! (menu formats only)
//!      u32  dynamic property count
//!      per property: u32 name size, name, u32 payload size, payload
//! repeated:
//!      u8   separator (0x01 frame follows, 0x00 end)
//!      ...  mode 2 frame container
//! ```

mod decoder;
mod encoder;
mod flags;
mod font;
mod render;
mod source_format;

use serde::{Deserialize, Serialize};

pub use decoder::{SequenceDecoder, SequenceDecoderState};
pub use encoder::{PlacedFrame, SequenceEncoder, pack_strip};
pub use flags::{SequenceFlags, SequenceFlagsBridge};
pub use font::{Font, FontGlyph};
pub use source_format::{MENU_POSITION, SourceFormat, read_dynamic_block};

use crate::context::CodecContext;
use crate::file::error::VelocityError;
use crate::file::frame::Frame;
use crate::model::{SequenceFrameInfoList, SequenceProperties};
use crate::property::PropertySerializationFlags;

/// Signature byte in front of the frame-info list of standard and font containers.
pub const SEQUENCE_SIGNATURE: u8 = 0x01;

/// Embedded frame separator: another frame follows.
pub const SEPARATOR_FRAME: u8 = 0x01;

/// Embedded frame separator: end of the sequence.
pub const SEPARATOR_END: u8 = 0x00;

/// Container family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceMode {
	/// Shared atlas with a frame-info list
	Atlas,
	/// One mode 2 frame container per frame
	Embedded,
}

/// Concrete layout a sequence was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceLayout {
	/// Uncompressed property list, interleaved or BC3 atlas
	Hd,
	/// Compressed frame-info list
	Standard,
	/// Standard layout behind a font header
	Font,
	/// Embedded frames of one title
	Embedded(SourceFormat),
}

/// Character range and metrics in front of a font container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHeader {
	/// First character code
	pub first: u32,
	/// Last character code, inclusive
	pub last: u32,
	/// Height of lowercase letters
	pub x_height: i32,
}

impl FontHeader {
	/// Number of characters in the range.
	pub fn glyph_count(&self) -> usize {
		if self.last < self.first {
			return 0;
		}
		(self.last - self.first) as usize + 1
	}
}

/// Fixed fields of an embedded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EmbeddedHeader {
	/// Hot spot x
	pub hot_spot_x: i32,
	/// Hot spot y
	pub hot_spot_y: i32,
	/// Center x
	pub center_x: i32,
	/// Center y
	pub center_y: i32,
}

/// Atlas payload as stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AtlasImage {
	/// No atlas bytes; the sequence has no pixels
	#[default]
	Empty,
	/// RGBA8888 (HD)
	Interleaved {
		/// Width
		width: u32,
		/// Height
		height: u32,
		/// Pixel bytes
		data: Vec<u8>,
	},
	/// Inflated delta-coded planar RGBA
	Planar {
		/// Width
		width: u32,
		/// Height
		height: u32,
		/// Plane bytes
		data: Vec<u8>,
	},
	/// JPEG color with an optional inflated alpha mask
	Jpeg {
		/// JPEG stream
		jpeg: Vec<u8>,
		/// Delta-coded mask plane
		mask: Option<Vec<u8>>,
	},
	/// Back-to-back BC3 blocks, one run per frame
	Bc3(Vec<u8>),
}

impl AtlasImage {
	/// Stored width and height. JPEG atlases carry their size inside the stream.
	pub fn size(&self) -> Option<(u32, u32)> {
		match self {
			Self::Interleaved {
				width,
				height,
				..
			}
			| Self::Planar {
				width,
				height,
				..
			} => Some((*width, *height)),
			Self::Empty | Self::Jpeg { .. } | Self::Bc3(_) => None,
		}
	}

	/// True when no atlas bytes were stored.
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}
}

/// A decoded sequence container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
	/// Layout the container was read with
	pub layout: SequenceLayout,
	/// Font range, for font containers
	pub font_header: Option<FontHeader>,
	/// Fixed fields, for embedded containers
	pub embedded_header: Option<EmbeddedHeader>,
	/// Metadata after reconciliation
	pub properties: SequenceProperties,
	/// Flags in effect after reading the property lists
	pub property_flags: PropertySerializationFlags,
	/// Per-frame geometry; empty for embedded containers
	pub frame_infos: SequenceFrameInfoList,
	/// Property list text stored inside the container (HD and frame-info blob)
	#[serde(skip)]
	pub property_list: String,
	/// Atlas payload
	#[serde(skip)]
	pub atlas: AtlasImage,
	/// Embedded frame containers
	#[serde(skip)]
	pub frames: Vec<Frame>,
}

impl Sequence {
	/// Decodes a sequence from a byte slice.
	pub fn from_bytes(context: &CodecContext, mode: SequenceMode, data: &[u8]) -> Result<Self, VelocityError> {
		SequenceDecoder::new(context, mode).decode(&mut std::io::Cursor::new(data), None)
	}

	/// Reads and decodes a sequence file, with its companion property list if one is given.
	pub fn open(
		context: &CodecContext,
		mode: SequenceMode,
		path: impl AsRef<std::path::Path>,
		property_list: Option<impl AsRef<std::path::Path>>,
	) -> Result<Self, VelocityError> {
		let data = std::fs::read(path)?;
		let text = property_list.map(std::fs::read).transpose()?;
		let text = text.as_deref().map(crate::property::decode_text);
		SequenceDecoder::new(context, mode).decode(&mut std::io::Cursor::new(data), text.as_deref())
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		match self.layout {
			SequenceLayout::Embedded(_) => self.frames.len(),
			_ => self.frame_infos.frames.len(),
		}
	}

	/// True when the container holds no pixels.
	pub fn is_empty(&self) -> bool {
		match self.layout {
			SequenceLayout::Embedded(_) => self.frames.is_empty(),
			_ => self.atlas.is_empty(),
		}
	}
}
