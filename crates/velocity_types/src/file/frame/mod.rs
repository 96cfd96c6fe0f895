//! Single image frame containers.
//!
//! Three binary layouts were used over the engine's lifetime. The layout is not
//! self-describing; callers pick the [`FrameMode`] matching the title the asset came from.
//!
//! # Mode 2 (flagged binary)
//!
//! ```text
//! u8   format version
//! u8   pixel format tag (1 RGB565, 2 RGBA8888, 3 JPEG, 4 planar RGBA, 5 BC3)
//! i16  x offset (stored negated)
//! i16  y offset (stored negated)
//! u16  width
//! u16  height
//! u32  flags (0x1 RLE, 0x2 five layers instead of three)
//! per layer:
//!      u32  size
//!      u32  size again (some titles only, detected)
//!      ...  layer bytes
//! per layer:
//!      u32  row table size in bytes, always height * 4
//!      u32  row pixel offset, height entries
//! ```
//!
//! # Mode 3
//!
//! ```text
//! i32  x offset
//! i32  y offset
//! u8   compressed
//! compressed, planar:            compressed, interleaved:     uncompressed:
//!   u8   sentinel 0x01             u32  size                   u32  JPEG size
//!   u32  deflated size             ...  RGBA8888 bytes         ...  JPEG bytes
//!   u32  inflated size             u32  width                  (if bytes remain)
//!   ...  zlib planar RGBA          u32  height                 u8   pad
//!   u32  width                                                 u32  inflated mask size
//!   u32  height                                                ...  zlib mask to the end
//! ```
//!
//! Mode 1 predates every title this crate targets and is recognized but not decoded.

mod decoder;

use serde::{Deserialize, Serialize};

pub use decoder::{FrameDecoder, FrameDecoderState};

use crate::context::CodecContext;
use crate::file::codec::{self, PixelFormat};
use crate::file::error::{FileType, VelocityError};
use crate::imaging::PixelBuffer;
use crate::model::FrameProperties;
use crate::property::PropertySerializationFlags;

/// Mode 2 flags word: layers 0 and 1 hold RLE opcodes.
pub const FLAG_RLE: u32 = 0x0000_0001;

/// Binary layout of a frame container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FrameMode {
	/// Earliest layout, not decoded
	LegacyLiteral = 1,
	/// Flagged binary layout with per-layer row tables
	Flagged = 2,
	/// Compressed planar, interleaved or JPEG layout
	Mode3 = 3,
}

impl FrameMode {
	/// Converts a mode number to a mode.
	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			1 => Some(Self::LegacyLiteral),
			2 => Some(Self::Flagged),
			3 => Some(Self::Mode3),
			_ => None,
		}
	}
}

/// Fixed fields of a decoded frame container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
	/// Layout the frame was read with
	pub mode: FrameMode,
	/// Mode 2 format version, zero otherwise
	pub format_version: u8,
	/// Payload layout
	pub pixel_format: PixelFormat,
	/// Upper-left x offset relative to the hot spot
	pub x: i32,
	/// Upper-left y offset relative to the hot spot
	pub y: i32,
	/// Width in pixels; zero for JPEG payloads, which carry their own size
	pub width: u32,
	/// Height in pixels; zero for JPEG payloads
	pub height: u32,
	/// Mode 2 flags word, zero otherwise
	pub flags: u32,
}

impl FrameHeader {
	/// Whether layers 0 and 1 are RLE opcode streams.
	pub fn is_rle(&self) -> bool {
		self.mode == FrameMode::Flagged && self.flags & FLAG_RLE != 0
	}
}

/// A decoded frame container: header, metadata and raw layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
	/// Fixed fields
	pub header: FrameHeader,
	/// Metadata from the companion property list, defaults when there was none
	pub properties: FrameProperties,
	/// Flags in effect after reading the companion property list
	pub property_flags: PropertySerializationFlags,
	/// Payload layers; their meaning depends on the pixel format
	#[serde(skip)]
	pub layers: Vec<Vec<u8>>,
	/// Mode 2 row pixel offset tables, one per layer
	#[serde(skip)]
	pub row_offsets: Vec<Vec<u32>>,
}

impl Frame {
	/// Decodes a frame from a byte slice.
	pub fn from_bytes(context: &CodecContext, mode: FrameMode, data: &[u8]) -> Result<Self, VelocityError> {
		FrameDecoder::new(context, mode).decode(&mut std::io::Cursor::new(data), None)
	}

	/// Reads and decodes a frame file, with its companion property list if one is given.
	pub fn open(
		context: &CodecContext,
		mode: FrameMode,
		path: impl AsRef<std::path::Path>,
		property_list: Option<impl AsRef<std::path::Path>>,
	) -> Result<Self, VelocityError> {
		let data = std::fs::read(path)?;
		let text = property_list.map(std::fs::read).transpose()?;
		let text = text.as_deref().map(crate::property::decode_text);
		FrameDecoder::new(context, mode).decode(&mut std::io::Cursor::new(data), text.as_deref())
	}

	/// Layer `index`, empty when absent.
	pub fn layer(&self, index: usize) -> &[u8] {
		self.layers.get(index).map(Vec::as_slice).unwrap_or_default()
	}

	/// Expands the layers into RGBA8 pixels.
	pub fn decode_pixels(&self, context: &CodecContext) -> Result<PixelBuffer, VelocityError> {
		let header = &self.header;
		let (width, height) = (header.width, header.height);
		let count = width as usize * height as usize;
		let backend = context.backend();

		match header.pixel_format {
			PixelFormat::Rgb565 if header.is_rle() => {
				let seek_is_fill = context.options().seek_is_fill;
				let mut pixels = vec![0u8; count * 4];
				codec::decode_rle_rgb565(self.layer(0), None, &mut pixels, seek_is_fill)?;
				if !self.layer(1).is_empty() {
					codec::decode_rle_rgb565(self.layer(1), Some(self.layer(2)), &mut pixels, seek_is_fill)?;
				}
				PixelBuffer::from_rgba(width, height, pixels)
			}
			PixelFormat::Rgb565 => {
				let alpha = Some(self.layer(1)).filter(|alpha| alpha.len() >= count);
				let pixels = codec::decode_rgb565(self.layer(0), alpha, count)?;
				PixelBuffer::from_rgba(width, height, pixels)
			}
			PixelFormat::Rgba8888 => {
				let pixels = codec::decode_interleaved_rgba(self.layer(0), width as usize, height as usize, FileType::Frame)?;
				PixelBuffer::from_rgba(width, height, pixels)
			}
			PixelFormat::PlanarRgba => {
				let pixels = codec::decode_planar_rgba(self.layer(0), width as usize, height as usize, FileType::Frame)?;
				PixelBuffer::from_rgba(width, height, pixels)
			}
			PixelFormat::Jpeg => {
				let mask = Some(self.layer(1)).filter(|mask| !mask.is_empty());
				codec::decode_jpeg_with_mask(backend, self.layer(0), mask)
			}
			PixelFormat::Bc3 => backend.decode_bc3(self.layer(0), width, height),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_frame_mode_numbers() {
		assert_eq!(FrameMode::from_u8(2), Some(FrameMode::Flagged));
		assert_eq!(FrameMode::from_u8(4), None);
	}
}
