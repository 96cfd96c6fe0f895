//! Pixel codecs shared by the frame and sequence containers.

pub mod block;
pub mod mask;
pub mod planar;
pub mod rgb565;
pub mod rle;

use serde::{Deserialize, Serialize};

use crate::property::{EnumDescriptor, EnumMember, PropertyEnum};

pub use block::{BC3_BLOCK_BYTES, bc3_block_len, bc3_frame_ranges};
pub use mask::{apply_alpha_mask, decode_jpeg_with_mask, encode_alpha_mask};
pub use planar::{decode_interleaved_rgba, decode_planar_rgba, encode_planar_rgba};
pub use rgb565::{Rgb565, decode_rgb565};
pub use rle::{RleOp, decode_rle_rgb565};

/// Pixel layout tag of a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PixelFormat {
	/// 16-bit RGB565, interleaved or RLE coded
	Rgb565 = 1,
	/// Interleaved RGBA8
	Rgba8888 = 2,
	/// JPEG color, optional delta-coded alpha mask
	Jpeg = 3,
	/// Delta-coded planar RGBA8
	PlanarRgba = 4,
	/// BC3 blocks
	Bc3 = 5,
}

impl PixelFormat {
	/// All formats by tag.
	pub const ALL: [PixelFormat; 5] = [
		PixelFormat::Rgb565,
		PixelFormat::Rgba8888,
		PixelFormat::Jpeg,
		PixelFormat::PlanarRgba,
		PixelFormat::Bc3,
	];

	/// Converts a tag to a format.
	pub fn from_u8(tag: u8) -> Option<Self> {
		Self::ALL.into_iter().find(|format| *format as u8 == tag)
	}
}

impl TryFrom<u8> for PixelFormat {
	type Error = crate::file::error::VelocityError;

	fn try_from(tag: u8) -> Result<Self, Self::Error> {
		Self::from_u8(tag).ok_or(crate::file::error::VelocityError::UnknownPixelFormat(tag))
	}
}

// Property lists store the tag as a bare integer.
static PIXEL_FORMAT_DESCRIPTOR: EnumDescriptor = EnumDescriptor {
	type_name: "PixelFormat",
	members: &[
		EnumMember::raw(1),
		EnumMember::raw(2),
		EnumMember::raw(3),
		EnumMember::raw(4),
		EnumMember::raw(5),
	],
};

impl PropertyEnum for PixelFormat {
	fn descriptor() -> &'static EnumDescriptor {
		&PIXEL_FORMAT_DESCRIPTOR
	}

	fn to_raw(self) -> i64 {
		self as i64
	}

	fn from_raw(raw: i64) -> Option<Self> {
		u8::try_from(raw).ok().and_then(Self::from_u8)
	}
}
