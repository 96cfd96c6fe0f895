//! RGB565 samples.

use serde::{Deserialize, Serialize};

use crate::file::error::VelocityError;

/// A 16-bit `RRRRRGGGGGGBBBBB` sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb565(pub u16);

impl Rgb565 {
	/// Reads a little-endian sample.
	#[inline]
	pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
		Self(u16::from_le_bytes(bytes))
	}

	/// 5-bit red channel
	#[inline]
	pub fn red(self) -> u8 {
		((self.0 >> 11) & 0x1F) as u8
	}

	/// 6-bit green channel
	#[inline]
	pub fn green(self) -> u8 {
		((self.0 >> 5) & 0x3F) as u8
	}

	/// 5-bit blue channel
	#[inline]
	pub fn blue(self) -> u8 {
		(self.0 & 0x1F) as u8
	}

	/// Expands to 8 bits per channel, rounding to nearest.
	pub fn to_rgb888(self) -> [u8; 3] {
		[expand(self.red(), 31), expand(self.green(), 63), expand(self.blue(), 31)]
	}

	/// Channels scaled to `0.0..=1.0`.
	pub fn to_normalized(self) -> [f32; 3] {
		[
			f32::from(self.red()) / 31.0,
			f32::from(self.green()) / 63.0,
			f32::from(self.blue()) / 31.0,
		]
	}

	/// Packs 8-bit channels, rounding to nearest.
	pub fn from_rgb888(rgb: [u8; 3]) -> Self {
		let r = reduce(rgb[0], 31);
		let g = reduce(rgb[1], 63);
		let b = reduce(rgb[2], 31);
		Self((r << 11) | (g << 5) | b)
	}
}

#[inline]
fn expand(channel: u8, max: u32) -> u8 {
	((u32::from(channel) * 255 + max / 2) / max) as u8
}

#[inline]
fn reduce(channel: u8, max: u32) -> u16 {
	((u32::from(channel) * max + 127) / 255) as u16
}

/// Decodes interleaved little-endian RGB565 into RGBA8.
///
/// `alpha` holds one byte per pixel; without it every pixel is opaque.
pub fn decode_rgb565(data: &[u8], alpha: Option<&[u8]>, pixel_count: usize) -> Result<Vec<u8>, VelocityError> {
	if data.len() < pixel_count * 2 {
		return Err(VelocityError::PixelCountMismatch {
			expected: pixel_count,
			actual: data.len() / 2,
		});
	}
	if let Some(alpha) = alpha
		&& alpha.len() < pixel_count
	{
		return Err(VelocityError::PixelCountMismatch {
			expected: pixel_count,
			actual: alpha.len(),
		});
	}

	let mut output = Vec::with_capacity(pixel_count * 4);
	for (index, sample) in data.chunks_exact(2).take(pixel_count).enumerate() {
		let [r, g, b] = Rgb565::from_le_bytes([sample[0], sample[1]]).to_rgb888();
		let a = alpha.map_or(255, |alpha| alpha[index]);
		output.extend_from_slice(&[r, g, b, a]);
	}
	Ok(output)
}
