//! Pixel buffers and the imaging backend.
//!
//! The decoders produce and consume [`PixelBuffer`]s. JPEG decoding, BC3 block
//! decompression, cropping and composition go through an [`ImagingBackend`] so callers can
//! plug in their own imaging stack; [`ImageCrateBackend`] is the default.

use image::{ImageFormat, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::file::codec::block::bc3_block_len;
use crate::file::error::VelocityError;
use crate::geometry::CropRect;

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelBuffer {
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// `width * height * 4` bytes
	pub pixels: Vec<u8>,
}

impl PixelBuffer {
	/// Fully transparent image.
	pub fn transparent(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize * 4],
		}
	}

	/// Wraps RGBA bytes, checking the length against the dimensions.
	pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, VelocityError> {
		let expected = width as usize * height as usize;
		if pixels.len() != expected * 4 {
			return Err(VelocityError::PixelCountMismatch {
				expected,
				actual: pixels.len() / 4,
			});
		}
		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Number of pixels
	pub fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// RGBA of the pixel at `(x, y)`, `None` outside the image.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let offset = (y as usize * self.width as usize + x as usize) * 4;
		self.pixels.get(offset..offset + 4).and_then(|p| p.try_into().ok())
	}

	/// Iterates over the pixels in row-major order.
	pub fn rgba(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
		self.pixels.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
	}

	fn into_image(self) -> Result<RgbaImage, VelocityError> {
		RgbaImage::from_raw(self.width, self.height, self.pixels)
			.ok_or_else(|| VelocityError::Imaging("pixel buffer does not match its size".to_string()))
	}

	fn from_image(image: RgbaImage) -> Self {
		Self {
			width: image.width(),
			height: image.height(),
			pixels: image.into_raw(),
		}
	}
}

/// Imaging operations the decoders delegate.
pub trait ImagingBackend {
	/// Decodes a baseline JPEG stream to RGBA with opaque alpha.
	fn decode_jpeg(&self, data: &[u8]) -> Result<PixelBuffer, VelocityError>;

	/// Decodes BC3 (DXT5) blocks covering a `width` x `height` image.
	fn decode_bc3(&self, data: &[u8], width: u32, height: u32) -> Result<PixelBuffer, VelocityError>;

	/// Copies `rect` out of `source`.
	fn crop(&self, source: &PixelBuffer, rect: CropRect) -> Result<PixelBuffer, VelocityError>;

	/// Places `image` at `(x, y)` on a transparent canvas.
	fn compose(
		&self,
		image: &PixelBuffer,
		canvas_width: u32,
		canvas_height: u32,
		x: u32,
		y: u32,
	) -> Result<PixelBuffer, VelocityError>;
}

/// Backend built on the `image` crate, with BC3 blocks decoded by `texpresso`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateBackend;

impl ImagingBackend for ImageCrateBackend {
	fn decode_jpeg(&self, data: &[u8]) -> Result<PixelBuffer, VelocityError> {
		let decoded = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
			.map_err(|e| VelocityError::Imaging(e.to_string()))?;
		Ok(PixelBuffer::from_image(decoded.to_rgba8()))
	}

	fn decode_bc3(&self, data: &[u8], width: u32, height: u32) -> Result<PixelBuffer, VelocityError> {
		let expected = bc3_block_len(width, height);
		if data.len() < expected {
			return Err(VelocityError::Imaging(format!(
				"BC3 data is {} bytes, {width}x{height} needs {expected}",
				data.len()
			)));
		}
		let mut output = PixelBuffer::transparent(width, height);
		texpresso::Format::Bc3.decompress(&data[..expected], width as usize, height as usize, &mut output.pixels);
		Ok(output)
	}

	fn crop(&self, source: &PixelBuffer, rect: CropRect) -> Result<PixelBuffer, VelocityError> {
		if !rect.fits(source.width, source.height) {
			return Err(VelocityError::Imaging(format!(
				"crop {rect:?} outside of {}x{} image",
				source.width, source.height
			)));
		}
		let image = source.clone().into_image()?;
		let cropped = imageops::crop_imm(&image, rect.left, rect.top, rect.width(), rect.height()).to_image();
		Ok(PixelBuffer::from_image(cropped))
	}

	fn compose(
		&self,
		image: &PixelBuffer,
		canvas_width: u32,
		canvas_height: u32,
		x: u32,
		y: u32,
	) -> Result<PixelBuffer, VelocityError> {
		let source = image.clone().into_image()?;
		let mut canvas = RgbaImage::new(canvas_width, canvas_height);
		imageops::replace(&mut canvas, &source, i64::from(x), i64::from(y));
		Ok(PixelBuffer::from_image(canvas))
	}
}
