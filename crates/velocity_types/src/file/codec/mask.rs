//! JPEG color with a separate alpha mask.
//!
//! JPEG has no alpha channel, so translucent frames store the mask next to the JPEG
//! stream as one delta-coded plane of `width * height` bytes.

use crate::file::error::VelocityError;
use crate::file::probe::{apply_row_offset_addition, apply_row_offset_subtraction};
use crate::imaging::{ImagingBackend, PixelBuffer};

/// Writes a delta-coded mask into the alpha channel of `image`.
pub fn apply_alpha_mask(image: &mut PixelBuffer, mask: &[u8]) -> Result<(), VelocityError> {
	let (width, height) = (image.width as usize, image.height as usize);
	let plane = width * height;
	if mask.len() < plane {
		return Err(VelocityError::PixelCountMismatch {
			expected: plane,
			actual: mask.len(),
		});
	}

	let mut alpha = vec![0u8; plane];
	apply_row_offset_addition(0, mask, &mut alpha, width, height);
	for (pixel, a) in image.pixels.chunks_exact_mut(4).zip(alpha) {
		pixel[3] = a;
	}
	Ok(())
}

/// Delta codes the alpha channel of an RGBA8 image into a mask plane.
pub fn encode_alpha_mask(image: &PixelBuffer) -> Vec<u8> {
	let alpha: Vec<u8> = image.rgba().map(|pixel| pixel[3]).collect();
	let mut mask = vec![0u8; alpha.len()];
	apply_row_offset_subtraction(0, &alpha, &mut mask, image.width as usize, image.height as usize);
	mask
}

/// Decodes a JPEG stream and, if present, applies its inflated alpha mask.
pub fn decode_jpeg_with_mask(
	backend: &dyn ImagingBackend,
	jpeg: &[u8],
	mask: Option<&[u8]>,
) -> Result<PixelBuffer, VelocityError> {
	let mut image = backend.decode_jpeg(jpeg)?;
	if let Some(mask) = mask {
		apply_alpha_mask(&mut image, mask)?;
	}
	Ok(image)
}
