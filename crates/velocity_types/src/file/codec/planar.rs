//! Planar and interleaved RGBA.
//!
//! Planar data stores four full planes, each delta coded row-major:
//!
//! ```text
//! +--------------+--------------+--------------+--------------+
//! | R plane      | G plane      | B plane      | A plane      |
//! | w*h bytes    | w*h bytes    | w*h bytes    | w*h bytes    |
//! +--------------+--------------+--------------+--------------+
//! ```

use crate::file::error::{FileType, VelocityError};
use crate::file::probe::{apply_row_offset_addition, apply_row_offset_subtraction};

/// Number of planes in planar RGBA data.
pub const PLANE_COUNT: usize = 4;

/// Decodes delta-coded planar RGBA into interleaved RGBA8.
pub fn decode_planar_rgba(
	data: &[u8],
	width: usize,
	height: usize,
	file_type: FileType,
) -> Result<Vec<u8>, VelocityError> {
	let plane = width * height;
	let expected = plane * PLANE_COUNT;
	if data.len() < expected {
		return Err(VelocityError::insufficient_data(file_type, expected, data.len()));
	}

	let mut planes = vec![0u8; expected];
	for layer in 0..PLANE_COUNT {
		apply_row_offset_addition(layer, data, &mut planes, width, height);
	}

	let mut output = vec![0u8; expected];
	for (index, pixel) in output.chunks_exact_mut(PLANE_COUNT).enumerate() {
		for (channel, value) in pixel.iter_mut().enumerate() {
			*value = planes[channel * plane + index];
		}
	}
	Ok(output)
}

/// Encodes interleaved RGBA8 into delta-coded planar RGBA.
pub fn encode_planar_rgba(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
	let plane = width * height;
	let mut planes = vec![0u8; plane * PLANE_COUNT];
	for (index, pixel) in rgba.chunks_exact(PLANE_COUNT).take(plane).enumerate() {
		for (channel, value) in pixel.iter().enumerate() {
			planes[channel * plane + index] = *value;
		}
	}

	let mut encoded = vec![0u8; planes.len()];
	for layer in 0..PLANE_COUNT {
		apply_row_offset_subtraction(layer, &planes, &mut encoded, width, height);
	}
	encoded
}

/// Copies interleaved RGBA8, checking that it covers the image.
pub fn decode_interleaved_rgba(
	data: &[u8],
	width: usize,
	height: usize,
	file_type: FileType,
) -> Result<Vec<u8>, VelocityError> {
	let expected = width * height * PLANE_COUNT;
	data.get(..expected)
		.map(<[u8]>::to_vec)
		.ok_or_else(|| VelocityError::insufficient_data(file_type, expected, data.len()))
}
