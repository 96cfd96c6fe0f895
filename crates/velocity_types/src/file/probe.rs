//! Header and bitstream probes.
//!
//! Several container generations differ only in whether an embedded blob is deflated. The
//! containers carry no explicit marker for this, so the decoders look ahead to where a zlib
//! header would sit and test it against the zlib header check rule.
//!
//! ```text
//! Standard layout (probe offset 9):
//!   +0  u8   signature / scan byte
//!   +1  u32  deflated size
//!   +5  u32  inflated size
//!   +9  u16  zlib header (CMF, FLG)   <-- probed, big-endian
//!
//! Font layout (probe offset 21):
//!   +0  u32  first ASCII code
//!   +4  u32  last ASCII code
//!   +8  i32  x-height
//!   +12 ...  standard layout
//! ```
//!
//! The planar layers use a row-predictive delta coding: each byte of a plane is stored as
//! the difference to its predecessor in row-major order.

use std::io::{self, Read, Seek, SeekFrom};

/// Deflate compression method identifier in a zlib CMF byte.
pub const DEFLATE_METHOD: u16 = 8;

/// Probe offset for the standard layout.
pub const STANDARD_PROBE_OFFSET: i64 = 9;

/// Probe offset for the bitmap font layout.
pub const FONT_PROBE_OFFSET: i64 = 21;

/// Mode 2 flags word bit selecting the five-layer variant.
pub const FIVE_LAYER_FLAG: u32 = 0x0000_0002;

/// Returns true when `header` (CMF and FLG as a big-endian word) is a valid zlib header
/// announcing a deflate stream.
#[inline]
pub fn is_deflate_header(header: u16) -> bool {
	header % 31 == 0 && (header & 0x0F00) == (DEFLATE_METHOD << 8)
}

/// Peeks whether a zlib stream starts at the layout's fixed probe offset.
///
/// The stream position is restored before returning, whether the probe succeeds, fails or
/// runs past the end of the stream. IO errors count as a negative probe.
pub fn check_deflate_header<R: Read + Seek + ?Sized>(reader: &mut R, font_variant: bool) -> bool {
	let offset = if font_variant {
		FONT_PROBE_OFFSET
	} else {
		STANDARD_PROBE_OFFSET
	};

	let Ok(start) = reader.stream_position() else {
		return false;
	};
	let header = read_probe_word(reader, offset);
	let restored = reader.seek(SeekFrom::Start(start)).is_ok();

	restored && matches!(header, Ok(word) if is_deflate_header(word))
}

fn read_probe_word<R: Read + Seek + ?Sized>(reader: &mut R, offset: i64) -> io::Result<u16> {
	reader.seek(SeekFrom::Current(offset))?;
	let mut word = [0u8; 2];
	reader.read_exact(&mut word)?;
	Ok(u16::from_be_bytes(word))
}

/// Number of layers announced by a mode 2 flags word.
#[inline]
pub fn layer_count(flags: u32) -> usize {
	if flags & FIVE_LAYER_FLAG != 0 { 5 } else { 3 }
}

/// Reverses the row-predictive delta coding of one plane.
///
/// The plane starts at `layer_index * width * height` in both `input` and `output`. The
/// first byte is copied verbatim, every following byte is the wrapping sum of its stored
/// value and the decoded byte before it, scanned row-major.
///
/// Planes that would run past the end of either buffer are clamped to what is available.
pub fn apply_row_offset_addition(
	layer_index: usize,
	input: &[u8],
	output: &mut [u8],
	width: usize,
	height: usize,
) {
	let plane = width * height;
	let base = layer_index * plane;
	let end = (base + plane).min(input.len()).min(output.len());
	if base >= end {
		return;
	}

	let mut previous = input[base];
	output[base] = previous;
	for i in base + 1..end {
		previous = previous.wrapping_add(input[i]);
		output[i] = previous;
	}
}

/// Applies the row-predictive delta coding to one plane (inverse of
/// [`apply_row_offset_addition`]).
pub fn apply_row_offset_subtraction(
	layer_index: usize,
	input: &[u8],
	output: &mut [u8],
	width: usize,
	height: usize,
) {
	let plane = width * height;
	let base = layer_index * plane;
	let end = (base + plane).min(input.len()).min(output.len());
	if base >= end {
		return;
	}

	output[base] = input[base];
	for i in base + 1..end {
		output[i] = input[i].wrapping_sub(input[i - 1]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{Rng, SeedableRng, rngs::SmallRng};
	use std::io::Cursor;

	#[test]
	fn test_is_deflate_header() {
		// default zlib levels
		assert!(is_deflate_header(0x789C));
		assert!(is_deflate_header(0x7801));
		assert!(is_deflate_header(0x78DA));
		assert!(!is_deflate_header(0x789D));
		assert!(!is_deflate_header(0x0000));
		// method 15 with a valid checksum
		assert!(!is_deflate_header(0x7F0D - (0x7F0D % 31)));
	}

	fn standard_blob() -> Vec<u8> {
		let mut data = vec![0x01];
		data.extend_from_slice(&10u32.to_le_bytes());
		data.extend_from_slice(&20u32.to_le_bytes());
		data.extend_from_slice(&[0x78, 0x9C, 0x00, 0x00]);
		data
	}

	#[test]
	fn test_probe_detects_standard_layout() {
		let mut cursor = Cursor::new(standard_blob());
		assert!(check_deflate_header(&mut cursor, false));
		assert!(!check_deflate_header(&mut cursor, true));
	}

	#[test]
	fn test_probe_detects_font_layout() {
		let mut data = vec![0u8; 12];
		data.extend(standard_blob());
		let mut cursor = Cursor::new(data);
		assert!(!check_deflate_header(&mut cursor, false));
		assert!(check_deflate_header(&mut cursor, true));
	}

	#[test]
	fn test_probe_restores_position() {
		// shorter than, equal to and longer than the probe window
		for len in [4usize, 11, 32] {
			let mut data = vec![0u8; len];
			if len >= 11 {
				data[9] = 0x78;
				data[10] = 0x9C;
			}
			let mut cursor = Cursor::new(data);
			cursor.set_position(0);
			let detected = check_deflate_header(&mut cursor, false);
			assert_eq!(detected, len >= 11, "len {len}");
			assert_eq!(cursor.position(), 0, "len {len}");
		}

		// from a non-zero start as well
		let mut cursor = Cursor::new(vec![0u8; 40]);
		cursor.set_position(17);
		assert!(!check_deflate_header(&mut cursor, true));
		assert_eq!(cursor.position(), 17);
	}

	#[test]
	fn test_layer_count() {
		assert_eq!(layer_count(0), 3);
		assert_eq!(layer_count(0x1), 3);
		assert_eq!(layer_count(FIVE_LAYER_FLAG | 0x1), 5);
	}

	#[test]
	fn test_row_offset_addition_decodes_running_sum() {
		let input = [10u8, 1, 1, 250, 10, 0];
		let mut output = [0u8; 6];
		apply_row_offset_addition(0, &input, &mut output, 3, 2);
		assert_eq!(output, [10, 11, 12, 6, 16, 16]);
	}

	#[test]
	fn test_row_offset_planes_are_independent() {
		// two planes of 2x1; second plane starts fresh
		let input = [5u8, 5, 100, 1];
		let mut output = [0u8; 4];
		apply_row_offset_addition(0, &input, &mut output, 2, 1);
		apply_row_offset_addition(1, &input, &mut output, 2, 1);
		assert_eq!(output, [5, 10, 100, 101]);
	}

	#[test]
	fn test_row_offset_roundtrip_with_wraparound() {
		let (width, height) = (7, 5);
		let original = vec![0xFFu8; width * height];
		let mut encoded = vec![0u8; original.len()];
		let mut decoded = vec![0u8; original.len()];
		apply_row_offset_subtraction(0, &original, &mut encoded, width, height);
		apply_row_offset_addition(0, &encoded, &mut decoded, width, height);
		assert_eq!(decoded, original);
	}

	#[test]
	fn test_row_offset_roundtrip_random_planes() {
		let mut rng = SmallRng::seed_from_u64(0x5EED);
		let (width, height) = (13, 9);
		let mut original = vec![0u8; width * height * 4];
		rng.fill(original.as_mut_slice());

		let mut encoded = vec![0u8; original.len()];
		let mut decoded = vec![0u8; original.len()];
		for layer in 0..4 {
			apply_row_offset_subtraction(layer, &original, &mut encoded, width, height);
		}
		for layer in 0..4 {
			apply_row_offset_addition(layer, &encoded, &mut decoded, width, height);
		}
		assert_eq!(decoded, original);
	}
}
