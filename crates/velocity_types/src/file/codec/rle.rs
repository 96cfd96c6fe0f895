//! Run-length coded RGB565.
//!
//! Each opcode byte carries a 2-bit operation and a 6-bit pixel count:
//!
//! ```text
//! 10cccccc  seek      skip c pixels
//! 01cccccc  append    c literal pixels follow, 2 bytes each
//! 00cccccc  repeat    one pixel follows, written c times
//! 11cccccc  invalid
//! ```
//!
//! A frame is drawn in two passes over the same canvas. The opaque pass writes its pixels
//! with alpha 255; the translucent pass takes one alpha byte per written pixel from a
//! separate stream. Both passes must account for exactly every pixel of the canvas.

use log::trace;

use super::rgb565::Rgb565;
use crate::file::error::VelocityError;

const OP_MASK: u8 = 0b1100_0000;
const COUNT_MASK: u8 = 0b0011_1111;

const OP_REPEAT: u8 = 0b0000_0000;
const OP_APPEND: u8 = 0b0100_0000;
const OP_SEEK: u8 = 0b1000_0000;

/// One decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleOp {
	/// Skip pixels
	Seek(usize),
	/// Literal pixels follow
	Append(usize),
	/// One pixel repeated
	Repeat(usize),
}

impl RleOp {
	/// Decodes an opcode byte. The `11` operation has no meaning.
	pub fn from_byte(byte: u8) -> Option<Self> {
		let count = usize::from(byte & COUNT_MASK);
		match byte & OP_MASK {
			OP_SEEK => Some(Self::Seek(count)),
			OP_APPEND => Some(Self::Append(count)),
			OP_REPEAT => Some(Self::Repeat(count)),
			_ => None,
		}
	}

	/// Encodes the opcode. Counts above 63 do not fit.
	pub fn to_byte(self) -> Option<u8> {
		let (op, count) = match self {
			Self::Seek(count) => (OP_SEEK, count),
			Self::Append(count) => (OP_APPEND, count),
			Self::Repeat(count) => (OP_REPEAT, count),
		};
		u8::try_from(count).ok().filter(|count| *count <= COUNT_MASK).map(|count| op | count)
	}

	fn count(self) -> usize {
		match self {
			Self::Seek(count) | Self::Append(count) | Self::Repeat(count) => count,
		}
	}
}

/// Decodes one RLE pass into an RGBA8 canvas.
///
/// With `alpha` set this is a translucent pass: every written pixel takes the next alpha
/// byte, and seeks leave the canvas untouched. Without it pixels are opaque, and seeks
/// clear their pixels to transparent when `seek_is_fill` is set.
///
/// Every operation is checked against the canvas size and the remaining input before it
/// runs; overruns and the `11` operation are [`VelocityError::CorruptOpcodeStream`]. A pass
/// that ends short of the canvas is [`VelocityError::PixelCountMismatch`].
pub fn decode_rle_rgb565(
	opcodes: &[u8],
	alpha: Option<&[u8]>,
	output: &mut [u8],
	seek_is_fill: bool,
) -> Result<(), VelocityError> {
	let total = output.len() / 4;
	let translucent = alpha.is_some();
	let mut alpha_bytes = alpha.unwrap_or_default().iter().copied();
	let mut next_alpha = |position: usize| -> Result<u8, VelocityError> {
		if translucent {
			alpha_bytes.next().ok_or_else(|| corrupt(position, "alpha stream exhausted"))
		} else {
			Ok(255)
		}
	};

	let mut input = 0usize;
	let mut pixel = 0usize;
	while input < opcodes.len() {
		let op_position = input;
		let op = RleOp::from_byte(opcodes[input]).ok_or_else(|| corrupt(op_position, "invalid operation"))?;
		input += 1;

		if pixel + op.count() > total {
			return Err(corrupt(op_position, "run exceeds the canvas"));
		}

		match op {
			RleOp::Seek(count) => {
				if seek_is_fill && !translucent {
					output[pixel * 4..(pixel + count) * 4].fill(0);
				}
				pixel += count;
			}
			RleOp::Append(count) => {
				if input + count * 2 > opcodes.len() {
					return Err(corrupt(op_position, "literal pixels run past the input"));
				}
				for _ in 0..count {
					let sample = Rgb565::from_le_bytes([opcodes[input], opcodes[input + 1]]);
					input += 2;
					write_pixel(output, pixel, sample, next_alpha(op_position)?);
					pixel += 1;
				}
			}
			RleOp::Repeat(count) => {
				if input + 2 > opcodes.len() {
					return Err(corrupt(op_position, "repeated pixel runs past the input"));
				}
				let sample = Rgb565::from_le_bytes([opcodes[input], opcodes[input + 1]]);
				input += 2;
				for _ in 0..count {
					write_pixel(output, pixel, sample, next_alpha(op_position)?);
					pixel += 1;
				}
			}
		}
	}

	trace!("rle pass: {input} opcode bytes, {pixel} of {total} pixels");
	if pixel != total {
		return Err(VelocityError::PixelCountMismatch {
			expected: total,
			actual: pixel,
		});
	}
	Ok(())
}

#[inline]
fn write_pixel(output: &mut [u8], pixel: usize, sample: Rgb565, alpha: u8) {
	let [r, g, b] = sample.to_rgb888();
	output[pixel * 4..pixel * 4 + 4].copy_from_slice(&[r, g, b, alpha]);
}

fn corrupt(position: usize, message: &str) -> VelocityError {
	VelocityError::CorruptOpcodeStream {
		position,
		message: message.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: [u8; 2] = [0x00, 0xF8];
	const BLUE: [u8; 2] = [0x1F, 0x00];

	fn op(op: RleOp) -> u8 {
		op.to_byte().unwrap()
	}

	#[test]
	fn test_seek_append_repeat() {
		let mut stream = vec![op(RleOp::Seek(3)), op(RleOp::Append(1))];
		stream.extend_from_slice(&RED);
		stream.push(op(RleOp::Repeat(2)));
		stream.extend_from_slice(&BLUE);

		let mut output = vec![0xAAu8; 6 * 4];
		decode_rle_rgb565(&stream, None, &mut output, true).unwrap();

		for pixel in output[..12].chunks_exact(4) {
			assert_eq!(pixel[3], 0);
		}
		assert_eq!(&output[12..16], &[255, 0, 0, 255]);
		assert_eq!(&output[16..20], &[0, 0, 255, 255]);
		assert_eq!(&output[20..24], &[0, 0, 255, 255]);
	}

	#[test]
	fn test_seek_without_fill_keeps_canvas() {
		let stream = [op(RleOp::Seek(2))];
		let mut output = vec![7u8; 8];
		decode_rle_rgb565(&stream, None, &mut output, false).unwrap();
		assert_eq!(output, [7; 8]);
	}

	#[test]
	fn test_translucent_pass_over_opaque() {
		let mut opaque = vec![op(RleOp::Repeat(2))];
		opaque.extend_from_slice(&RED);
		opaque.push(op(RleOp::Seek(1)));
		let mut translucent = vec![op(RleOp::Seek(2)), op(RleOp::Append(1))];
		translucent.extend_from_slice(&BLUE);

		let mut output = vec![0u8; 3 * 4];
		decode_rle_rgb565(&opaque, None, &mut output, true).unwrap();
		decode_rle_rgb565(&translucent, Some(&[90]), &mut output, true).unwrap();
		assert_eq!(output, [255, 0, 0, 255, 255, 0, 0, 255, 0, 0, 255, 90]);
	}

	#[test]
	fn test_invalid_operation() {
		let mut output = vec![0u8; 4];
		let err = decode_rle_rgb565(&[0xC1], None, &mut output, true).unwrap_err();
		assert!(matches!(err, VelocityError::CorruptOpcodeStream { position: 0, .. }));
	}

	#[test]
	fn test_run_past_canvas() {
		let mut output = vec![0u8; 2 * 4];
		let stream = [op(RleOp::Seek(3))];
		assert!(matches!(
			decode_rle_rgb565(&stream, None, &mut output, true),
			Err(VelocityError::CorruptOpcodeStream { .. })
		));
	}

	#[test]
	fn test_truncated_literals() {
		let mut output = vec![0u8; 2 * 4];
		let stream = [op(RleOp::Append(2)), 0x00, 0xF8, 0x00];
		assert!(matches!(
			decode_rle_rgb565(&stream, None, &mut output, true),
			Err(VelocityError::CorruptOpcodeStream { .. })
		));
	}

	#[test]
	fn test_alpha_exhausted() {
		let mut output = vec![0u8; 2 * 4];
		let mut stream = vec![op(RleOp::Repeat(2))];
		stream.extend_from_slice(&RED);
		assert!(matches!(
			decode_rle_rgb565(&stream, Some(&[1]), &mut output, true),
			Err(VelocityError::CorruptOpcodeStream { .. })
		));
	}

	#[test]
	fn test_short_pass() {
		let mut output = vec![0u8; 4 * 4];
		let stream = [op(RleOp::Seek(3))];
		assert!(matches!(
			decode_rle_rgb565(&stream, None, &mut output, true),
			Err(VelocityError::PixelCountMismatch {
				expected: 4,
				actual: 3
			})
		));
	}

	#[test]
	fn test_opcode_byte_roundtrip() {
		for byte in 0..=0xBFu8 {
			let op = RleOp::from_byte(byte).unwrap();
			assert_eq!(op.to_byte(), Some(byte));
		}
		assert_eq!(RleOp::Seek(64).to_byte(), None);
	}
}
