//! Benchmark helper utilities for velocity-rs
//!
//! This module generates synthetic containers for the decoder benchmarks. The generators
//! write the same layouts the engine tools write, so every benchmark runs the full decode
//! path instead of a shortcut.

use velocity_types::context::CodecContext;
use velocity_types::file::codec::{PixelFormat, RleOp, encode_planar_rgba};
use velocity_types::file::VelocityError;
use velocity_types::file::frame::FLAG_RLE;
use velocity_types::file::sequence::{PlacedFrame, SequenceEncoder};
use velocity_types::imaging::PixelBuffer;
use velocity_types::model::SequenceProperties;

const RED: [u8; 2] = 0xF800u16.to_le_bytes();
const BLUE: [u8; 2] = 0x001Fu16.to_le_bytes();

fn push_op(out: &mut Vec<u8>, op: RleOp) {
	// generated runs never exceed 40 pixels
	out.extend(op.to_byte());
}

/// Generates the opaque RLE pass of a `width * height` frame
///
/// Repeats, literal runs and seeks alternate so the decoder exercises every opcode.
pub fn generate_opaque_pass(width: usize, height: usize) -> Vec<u8> {
	let total = width * height;
	let mut out = Vec::new();
	let mut pixel = 0;
	let mut turn = 0usize;
	while pixel < total {
		let remaining = total - pixel;
		match turn % 3 {
			0 => {
				let count = remaining.min(17);
				push_op(&mut out, RleOp::Repeat(count));
				out.extend_from_slice(&RED);
				pixel += count;
			}
			1 => {
				let count = remaining.min(5);
				push_op(&mut out, RleOp::Append(count));
				for index in 0..count {
					out.extend_from_slice(&((pixel + index) as u16).to_le_bytes());
				}
				pixel += count;
			}
			_ => {
				let count = remaining.min(9);
				push_op(&mut out, RleOp::Seek(count));
				pixel += count;
			}
		}
		turn += 1;
	}
	out
}

/// Generates a translucent RLE pass and its alpha stream
pub fn generate_translucent_pass(width: usize, height: usize) -> (Vec<u8>, Vec<u8>) {
	let total = width * height;
	let mut opcodes = Vec::new();
	let mut alpha = Vec::new();
	let mut pixel = 0;
	let mut turn = 0usize;
	while pixel < total {
		let remaining = total - pixel;
		if turn % 2 == 0 {
			let count = remaining.min(40);
			push_op(&mut opcodes, RleOp::Seek(count));
			pixel += count;
		} else {
			let count = remaining.min(8);
			push_op(&mut opcodes, RleOp::Repeat(count));
			opcodes.extend_from_slice(&BLUE);
			alpha.extend((0..count).map(|index| ((pixel + index) * 7) as u8));
			pixel += count;
		}
		turn += 1;
	}
	(opcodes, alpha)
}

/// Generates a mode 2 RLE frame container with both passes
pub fn generate_rle_frame(width: u16, height: u16) -> Vec<u8> {
	let (w, h) = (usize::from(width), usize::from(height));
	let opaque = generate_opaque_pass(w, h);
	let (translucent, alpha) = generate_translucent_pass(w, h);

	let mut data = vec![1, PixelFormat::Rgb565 as u8];
	data.extend_from_slice(&0i16.to_le_bytes());
	data.extend_from_slice(&0i16.to_le_bytes());
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend_from_slice(&FLAG_RLE.to_le_bytes());
	for layer in [&opaque, &translucent, &alpha] {
		data.extend_from_slice(&(layer.len() as u32).to_le_bytes());
		data.extend_from_slice(layer);
	}
	for _ in 0..3 {
		data.extend_from_slice(&(u32::from(height) * 4).to_le_bytes());
		for row in 0..u32::from(height) {
			data.extend_from_slice(&(row * u32::from(width)).to_le_bytes());
		}
	}
	data
}

/// Generates a gradient RGBA image
pub fn generate_gradient(width: u32, height: u32) -> PixelBuffer {
	let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
	for y in 0..height {
		for x in 0..width {
			pixels.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
		}
	}
	PixelBuffer {
		width,
		height,
		pixels,
	}
}

/// Generates the planar plane bytes of a gradient image
pub fn generate_planar(width: u32, height: u32) -> Vec<u8> {
	let image = generate_gradient(width, height);
	encode_planar_rgba(&image.pixels, width as usize, height as usize)
}

/// Generates a standard atlas sequence of `frames` gradient frames
pub fn generate_standard_sequence(
	context: &CodecContext,
	frames: usize,
	width: u32,
	height: u32,
) -> Result<Vec<u8>, VelocityError> {
	let frames: Vec<_> = (0..frames)
		.map(|_| {
			Some(PlacedFrame {
				image: generate_gradient(width, height),
				upper_left_x: -(width as i32) / 2,
				upper_left_y: -(height as i32),
			})
		})
		.collect();
	let properties = SequenceProperties {
		fps: Some(15.0),
		center_hot_spot: Some(true),
		..Default::default()
	};
	SequenceEncoder::new(context).encode_frames(&properties, &frames)
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Tiny sprite: 32x32 (1,024 pixels)
	pub const TINY: (u16, u16) = (32, 32);
	/// Small sprite: 128x128 (16,384 pixels)
	pub const SMALL: (u16, u16) = (128, 128);
	/// Character sprite: 256x384 (98,304 pixels)
	pub const CHARACTER: (u16, u16) = (256, 384);
	/// Full screen: 800x600 (480,000 pixels) - the engine's default resolution
	pub const SCREEN: (u16, u16) = (800, 600);
}

#[cfg(test)]
mod tests {
	use super::*;
	use velocity_types::file::frame::{Frame, FrameMode};
	use velocity_types::file::sequence::{Sequence, SequenceMode};

	#[test]
	fn test_generated_rle_frame_decodes() {
		let context = CodecContext::default();
		let data = generate_rle_frame(33, 7);
		let frame = Frame::from_bytes(&context, FrameMode::Flagged, &data).unwrap();
		let pixels = frame.decode_pixels(&context).unwrap();
		assert_eq!(pixels.pixel_count(), 33 * 7);
	}

	#[test]
	fn test_generated_sequence_decodes() {
		let context = CodecContext::default();
		let data = generate_standard_sequence(&context, 4, 16, 8).unwrap();
		let sequence = Sequence::from_bytes(&context, SequenceMode::Atlas, &data).unwrap();
		assert_eq!(sequence.frame_count(), 4);
		assert_eq!(sequence.render_frames(&context).unwrap().len(), 4);
	}

	#[test]
	fn test_planar_size() {
		assert_eq!(generate_planar(10, 3).len(), 10 * 3 * 4);
	}
}
