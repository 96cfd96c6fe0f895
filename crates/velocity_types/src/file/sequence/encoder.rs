//! Standard sequence encoder.
//!
//! Writes the standard atlas layout with a compressed planar atlas, the one layout every
//! title can read back. The frame-info list is written as property-list text.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{SEQUENCE_SIGNATURE, SequenceFlagsBridge};
use crate::context::CodecContext;
use crate::file::codec::encode_planar_rgba;
use crate::file::error::{FileType, VelocityError};
use crate::geometry::CropRect;
use crate::imaging::PixelBuffer;
use crate::model::{SequenceFrameInfo, SequenceFrameInfoList, SequenceProperties};
use crate::property::PropertySerializationFlags;

/// A frame image with its upper-left offset relative to the hot spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFrame {
	/// Pixels
	pub image: PixelBuffer,
	/// Upper-left x
	pub upper_left_x: i32,
	/// Upper-left y
	pub upper_left_y: i32,
}

/// Packs frames left to right into a one-row atlas.
///
/// `None` frames keep their slot in the frame-info list and take no atlas space. The atlas
/// is as tall as the tallest frame; it is 0x0 when there are no pixels at all.
pub fn pack_strip(frames: &[Option<PlacedFrame>]) -> (Vec<Option<SequenceFrameInfo>>, PixelBuffer) {
	let width = frames.iter().flatten().map(|frame| frame.image.width).sum();
	let height = frames.iter().flatten().map(|frame| frame.image.height).max().unwrap_or(0);
	let mut atlas = PixelBuffer::transparent(width, height);

	let mut left = 0u32;
	let infos = frames
		.iter()
		.map(|frame| {
			let frame = frame.as_ref()?;
			let image = &frame.image;
			let row_bytes = image.width as usize * 4;
			for (y, row) in image.pixels.chunks_exact(row_bytes.max(1)).take(image.height as usize).enumerate() {
				let offset = (y * width as usize + left as usize) * 4;
				atlas.pixels[offset..offset + row_bytes].copy_from_slice(row);
			}
			let rect = CropRect::new(left, 0, left + image.width, image.height);
			left += image.width;
			Some(SequenceFrameInfo::new(rect, frame.upper_left_x, frame.upper_left_y))
		})
		.collect();
	(infos, atlas)
}

/// Writes standard atlas sequences.
#[derive(Debug)]
pub struct SequenceEncoder<'c> {
	context: &'c CodecContext,
	flags: PropertySerializationFlags,
}

impl<'c> SequenceEncoder<'c> {
	/// Creates an encoder that writes property lists with the context's flags.
	pub fn new(context: &'c CodecContext) -> Self {
		Self {
			context,
			flags: context.options().property_flags,
		}
	}

	/// Same encoder with other property-list flags.
	pub fn with_flags(self, flags: PropertySerializationFlags) -> Self {
		Self {
			flags,
			..self
		}
	}

	/// Encodes a frame-info list and its atlas.
	///
	/// A 0x0 atlas produces an empty sequence: the frame-info list with nothing after it.
	pub fn encode(&self, frame_infos: &SequenceFrameInfoList, atlas: &PixelBuffer) -> Result<Vec<u8>, VelocityError> {
		let text = self.context.serialize(frame_infos, self.flags);
		let mut output = vec![SEQUENCE_SIGNATURE];
		self.write_deflated(&mut output, text.as_bytes())?;

		if atlas.pixel_count() == 0 {
			debug!("encoded empty sequence, {} frame infos", frame_infos.frames.len());
			return Ok(output);
		}

		// scan byte
		output.push(0);
		let planar = encode_planar_rgba(&atlas.pixels, atlas.width as usize, atlas.height as usize);
		self.write_deflated(&mut output, &planar)?;
		output.extend_from_slice(&atlas.width.to_le_bytes());
		output.extend_from_slice(&atlas.height.to_le_bytes());
		debug!(
			"encoded sequence, {} frame infos, {}x{} atlas, {} bytes",
			frame_infos.frames.len(),
			atlas.width,
			atlas.height,
			output.len()
		);
		Ok(output)
	}

	/// Packs `frames` into a strip atlas and encodes them with the legacy metadata of
	/// `properties`.
	pub fn encode_frames(
		&self,
		properties: &SequenceProperties,
		frames: &[Option<PlacedFrame>],
	) -> Result<Vec<u8>, VelocityError> {
		let bridge = SequenceFlagsBridge::from_properties(properties, self.context.options().blit_revision);
		let (infos, atlas) = pack_strip(frames);
		let frame_infos = SequenceFrameInfoList {
			flags: bridge.flags,
			blit_type: bridge.blit_type,
			fps: bridge.fps,
			frames: infos,
		};
		self.encode(&frame_infos, &atlas)
	}

	fn write_deflated(&self, output: &mut Vec<u8>, data: &[u8]) -> Result<(), VelocityError> {
		let deflated = self.context.deflate(data)?;
		output.extend_from_slice(&blob_len(deflated.len())?.to_le_bytes());
		output.extend_from_slice(&blob_len(data.len())?.to_le_bytes());
		output.extend_from_slice(&deflated);
		Ok(())
	}
}

fn blob_len(len: usize) -> Result<u32, VelocityError> {
	u32::try_from(len).map_err(|_| VelocityError::Unsupported {
		file_type: FileType::Sequence,
		feature: "blobs of 4 GiB or more",
	})
}
