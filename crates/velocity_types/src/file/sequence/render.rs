//! Frame extraction.
//!
//! Atlas sequences are rendered by cutting every frame-info rectangle out of the decoded
//! atlas, or by decoding each frame's BC3 run. Embedded sequences decode their frame
//! containers. Frames of sequences that center their hot spot are then padded so the hot
//! spot lands in the middle of the image.

use log::trace;

use super::{AtlasImage, Sequence, SequenceLayout};
use crate::context::CodecContext;
use crate::file::codec::{bc3_frame_ranges, decode_interleaved_rgba, decode_jpeg_with_mask, decode_planar_rgba};
use crate::file::error::{FileType, VelocityError};
use crate::geometry::CanvasPlacement;
use crate::imaging::PixelBuffer;

/// A rendered frame with its upper-left offset, `None` for placeholder frames.
type Placed = (PixelBuffer, Option<(i32, i32)>);

impl Sequence {
	/// Decodes the whole atlas image.
	///
	/// Returns `None` for empty atlases and for BC3 atlases, which have no single image.
	pub fn decode_atlas(&self, context: &CodecContext) -> Result<Option<PixelBuffer>, VelocityError> {
		let ft = FileType::Sequence;
		let image = match &self.atlas {
			AtlasImage::Empty | AtlasImage::Bc3(_) => return Ok(None),
			AtlasImage::Interleaved {
				width,
				height,
				data,
			} => {
				let pixels = decode_interleaved_rgba(data, *width as usize, *height as usize, ft)?;
				PixelBuffer::from_rgba(*width, *height, pixels)?
			}
			AtlasImage::Planar {
				width,
				height,
				data,
			} => {
				let pixels = decode_planar_rgba(data, *width as usize, *height as usize, ft)?;
				PixelBuffer::from_rgba(*width, *height, pixels)?
			}
			AtlasImage::Jpeg {
				jpeg,
				mask,
			} => decode_jpeg_with_mask(context.backend(), jpeg, mask.as_deref())?,
		};
		Ok(Some(image))
	}

	/// Renders every frame in storage order.
	///
	/// Atlas sequences produce one image per frame-info entry; null entries, empty
	/// rectangles and frames of an empty atlas become 1x1 transparent images.
	pub fn render_frames(&self, context: &CodecContext) -> Result<Vec<PixelBuffer>, VelocityError> {
		let placed = match self.layout {
			SequenceLayout::Embedded(_) => self
				.frames
				.iter()
				.map(|frame| Ok((frame.decode_pixels(context)?, Some((frame.header.x, frame.header.y)))))
				.collect::<Result<Vec<_>, VelocityError>>()?,
			SequenceLayout::Hd | SequenceLayout::Standard | SequenceLayout::Font => self.render_atlas(context)?,
		};

		let center = context.options().center_hot_spots && self.properties.centers_hot_spot();
		placed
			.into_iter()
			.map(|(image, offset)| match offset {
				Some((x, y)) if center => center_on_hot_spot(context, image, x, y),
				_ => Ok(image),
			})
			.collect()
	}

	fn render_atlas(&self, context: &CodecContext) -> Result<Vec<Placed>, VelocityError> {
		let backend = context.backend();
		let infos = &self.frame_infos.frames;

		if let AtlasImage::Bc3(blocks) = &self.atlas {
			let ranges = bc3_frame_ranges(&self.frame_infos.crop_rects());
			return infos
				.iter()
				.zip(ranges)
				.map(|(info, range)| match (info, range) {
					(Some(info), Some(range)) if !info.crop_rect().is_empty() => {
						let data = blocks.get(range.clone()).ok_or_else(|| {
							VelocityError::insufficient_data(FileType::Sequence, range.end, blocks.len())
						})?;
						let rect = info.crop_rect();
						let image = backend.decode_bc3(data, rect.width(), rect.height())?;
						Ok((image, Some((info.upper_left_x, info.upper_left_y))))
					}
					_ => Ok(placeholder()),
				})
				.collect();
		}

		let Some(atlas) = self.decode_atlas(context)? else {
			trace!("empty atlas, {} placeholder frames", infos.len());
			return Ok(infos.iter().map(|_| placeholder()).collect());
		};
		infos
			.iter()
			.map(|info| match info {
				Some(info) if !info.crop_rect().is_empty() => {
					let image = backend.crop(&atlas, info.crop_rect())?;
					Ok((image, Some((info.upper_left_x, info.upper_left_y))))
				}
				_ => Ok(placeholder()),
			})
			.collect()
	}
}

fn placeholder() -> Placed {
	(PixelBuffer::transparent(1, 1), None)
}

fn center_on_hot_spot(
	context: &CodecContext,
	image: PixelBuffer,
	upper_left_x: i32,
	upper_left_y: i32,
) -> Result<PixelBuffer, VelocityError> {
	let placement = CanvasPlacement::centered(upper_left_x, upper_left_y, image.width, image.height);
	if placement.is_identity(image.width, image.height) {
		return Ok(image);
	}
	context
		.backend()
		.compose(&image, placement.canvas_width, placement.canvas_height, placement.x, placement.y)
}
