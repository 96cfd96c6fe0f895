//! Frame container decoder.

use std::fmt::Display;
use std::io::{Read, Seek, SeekFrom};

use log::{debug, trace};

use super::{Frame, FrameHeader, FrameMode};
use crate::context::CodecContext;
use crate::file::codec::PixelFormat;
use crate::file::error::{FileType, VelocityError};
use crate::file::probe::{check_deflate_header, layer_count};
use crate::file::stream::StreamExt;
use crate::imaging::PixelBuffer;
use crate::model::FrameProperties;
use crate::property::PropertySerializationFlags;

/// Value of the sentinel in front of a compressed planar mode 3 payload.
pub const COMPRESSION_SENTINEL: u8 = 0x01;

/// Progress of a [`FrameDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameDecoderState {
	/// Ready to decode
	Uninitialized,
	/// Fixed fields read, payload pending
	HeaderParsed,
	/// Decode finished; [`FrameDecoder::reset`] before decoding again
	PayloadDecoded,
}

impl FrameDecoderState {
	fn name(self) -> &'static str {
		match self {
			Self::Uninitialized => "Uninitialized",
			Self::HeaderParsed => "HeaderParsed",
			Self::PayloadDecoded => "PayloadDecoded",
		}
	}
}

impl Display for FrameDecoderState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

/// One-shot decoder for a frame container.
///
/// A decoder reads exactly one container. After a successful decode it refuses further
/// input until [`FrameDecoder::reset`]; a failed decode resets it on its own so no partial
/// result leaks out.
///
/// # Example
///
/// ```no_run
/// use velocity_types::prelude::*;
///
/// # fn main() -> Result<(), VelocityError> {
/// let context = CodecContext::default();
/// let data = std::fs::read("button.frm")?;
/// let frame = FrameDecoder::new(&context, FrameMode::Mode3)
///     .decode(&mut std::io::Cursor::new(data), None)?;
/// let pixels = frame.decode_pixels(&context)?;
/// println!("{}x{}", pixels.width, pixels.height);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FrameDecoder<'c> {
	context: &'c CodecContext,
	mode: FrameMode,
	state: FrameDecoderState,
}

impl<'c> FrameDecoder<'c> {
	/// Creates a decoder for containers of `mode`.
	pub fn new(context: &'c CodecContext, mode: FrameMode) -> Self {
		Self {
			context,
			mode,
			state: FrameDecoderState::Uninitialized,
		}
	}

	/// Current state
	pub fn state(&self) -> FrameDecoderState {
		self.state
	}

	/// Container layout this decoder reads
	pub fn mode(&self) -> FrameMode {
		self.mode
	}

	/// Returns the decoder to [`FrameDecoderState::Uninitialized`].
	pub fn reset(&mut self) {
		self.state = FrameDecoderState::Uninitialized;
	}

	/// Decodes one container from `reader`.
	///
	/// `property_list` is the companion property-list text; it is read into the frame's
	/// metadata before the binary payload.
	pub fn decode<R: Read + Seek + ?Sized>(
		&mut self,
		reader: &mut R,
		property_list: Option<&str>,
	) -> Result<Frame, VelocityError> {
		if self.state != FrameDecoderState::Uninitialized {
			return Err(VelocityError::DecoderState {
				file_type: FileType::Frame,
				state: self.state.name(),
			});
		}

		match self.decode_inner(reader, property_list) {
			Ok(frame) => {
				self.state = FrameDecoderState::PayloadDecoded;
				Ok(frame)
			}
			Err(e) => {
				debug!("frame decode failed in state {}: {e}", self.state);
				self.reset();
				Err(e)
			}
		}
	}

	/// Expands a decoded frame into pixels with this decoder's context.
	pub fn decode_pixels(&self, frame: &Frame) -> Result<PixelBuffer, VelocityError> {
		frame.decode_pixels(self.context)
	}

	fn decode_inner<R: Read + Seek + ?Sized>(
		&mut self,
		reader: &mut R,
		property_list: Option<&str>,
	) -> Result<Frame, VelocityError> {
		let mut properties = FrameProperties::default();
		let mut flags = self.context.options().property_flags;
		if let Some(text) = property_list
			&& !self.context.deserialize(text, &mut properties, &mut flags)
		{
			debug!("companion property list has no Frame block");
		}

		let (header, layers, row_offsets) = match self.mode {
			FrameMode::LegacyLiteral => {
				return Err(VelocityError::Unsupported {
					file_type: FileType::Frame,
					feature: "legacy literal frame mode",
				});
			}
			FrameMode::Flagged => self.read_flagged(reader)?,
			FrameMode::Mode3 => self.read_mode3(reader)?,
		};

		trace!(
			"frame {:?} {:?} {}x{} at ({}, {}), {} layers",
			header.mode,
			header.pixel_format,
			header.width,
			header.height,
			header.x,
			header.y,
			layers.len()
		);
		Ok(Frame {
			header,
			properties,
			property_flags: flags,
			layers,
			row_offsets,
		})
	}

	fn header_parsed(&mut self, header: &FrameHeader) -> Result<(), VelocityError> {
		self.context.options().check_dimensions(header.width, header.height, FileType::Frame)?;
		self.state = FrameDecoderState::HeaderParsed;
		Ok(())
	}

	fn read_flagged<R: Read + Seek + ?Sized>(
		&mut self,
		reader: &mut R,
	) -> Result<(FrameHeader, Vec<Vec<u8>>, Vec<Vec<u32>>), VelocityError> {
		let ft = FileType::Frame;
		let format_version = reader.read_u8_le(ft)?;
		let pixel_format = PixelFormat::try_from(reader.read_u8_le(ft)?)?;
		let x = -i32::from(reader.read_i16_le(ft)?);
		let y = -i32::from(reader.read_i16_le(ft)?);
		let width = u32::from(reader.read_u16_le(ft)?);
		let height = u32::from(reader.read_u16_le(ft)?);
		let flags = reader.read_u32_le(ft)?;

		let header = FrameHeader {
			mode: FrameMode::Flagged,
			format_version,
			pixel_format,
			x,
			y,
			width,
			height,
			flags,
		};
		self.header_parsed(&header)?;

		let count = layer_count(flags);
		let mut layers = Vec::with_capacity(count);
		for index in 0..count {
			let size = reader.read_u32_le(ft)? as usize;
			skip_duplicate_size(reader, size)?;
			let layer = reader.read_bytes(size, ft)?;
			trace!("layer {index}: {size} bytes");
			layers.push(layer);
		}

		let expected = height as usize * 4;
		let mut row_offsets = Vec::with_capacity(count);
		for layer in 0..count {
			let actual = reader.read_u32_le(ft)? as usize;
			if actual != expected {
				return Err(VelocityError::RowOffsetTableMismatch {
					layer,
					expected,
					actual,
				});
			}
			let mut table = Vec::with_capacity(height as usize);
			for _ in 0..height {
				table.push(reader.read_u32_le(ft)?);
			}
			row_offsets.push(table);
		}

		Ok((header, layers, row_offsets))
	}

	fn read_mode3<R: Read + Seek + ?Sized>(
		&mut self,
		reader: &mut R,
	) -> Result<(FrameHeader, Vec<Vec<u8>>, Vec<Vec<u32>>), VelocityError> {
		let ft = FileType::Frame;
		let x = reader.read_i32_le(ft)?;
		let y = reader.read_i32_le(ft)?;
		let compressed = reader.read_u8_le(ft)? != 0;

		let mut header = FrameHeader {
			mode: FrameMode::Mode3,
			format_version: 0,
			pixel_format: PixelFormat::Jpeg,
			x,
			y,
			width: 0,
			height: 0,
			flags: 0,
		};
		let mut layers = Vec::with_capacity(2);

		if compressed {
			if check_deflate_header(reader, false) {
				let sentinel = reader.read_u8_le(ft)?;
				if sentinel != COMPRESSION_SENTINEL {
					return Err(VelocityError::InvalidSentinel {
						file_type: ft,
						field: "compression flag",
						expected: COMPRESSION_SENTINEL,
						actual: sentinel,
					});
				}
				let deflated = reader.read_u32_le(ft)? as usize;
				let inflated = reader.read_u32_le(ft)? as usize;
				let data = reader.read_bytes(deflated, ft)?;
				layers.push(self.context.inflate(&data, inflated, ft)?);
				header.pixel_format = PixelFormat::PlanarRgba;
			} else {
				let size = reader.read_u32_le(ft)? as usize;
				layers.push(reader.read_bytes(size, ft)?);
				header.pixel_format = PixelFormat::Rgba8888;
			}
			header.width = reader.read_u32_le(ft)?;
			header.height = reader.read_u32_le(ft)?;
			self.header_parsed(&header)?;
		} else {
			self.header_parsed(&header)?;
			let size = reader.read_u32_le(ft)? as usize;
			layers.push(reader.read_bytes(size, ft)?);

			if reader.remaining()? > 0 {
				let _pad = reader.read_u8_le(ft)?;
				let inflated = reader.read_u32_le(ft)? as usize;
				let data = reader.read_rest()?;
				layers.push(self.context.inflate(&data, inflated, ft)?);
			}
		}

		Ok((header, layers, Vec::new()))
	}
}

/// Consumes a repeated layer size if one follows the declared size.
///
/// Some titles write the size twice. The repeat is only taken when it matches and the
/// layer still fits in the stream after it; otherwise the stream is rewound and the bytes
/// are read as payload. Empty layers are never repeated: a zero word after a zero size is
/// the next layer's size.
fn skip_duplicate_size<R: Read + Seek + ?Sized>(reader: &mut R, size: usize) -> Result<(), VelocityError> {
	if size == 0 {
		return Ok(());
	}
	let remaining = reader.remaining()?;
	if remaining < 4 {
		return Ok(());
	}
	let start = reader.stream_position()?;
	let next = reader.read_u32_le(FileType::Frame)? as usize;
	if next == size && remaining - 4 >= size as u64 {
		trace!("skipping repeated layer size {size}");
		return Ok(());
	}
	reader.seek(SeekFrom::Start(start))?;
	Ok(())
}
