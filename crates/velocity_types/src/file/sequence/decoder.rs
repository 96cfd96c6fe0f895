//! Sequence container decoder.

use std::fmt::Display;
use std::io::{Read, Seek};

use log::{debug, trace};

use super::{
	AtlasImage, EmbeddedHeader, FontHeader, SEPARATOR_END, SEPARATOR_FRAME, SEQUENCE_SIGNATURE, Sequence,
	SequenceLayout, SequenceMode, SourceFormat, read_dynamic_block,
};
use crate::context::CodecContext;
use crate::file::error::{FileType, VelocityError};
use crate::file::frame::{FrameDecoder, FrameMode};
use crate::file::probe::check_deflate_header;
use crate::file::stream::StreamExt;
use crate::model::{SequenceFrameInfoList, SequenceProperties};
use crate::property::{PropertySerializationFlags, decode_text};

/// Progress of a [`SequenceDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceDecoderState {
	/// Ready to decode
	Uninitialized,
	/// Decode finished; [`SequenceDecoder::reset`] before decoding again
	RawDecoded,
}

impl SequenceDecoderState {
	fn name(self) -> &'static str {
		match self {
			Self::Uninitialized => "Uninitialized",
			Self::RawDecoded => "RawDecoded",
		}
	}
}

impl Display for SequenceDecoderState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

/// One-shot decoder for a sequence container.
///
/// Like [`FrameDecoder`], a decoder reads one container and must be reset before the next.
/// A failed decode resets the decoder and returns no partial sequence.
///
/// Metadata comes from up to three places, read in this order:
///
/// 1. the companion property list passed to [`SequenceDecoder::decode`],
/// 2. a `Sequence` block inside the container, used only when there is no companion block,
/// 3. the frame-info list or positional block, which only fills fields still absent.
#[derive(Debug)]
pub struct SequenceDecoder<'c> {
	context: &'c CodecContext,
	mode: SequenceMode,
	state: SequenceDecoderState,
}

/// Metadata gathered while reading, before it is attached to the sequence.
struct Metadata {
	properties: SequenceProperties,
	flags: PropertySerializationFlags,
	from_companion: bool,
}

impl<'c> SequenceDecoder<'c> {
	/// Creates a decoder for containers of `mode`.
	pub fn new(context: &'c CodecContext, mode: SequenceMode) -> Self {
		Self {
			context,
			mode,
			state: SequenceDecoderState::Uninitialized,
		}
	}

	/// Current state
	pub fn state(&self) -> SequenceDecoderState {
		self.state
	}

	/// Container family this decoder reads
	pub fn mode(&self) -> SequenceMode {
		self.mode
	}

	/// Returns the decoder to [`SequenceDecoderState::Uninitialized`].
	pub fn reset(&mut self) {
		self.state = SequenceDecoderState::Uninitialized;
	}

	/// Decodes one container from `reader`.
	///
	/// `property_list` is the companion property-list text holding a `Sequence` block.
	pub fn decode<R: Read + Seek + ?Sized>(
		&mut self,
		reader: &mut R,
		property_list: Option<&str>,
	) -> Result<Sequence, VelocityError> {
		if self.state != SequenceDecoderState::Uninitialized {
			return Err(VelocityError::DecoderState {
				file_type: FileType::Sequence,
				state: self.state.name(),
			});
		}

		let metadata = self.read_companion(property_list);
		let result = match self.mode {
			SequenceMode::Atlas => self.decode_atlas(reader, metadata),
			SequenceMode::Embedded => self.decode_embedded(reader, metadata),
		};
		match result {
			Ok(sequence) => {
				self.state = SequenceDecoderState::RawDecoded;
				Ok(sequence)
			}
			Err(e) => {
				debug!("sequence decode failed: {e}");
				self.reset();
				Err(e)
			}
		}
	}

	fn read_companion(&self, property_list: Option<&str>) -> Metadata {
		let mut properties = SequenceProperties::default();
		let mut flags = self.context.options().property_flags;
		let from_companion =
			property_list.is_some_and(|text| self.context.deserialize(text, &mut properties, &mut flags));
		if property_list.is_some() && !from_companion {
			debug!("companion property list has no Sequence block");
		}
		Metadata {
			properties,
			flags,
			from_companion,
		}
	}

	/// Reads the property-list text stored inside an atlas container.
	fn read_embedded_lists(&self, text: &str, metadata: &mut Metadata) -> SequenceFrameInfoList {
		let mut stored = SequenceProperties::default();
		if self.context.deserialize(text, &mut stored, &mut metadata.flags) && !metadata.from_companion {
			metadata.properties = stored;
		}

		let mut frame_infos = SequenceFrameInfoList::default();
		if !self.context.deserialize(text, &mut frame_infos, &mut metadata.flags) {
			debug!("stored property list has no SequenceFrameInfoList block");
		}
		frame_infos
	}

	fn decode_atlas<R: Read + Seek + ?Sized>(
		&self,
		reader: &mut R,
		mut metadata: Metadata,
	) -> Result<Sequence, VelocityError> {
		let ft = FileType::Sequence;
		let layout = if check_deflate_header(reader, false) {
			SequenceLayout::Standard
		} else if check_deflate_header(reader, true) {
			SequenceLayout::Font
		} else {
			SequenceLayout::Hd
		};
		debug!("atlas sequence layout {layout:?}");

		let mut font_header = None;
		let (property_list, frame_infos, atlas) = if layout == SequenceLayout::Hd {
			let size = reader.read_u32_le(ft)? as usize;
			let text = decode_text(&reader.read_bytes(size, ft)?).into_owned();
			let frame_infos = self.read_embedded_lists(&text, &mut metadata);

			let atlas = if metadata.properties.uses_dds(metadata.flags) {
				let blocks = reader.read_rest()?;
				if blocks.is_empty() {
					AtlasImage::Empty
				} else {
					AtlasImage::Bc3(blocks)
				}
			} else {
				let _scan = reader.read_u8_le(ft)?;
				let size = reader.read_u32_le(ft)? as usize;
				let data = reader.read_bytes(size, ft)?;
				let width = reader.read_u32_le(ft)?;
				let height = reader.read_u32_le(ft)?;
				self.context.options().check_dimensions(width, height, ft)?;
				AtlasImage::Interleaved {
					width,
					height,
					data,
				}
			};
			(text, frame_infos, atlas)
		} else {
			if layout == SequenceLayout::Font {
				let header = FontHeader {
					first: reader.read_u32_le(ft)?,
					last: reader.read_u32_le(ft)?,
					x_height: reader.read_i32_le(ft)?,
				};
				trace!("font range {}..={}", header.first, header.last);
				font_header = Some(header);
			}

			let signature = reader.read_u8_le(ft)?;
			if signature != SEQUENCE_SIGNATURE {
				return Err(VelocityError::InvalidSentinel {
					file_type: ft,
					field: "signature",
					expected: SEQUENCE_SIGNATURE,
					actual: signature,
				});
			}
			let deflated = reader.read_u32_le(ft)? as usize;
			let inflated = reader.read_u32_le(ft)? as usize;
			let blob = self.context.inflate(&reader.read_bytes(deflated, ft)?, inflated, ft)?;
			let text = decode_text(&blob).into_owned();
			let frame_infos = self.read_embedded_lists(&text, &mut metadata);

			let atlas = self.read_standard_atlas(reader)?;
			(text, frame_infos, atlas)
		};

		frame_infos.bridge().backfill(&mut metadata.properties, self.context.options().blit_revision);
		trace!("{} frame infos, atlas {:?}", frame_infos.frames.len(), atlas.size());

		Ok(Sequence {
			layout,
			font_header,
			embedded_header: None,
			properties: metadata.properties,
			property_flags: metadata.flags,
			frame_infos,
			property_list,
			atlas,
			frames: Vec::new(),
		})
	}

	fn read_standard_atlas<R: Read + Seek + ?Sized>(&self, reader: &mut R) -> Result<AtlasImage, VelocityError> {
		let ft = FileType::Sequence;
		if reader.remaining()? == 0 {
			return Ok(AtlasImage::Empty);
		}

		if check_deflate_header(reader, false) {
			let _scan = reader.read_u8_le(ft)?;
			let deflated = reader.read_u32_le(ft)? as usize;
			let inflated = reader.read_u32_le(ft)? as usize;
			let data = self.context.inflate(&reader.read_bytes(deflated, ft)?, inflated, ft)?;
			let width = reader.read_u32_le(ft)?;
			let height = reader.read_u32_le(ft)?;
			self.context.options().check_dimensions(width, height, ft)?;
			return Ok(AtlasImage::Planar {
				width,
				height,
				data,
			});
		}

		let size = reader.read_u32_le(ft)? as usize;
		let jpeg = reader.read_bytes(size, ft)?;
		let mask = if reader.remaining()? > 0 {
			let _pad = reader.read_u8_le(ft)?;
			let inflated = reader.read_u32_le(ft)? as usize;
			let data = reader.read_rest()?;
			Some(self.context.inflate(&data, inflated, ft)?)
		} else {
			None
		};
		Ok(AtlasImage::Jpeg {
			jpeg,
			mask,
		})
	}

	fn decode_embedded<R: Read + Seek + ?Sized>(
		&self,
		reader: &mut R,
		mut metadata: Metadata,
	) -> Result<Sequence, VelocityError> {
		let ft = FileType::Sequence;
		let format = SourceFormat::try_from(reader.read_u32_le(ft)?)?;
		let bridge = format.read_block(reader)?;
		let header = EmbeddedHeader {
			hot_spot_x: reader.read_i32_le(ft)?,
			hot_spot_y: reader.read_i32_le(ft)?,
			center_x: reader.read_i32_le(ft)?,
			center_y: reader.read_i32_le(ft)?,
		};
		let menu_position = if format.has_dynamic_block() {
			read_dynamic_block(reader)?
		} else {
			None
		};
		debug!("embedded sequence {format}, hot spot ({}, {})", header.hot_spot_x, header.hot_spot_y);

		let properties = &mut metadata.properties;
		bridge.backfill(properties, self.context.options().blit_revision);
		properties.hot_spot_x.get_or_insert(header.hot_spot_x);
		properties.hot_spot_y.get_or_insert(header.hot_spot_y);
		if let Some((x, y)) = menu_position {
			properties.menu_position_x.get_or_insert(x);
			properties.menu_position_y.get_or_insert(y);
		}

		let mut frames = Vec::new();
		while reader.remaining()? > 0 {
			match reader.read_u8_le(ft)? {
				SEPARATOR_END => break,
				SEPARATOR_FRAME => {
					let frame = FrameDecoder::new(self.context, FrameMode::Flagged).decode(reader, None)?;
					trace!("embedded frame {}: {}x{}", frames.len(), frame.header.width, frame.header.height);
					frames.push(frame);
				}
				other => return Err(VelocityError::InvalidSeparator(other)),
			}
		}

		Ok(Sequence {
			layout: SequenceLayout::Embedded(format),
			font_header: None,
			embedded_header: Some(header),
			properties: metadata.properties,
			property_flags: metadata.flags,
			frame_infos: SequenceFrameInfoList {
				flags: bridge.flags,
				blit_type: bridge.blit_type,
				fps: bridge.fps,
				frames: Vec::new(),
			},
			property_list: String::new(),
			atlas: AtlasImage::Empty,
			frames,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::blit::BlitType;
	use crate::file::sequence::{MENU_POSITION, SequenceFlags};
	use crate::geometry::CropRect;
	use crate::model::SequenceFrameInfo;
	use crate::property::PropertySerializationFlags as Flags;
	use std::io::Cursor;

	fn frame_infos(fps: Option<f32>) -> SequenceFrameInfoList {
		SequenceFrameInfoList {
			flags: SequenceFlags::CENTER_HOT_SPOT | SequenceFlags::RLE,
			blit_type: Some(1),
			fps,
			frames: vec![Some(SequenceFrameInfo::new(CropRect::new(0, 0, 2, 1), -1, 0)), None],
		}
	}

	fn push_deflated(context: &CodecContext, data: &mut Vec<u8>, blob: &[u8]) {
		let deflated = context.deflate(blob).unwrap();
		data.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
		data.extend_from_slice(&(blob.len() as u32).to_le_bytes());
		data.extend_from_slice(&deflated);
	}

	fn standard_lists(context: &CodecContext, infos: &SequenceFrameInfoList) -> Vec<u8> {
		let text = context.serialize(infos, Flags::empty());
		let mut data = vec![SEQUENCE_SIGNATURE];
		push_deflated(context, &mut data, text.as_bytes());
		data
	}

	fn hd_container(context: &CodecContext, sequence: &SequenceProperties, flags: Flags) -> Vec<u8> {
		let mut text = context.serialize(sequence, flags);
		text.push_str(&context.serialize(&frame_infos(None), Flags::empty()));
		let mut data = (text.len() as u32).to_le_bytes().to_vec();
		data.extend_from_slice(text.as_bytes());
		data
	}

	fn decode(context: &CodecContext, mode: SequenceMode, data: &[u8], text: Option<&str>) -> Result<Sequence, VelocityError> {
		SequenceDecoder::new(context, mode).decode(&mut Cursor::new(data), text)
	}

	#[test_log::test]
	fn test_frame_info_fills_missing_fps() {
		let context = CodecContext::default();
		let data = standard_lists(&context, &frame_infos(Some(15.0)));
		let companion = "Sequence\n{\n\tBlit Type=Normal\n}\n";

		let sequence = decode(&context, SequenceMode::Atlas, &data, Some(companion)).unwrap();
		assert_eq!(sequence.layout, SequenceLayout::Standard);
		assert_eq!(sequence.properties.fps, Some(15.0));
		assert_eq!(sequence.properties.blit_type, Some(BlitType::Normal));
		assert_eq!(sequence.properties.center_hot_spot, Some(true));
		assert_eq!(sequence.properties.rle, Some(true));
		assert_eq!(sequence.properties.dither, Some(false));
	}

	#[test_log::test]
	fn test_property_list_fps_is_kept() {
		let context = CodecContext::default();
		let data = standard_lists(&context, &frame_infos(Some(15.0)));
		let companion = "Sequence\n{\n\tFPS=30\n\tRLE=0\n}\n";

		let sequence = decode(&context, SequenceMode::Atlas, &data, Some(companion)).unwrap();
		assert_eq!(sequence.properties.fps, Some(30.0));
		assert_eq!(sequence.properties.rle, Some(false));
		assert!(sequence.is_empty());
		assert_eq!(sequence.frame_count(), 2);
	}

	#[test_log::test]
	fn test_hd_interleaved_atlas() {
		let context = CodecContext::default();
		let sequence = SequenceProperties {
			fps: Some(12.0),
			..Default::default()
		};
		let mut data = hd_container(&context, &sequence, Flags::empty());
		data.push(0);
		data.extend_from_slice(&8u32.to_le_bytes());
		data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
		data.extend_from_slice(&2u32.to_le_bytes());
		data.extend_from_slice(&1u32.to_le_bytes());

		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert_eq!(decoded.layout, SequenceLayout::Hd);
		assert_eq!(decoded.properties.fps, Some(12.0));
		assert_eq!(decoded.frame_infos.frames.len(), 2);
		assert!(decoded.property_list.starts_with("Sequence\n"));
		assert_eq!(
			decoded.atlas,
			AtlasImage::Interleaved {
				width: 2,
				height: 1,
				data: vec![1, 2, 3, 4, 5, 6, 7, 8],
			}
		);
	}

	#[test_log::test]
	fn test_hd_dds_atlas_takes_the_rest() {
		let context = CodecContext::default();
		let sequence = SequenceProperties {
			fps: Some(12.0),
			dds: Some(true),
			..Default::default()
		};
		let mut data = hd_container(&context, &sequence, Flags::HAS_DDS_SUPPORT);
		data.extend_from_slice(&[0xAB; 16]);

		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert!(decoded.property_flags.contains(Flags::HAS_DDS_SUPPORT));
		assert_eq!(decoded.atlas, AtlasImage::Bc3(vec![0xAB; 16]));
	}

	#[test_log::test]
	fn test_hd_dds_without_blocks_is_empty() {
		let context = CodecContext::default();
		let sequence = SequenceProperties {
			fps: Some(12.0),
			dds: Some(true),
			..Default::default()
		};
		let data = hd_container(&context, &sequence, Flags::HAS_DDS_SUPPORT);
		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert!(decoded.is_empty());
	}

	#[test_log::test]
	fn test_standard_compressed_planar_atlas() {
		let context = CodecContext::default();
		let mut data = standard_lists(&context, &frame_infos(None));
		data.push(0);
		push_deflated(&context, &mut data, &[5u8; 8]);
		data.extend_from_slice(&2u32.to_le_bytes());
		data.extend_from_slice(&1u32.to_le_bytes());

		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert_eq!(decoded.atlas.size(), Some((2, 1)));
		assert!(matches!(&decoded.atlas, AtlasImage::Planar { data, .. } if data.len() == 8));
	}

	#[test_log::test]
	fn test_standard_jpeg_atlas_with_mask() {
		let context = CodecContext::default();
		let mut data = standard_lists(&context, &frame_infos(None));
		let jpeg = [0xFF, 0xD8, 0xFF, 0xD9];
		data.extend_from_slice(&(jpeg.len() as u32).to_le_bytes());
		data.extend_from_slice(&jpeg);
		data.push(0);
		let mask = [3u8; 4];
		data.extend_from_slice(&(mask.len() as u32).to_le_bytes());
		data.extend_from_slice(&context.deflate(&mask).unwrap());

		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert_eq!(
			decoded.atlas,
			AtlasImage::Jpeg {
				jpeg: jpeg.to_vec(),
				mask: Some(mask.to_vec()),
			}
		);
	}

	#[test_log::test]
	fn test_bad_signature() {
		let context = CodecContext::default();
		let mut data = standard_lists(&context, &frame_infos(None));
		data[0] = 0x02;
		let mut decoder = SequenceDecoder::new(&context, SequenceMode::Atlas);
		let err = decoder.decode(&mut Cursor::new(data), None).unwrap_err();
		assert!(matches!(
			err,
			VelocityError::InvalidSentinel {
				field: "signature",
				..
			}
		));
		assert_eq!(decoder.state(), SequenceDecoderState::Uninitialized);
	}

	#[test_log::test]
	fn test_font_header() {
		let context = CodecContext::default();
		let mut data = Vec::new();
		data.extend_from_slice(&65u32.to_le_bytes());
		data.extend_from_slice(&66u32.to_le_bytes());
		data.extend_from_slice(&9i32.to_le_bytes());
		data.extend_from_slice(&standard_lists(&context, &frame_infos(None)));

		let decoded = decode(&context, SequenceMode::Atlas, &data, None).unwrap();
		assert_eq!(decoded.layout, SequenceLayout::Font);
		assert_eq!(
			decoded.font_header,
			Some(FontHeader {
				first: 65,
				last: 66,
				x_height: 9
			})
		);
		assert_eq!(decoded.frame_infos.frames.len(), 2);
	}

	fn embedded_frame(data: &mut Vec<u8>, fill: u8) {
		data.push(SEPARATOR_FRAME);
		data.extend_from_slice(&[1, 2]);
		data.extend_from_slice(&0i16.to_le_bytes());
		data.extend_from_slice(&0i16.to_le_bytes());
		data.extend_from_slice(&1u16.to_le_bytes());
		data.extend_from_slice(&1u16.to_le_bytes());
		data.extend_from_slice(&0u32.to_le_bytes());
		for layer in [vec![fill; 4], vec![7, 7], Vec::new()] {
			data.extend_from_slice(&(layer.len() as u32).to_le_bytes());
			data.extend_from_slice(&layer);
		}
		for _ in 0..3 {
			data.extend_from_slice(&4u32.to_le_bytes());
			data.extend_from_slice(&0u32.to_le_bytes());
		}
	}

	fn arcade_header(format: SourceFormat) -> Vec<u8> {
		let mut data = format.magic().to_le_bytes().to_vec();
		data.extend_from_slice(&2i32.to_le_bytes());
		data.extend_from_slice(&20.0f32.to_le_bytes());
		data.extend_from_slice(&SequenceFlags::CENTER_HOT_SPOT.bits().to_le_bytes());
		if format == SourceFormat::ArcadeMenu {
			data.push(0);
		}
		for value in [4i32, -8, 16, 16] {
			data.extend_from_slice(&value.to_le_bytes());
		}
		data
	}

	#[test_log::test]
	fn test_embedded_frames() {
		let context = CodecContext::default();
		let mut data = arcade_header(SourceFormat::Arcade);
		embedded_frame(&mut data, 0x11);
		embedded_frame(&mut data, 0x22);
		data.push(SEPARATOR_END);

		let decoded = decode(&context, SequenceMode::Embedded, &data, None).unwrap();
		assert_eq!(decoded.layout, SequenceLayout::Embedded(SourceFormat::Arcade));
		assert_eq!(decoded.frame_count(), 2);
		assert_eq!(decoded.frames[1].layer(0), [0x22; 4]);
		assert_eq!(decoded.properties.fps, Some(20.0));
		assert_eq!(decoded.properties.blit_type, Some(BlitType::BlendBlackBias));
		assert_eq!(decoded.properties.center_hot_spot, Some(true));
		assert_eq!((decoded.properties.hot_spot_x, decoded.properties.hot_spot_y), (Some(4), Some(-8)));
		assert_eq!(decoded.embedded_header.map(|h| h.center_x), Some(16));
	}

	#[test_log::test]
	fn test_embedded_menu_position_and_eof_end() {
		let context = CodecContext::default();
		let mut data = arcade_header(SourceFormat::ArcadeMenu);
		data.extend_from_slice(&1u32.to_le_bytes());
		data.extend_from_slice(&(MENU_POSITION.len() as u32).to_le_bytes());
		data.extend_from_slice(MENU_POSITION.as_bytes());
		data.extend_from_slice(&8u32.to_le_bytes());
		data.extend_from_slice(&100i32.to_le_bytes());
		data.extend_from_slice(&50i32.to_le_bytes());
		embedded_frame(&mut data, 0x33);

		let companion = "Sequence\n{\n\tHot Spot X=1\n}\n";
		let decoded = decode(&context, SequenceMode::Embedded, &data, Some(companion)).unwrap();
		assert_eq!(decoded.frame_count(), 1);
		assert_eq!(decoded.properties.menu_position_x, Some(100));
		assert_eq!(decoded.properties.menu_position_y, Some(50));
		assert_eq!(decoded.properties.hot_spot_x, Some(1));
		assert_eq!(decoded.properties.hot_spot_y, Some(-8));
	}

	#[test_log::test]
	fn test_embedded_without_frames() {
		let context = CodecContext::default();
		let mut data = arcade_header(SourceFormat::Arcade);
		data.push(SEPARATOR_END);
		let decoded = decode(&context, SequenceMode::Embedded, &data, None).unwrap();
		assert!(decoded.is_empty());
	}

	#[test_log::test]
	fn test_embedded_bad_separator() {
		let context = CodecContext::default();
		let mut data = arcade_header(SourceFormat::Arcade);
		data.push(0x07);
		let err = decode(&context, SequenceMode::Embedded, &data, None).unwrap_err();
		assert!(matches!(err, VelocityError::InvalidSeparator(0x07)));
	}

	#[test_log::test]
	fn test_embedded_unknown_source_format() {
		let context = CodecContext::default();
		let mut decoder = SequenceDecoder::new(&context, SequenceMode::Embedded);
		let err = decoder.decode(&mut Cursor::new(b"VS99\0\0\0\0".to_vec()), None).unwrap_err();
		assert!(matches!(err, VelocityError::UnknownSourceFormat(_)));
		assert!(err.is_malformed());
		assert_eq!(decoder.state(), SequenceDecoderState::Uninitialized);
	}

	#[test_log::test]
	fn test_decode_twice_requires_reset() {
		let context = CodecContext::default();
		let data = standard_lists(&context, &frame_infos(None));
		let mut decoder = SequenceDecoder::new(&context, SequenceMode::Atlas);
		decoder.decode(&mut Cursor::new(&data), None).unwrap();
		assert_eq!(decoder.state(), SequenceDecoderState::RawDecoded);
		assert!(matches!(
			decoder.decode(&mut Cursor::new(&data), None),
			Err(VelocityError::DecoderState { .. })
		));
		decoder.reset();
		assert!(decoder.decode(&mut Cursor::new(&data), None).is_ok());
	}
}
