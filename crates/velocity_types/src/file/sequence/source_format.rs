//! Per-title positional property blocks of embedded sequences.

use std::fmt::Display;
use std::io::{Read, Seek};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::flags::{SequenceFlags, SequenceFlagsBridge};
use crate::file::error::{FileType, VelocityError};
use crate::file::stream::StreamExt;

/// Title family of an embedded sequence, identified by its magic.
///
/// Each family stores the same metadata as a fixed sequence of fields:
///
/// ```text
/// VS01 Classic       f32 fps, u8 center, u8 blended, u8 crop0
/// VS02 ClassicAlpha  f32 fps, u8 center, u8 blended, u8 crop0, u8 alpha8
/// VS03 Deluxe        i32 blit, f32 fps, u8 rle, u8 dither, u8 center, u8 crop0
/// VS04 DeluxeMenu    Deluxe fields, then a dynamic property block
/// VS05 Arcade        i32 blit, f32 fps, u32 flags
/// VS06 ArcadeMenu    i32 blit, f32 fps, u32 flags, u8 lossless, then a dynamic block
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
	/// First titles
	Classic,
	/// First titles with 8-bit alpha
	ClassicAlpha,
	/// Deluxe editions
	Deluxe,
	/// Deluxe editions with menu anchors
	DeluxeMenu,
	/// Arcade collection
	Arcade,
	/// Arcade collection with menu anchors
	ArcadeMenu,
}

impl SourceFormat {
	/// All source formats.
	pub const ALL: [SourceFormat; 6] = [
		SourceFormat::Classic,
		SourceFormat::ClassicAlpha,
		SourceFormat::Deluxe,
		SourceFormat::DeluxeMenu,
		SourceFormat::Arcade,
		SourceFormat::ArcadeMenu,
	];

	/// Magic as stored, a little-endian ASCII tag.
	pub fn magic(self) -> u32 {
		u32::from_le_bytes(*self.tag())
	}

	/// ASCII tag.
	pub fn tag(self) -> &'static [u8; 4] {
		match self {
			Self::Classic => b"VS01",
			Self::ClassicAlpha => b"VS02",
			Self::Deluxe => b"VS03",
			Self::DeluxeMenu => b"VS04",
			Self::Arcade => b"VS05",
			Self::ArcadeMenu => b"VS06",
		}
	}

	/// Looks up a stored magic.
	pub fn from_magic(magic: u32) -> Option<Self> {
		Self::ALL.into_iter().find(|format| format.magic() == magic)
	}

	/// Whether a dynamic property block follows the fixed fields.
	pub fn has_dynamic_block(self) -> bool {
		matches!(self, Self::DeluxeMenu | Self::ArcadeMenu)
	}

	/// Reads this family's positional block.
	pub fn read_block<R: Read + Seek + ?Sized>(self, reader: &mut R) -> Result<SequenceFlagsBridge, VelocityError> {
		let ft = FileType::Sequence;
		let mut flags = SequenceFlags::empty();
		let mut blit_type = None;

		let fps = match self {
			Self::Classic | Self::ClassicAlpha => {
				let fps = reader.read_f32_le(ft)?;
				flags.set(SequenceFlags::CENTER_HOT_SPOT, read_bool(reader)?);
				flags.set(SequenceFlags::BLENDED_WITH_BLACK, read_bool(reader)?);
				flags.set(SequenceFlags::CROP_COLOR_0, read_bool(reader)?);
				if self == Self::ClassicAlpha {
					flags.set(SequenceFlags::USE_8BIT_ALPHA, read_bool(reader)?);
				}
				fps
			}
			Self::Deluxe | Self::DeluxeMenu => {
				blit_type = Some(reader.read_i32_le(ft)?);
				let fps = reader.read_f32_le(ft)?;
				flags.set(SequenceFlags::RLE, read_bool(reader)?);
				flags.set(SequenceFlags::DITHER, read_bool(reader)?);
				flags.set(SequenceFlags::CENTER_HOT_SPOT, read_bool(reader)?);
				flags.set(SequenceFlags::CROP_COLOR_0, read_bool(reader)?);
				fps
			}
			Self::Arcade | Self::ArcadeMenu => {
				blit_type = Some(reader.read_i32_le(ft)?);
				let fps = reader.read_f32_le(ft)?;
				flags = SequenceFlags::from_bits_retain(reader.read_u32_le(ft)?);
				if self == Self::ArcadeMenu {
					flags.set(SequenceFlags::LOSSLESS, read_bool(reader)?);
				}
				fps
			}
		};

		trace!("{self} block: fps {fps}, blit {blit_type:?}, flags {flags:?}");
		Ok(SequenceFlagsBridge {
			flags,
			blit_type,
			fps: Some(fps),
		})
	}
}

impl Display for SourceFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let tag = self.tag();
		write!(f, "{}", tag.escape_ascii())
	}
}

impl TryFrom<u32> for SourceFormat {
	type Error = VelocityError;

	fn try_from(magic: u32) -> Result<Self, Self::Error> {
		Self::from_magic(magic).ok_or(VelocityError::UnknownSourceFormat(magic))
	}
}

/// Name of the only dynamic property the engine reads.
pub const MENU_POSITION: &str = "Menu Position";

/// Reads a dynamic property block and returns the menu position if one is present.
///
/// Entries other than `Menu Position` are skipped by their payload size.
pub fn read_dynamic_block<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Option<(i32, i32)>, VelocityError> {
	let ft = FileType::Sequence;
	let count = reader.read_u32_le(ft)?;
	let mut menu_position = None;

	for _ in 0..count {
		let name_len = reader.read_u32_le(ft)? as usize;
		let name = reader.read_bytes(name_len, ft)?;
		let payload_len = reader.read_u32_le(ft)? as usize;
		let payload = reader.read_bytes(payload_len, ft)?;

		if name == MENU_POSITION.as_bytes() && payload.len() >= 8 {
			let x = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
			let y = i32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
			menu_position = Some((x, y));
		} else {
			debug!("skipping dynamic property {} ({payload_len} bytes)", name.escape_ascii());
		}
	}
	Ok(menu_position)
}

fn read_bool<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<bool, VelocityError> {
	Ok(reader.read_u8_le(FileType::Sequence)? != 0)
}
