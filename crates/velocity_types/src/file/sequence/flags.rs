//! Legacy sequence flag word.

use bitflags::bitflags;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::file::blit::{BlitType, BlitTypeRevision};
use crate::model::SequenceProperties;
use crate::property::{PropertyType, PropertyValue, ValueKind};

bitflags! {
	/// Bit flags stored by frame-info lists and the positional legacy blocks.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	pub struct SequenceFlags: u32 {
		/// Frames are drawn around a centered hot spot
		const CENTER_HOT_SPOT = 0x01;
		/// Frames were pre-blended against black
		const BLENDED_WITH_BLACK = 0x02;
		/// Palette color 0 is transparent
		const CROP_COLOR_0 = 0x04;
		/// Alpha channel has 8 bits instead of 1
		const USE_8BIT_ALPHA = 0x08;
		/// Frames are RLE coded
		const RLE = 0x10;
		/// Frames were dithered
		const DITHER = 0x20;
		/// Frames were stored without lossy compression
		const LOSSLESS = 0x40;
	}
}

impl PropertyType for SequenceFlags {
	fn kind() -> ValueKind {
		ValueKind::Int
	}

	fn to_value(&self) -> PropertyValue {
		PropertyValue::Int(i64::from(self.bits()))
	}

	fn from_value(value: PropertyValue) -> Option<Self> {
		match value {
			PropertyValue::Int(v) => u32::try_from(v).ok().map(Self::from_bits_retain),
			_ => None,
		}
	}
}

/// The legacy flag word with the raw blit integer and frame rate that travel with it.
///
/// Frame-info lists and the positional blocks of embedded sequences carry metadata in
/// this shape. [`SequenceFlagsBridge::backfill`] copies it onto a [`SequenceProperties`],
/// filling only the fields that are still absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SequenceFlagsBridge {
	/// Flag word
	pub flags: SequenceFlags,
	/// Blit type integer in some revision's numbering
	pub blit_type: Option<i32>,
	/// Frames per second
	pub fps: Option<f32>,
}

impl SequenceFlagsBridge {
	/// Fills the absent fields of `properties`.
	///
	/// Fields already set are kept; a conflicting value is logged and dropped.
	///
	/// The blit integer is mapped through `revision`; an integer the revision does not know
	/// leaves the blit type absent.
	pub fn backfill(&self, properties: &mut SequenceProperties, revision: BlitTypeRevision) {
		let has = |flag: SequenceFlags| Some(self.flags.contains(flag));
		fill("FPS", &mut properties.fps, self.fps);
		let blit_type = self.blit_type.and_then(|raw| blit_of(raw, revision));
		fill("Blit Type", &mut properties.blit_type, blit_type);
		fill("Center Hot Spot", &mut properties.center_hot_spot, has(SequenceFlags::CENTER_HOT_SPOT));
		fill("Blended", &mut properties.blended_with_black, has(SequenceFlags::BLENDED_WITH_BLACK));
		fill("Crop Color 0", &mut properties.crop_color_0, has(SequenceFlags::CROP_COLOR_0));
		fill("Use 8 Bit Alpha", &mut properties.use_8bit_alpha, has(SequenceFlags::USE_8BIT_ALPHA));
		fill("RLE", &mut properties.rle, has(SequenceFlags::RLE));
		fill("Dither", &mut properties.dither, has(SequenceFlags::DITHER));
		fill("Lossless", &mut properties.lossless, has(SequenceFlags::LOSSLESS));
	}

	/// Builds the bridge back from sequence properties, numbering the blit type for
	/// `revision`.
	pub fn from_properties(properties: &SequenceProperties, revision: BlitTypeRevision) -> Self {
		let mut flags = SequenceFlags::empty();
		let pairs = [
			(properties.center_hot_spot, SequenceFlags::CENTER_HOT_SPOT),
			(properties.blended_with_black, SequenceFlags::BLENDED_WITH_BLACK),
			(properties.crop_color_0, SequenceFlags::CROP_COLOR_0),
			(properties.use_8bit_alpha, SequenceFlags::USE_8BIT_ALPHA),
			(properties.rle, SequenceFlags::RLE),
			(properties.dither, SequenceFlags::DITHER),
			(properties.lossless, SequenceFlags::LOSSLESS),
		];
		for (value, flag) in pairs {
			flags.set(flag, value.unwrap_or(false));
		}
		Self {
			flags,
			blit_type: properties.blit_type.and_then(|blit| revision.to_int(blit)),
			fps: properties.fps,
		}
	}
}

fn blit_of(raw: i32, revision: BlitTypeRevision) -> Option<BlitType> {
	let blit = revision.to_enum(raw);
	if blit.is_none() {
		debug!("blit integer {raw} has no mode in {revision}");
	}
	blit
}

fn fill<T: PartialEq + std::fmt::Debug>(name: &str, slot: &mut Option<T>, value: Option<T>) {
	match (slot.as_ref(), value) {
		(None, value) => *slot = value,
		(Some(current), Some(value)) if *current != value => {
			warn!("{name}: property list says {current:?}, frame info says {value:?}; keeping the property list");
		}
		_ => {}
	}
}
