//! Sequence metadata and the per-frame info list.

use serde::{Deserialize, Serialize};

use crate::file::blit::BlitType;
use crate::file::sequence::{SequenceFlags, SequenceFlagsBridge};
use crate::geometry::CropRect;
use crate::property::{PropertyClass, PropertySerializationFlags as Flags, SchemaBuilder};

/// Metadata of an animation sequence.
///
/// No property carries a default: after reading, a `None` field means the property list
/// did not mention it, which is what reconciliation with the frame-info list relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceProperties {
	/// Frames per second
	pub fps: Option<f32>,
	/// Blend mode
	pub blit_type: Option<BlitType>,
	/// JPEG quality of the atlas
	pub quality: Option<i32>,
	/// Frames are drawn around a centered hot spot
	pub center_hot_spot: Option<bool>,
	/// Frames were pre-blended against black
	pub blended_with_black: Option<bool>,
	/// Palette color 0 is transparent
	pub crop_color_0: Option<bool>,
	/// 8-bit alpha
	pub use_8bit_alpha: Option<bool>,
	/// RLE coded frames
	pub rle: Option<bool>,
	/// Dithered frames
	pub dither: Option<bool>,
	/// Lossless frames
	pub lossless: Option<bool>,
	/// Hot spot x relative to the frame center
	pub hot_spot_x: Option<i32>,
	/// Hot spot y relative to the frame center
	pub hot_spot_y: Option<i32>,
	/// Menu anchor x, written in the dynamic block
	pub menu_position_x: Option<i32>,
	/// Menu anchor y, written in the dynamic block
	pub menu_position_y: Option<i32>,
	/// Generate mipmaps
	pub mipmaps: Option<bool>,
	/// Atlas is stored as BC3
	pub dds: Option<bool>,
	/// HD container
	pub hd: Option<bool>,
	/// Playback order as frame indices, empty for natural order
	pub frame_order: Vec<i32>,
	/// Free-form note
	pub comment: Option<String>,
}

impl SequenceProperties {
	/// Whether the atlas is BC3: DDS support was seen while reading and `DDS` is not
	/// explicitly off.
	pub fn uses_dds(&self, flags: Flags) -> bool {
		flags.contains(Flags::HAS_DDS_SUPPORT) && self.dds != Some(false)
	}

	/// Whether rendered frames are placed on a hot-spot centered canvas.
	pub fn centers_hot_spot(&self) -> bool {
		self.center_hot_spot.unwrap_or(false)
	}

	/// Playback order, natural order when none is stored.
	pub fn playback_order(&self, frame_count: usize) -> Vec<usize> {
		if self.frame_order.is_empty() {
			return (0..frame_count).collect();
		}
		self.frame_order
			.iter()
			.filter_map(|index| usize::try_from(*index).ok())
			.filter(|index| *index < frame_count)
			.collect()
	}
}

impl PropertyClass for SequenceProperties {
	const CLASS_NAME: &'static str = "Sequence";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.optional("FPS", |s| &s.fps, |s| &mut s.fps);
		schema.enumeration("Blit Type", |s| &s.blit_type, |s| &mut s.blit_type);
		schema.optional("Quality", |s| &s.quality, |s| &mut s.quality);
		schema.optional("Center Hot Spot", |s| &s.center_hot_spot, |s| &mut s.center_hot_spot);
		schema.optional("Blended With Black", |s| &s.blended_with_black, |s| &mut s.blended_with_black);
		schema.optional("Crop Color 0", |s| &s.crop_color_0, |s| &mut s.crop_color_0);
		schema.optional("Use 8 Bit Alpha", |s| &s.use_8bit_alpha, |s| &mut s.use_8bit_alpha);
		schema.optional("RLE", |s| &s.rle, |s| &mut s.rle);
		schema.optional("Dither", |s| &s.dither, |s| &mut s.dither);
		schema.optional("Lossless", |s| &s.lossless, |s| &mut s.lossless);
		schema.optional("Hot Spot X", |s| &s.hot_spot_x, |s| &mut s.hot_spot_x);
		schema.optional("Hot Spot Y", |s| &s.hot_spot_y, |s| &mut s.hot_spot_y);
		schema.optional("Menu Position X", |s| &s.menu_position_x, |s| &mut s.menu_position_x).dynamic();
		schema.optional("Menu Position Y", |s| &s.menu_position_y, |s| &mut s.menu_position_y).dynamic();
		schema.optional("Mipmaps", |s| &s.mipmaps, |s| &mut s.mipmaps).include(Flags::HAS_MIPMAP_SUPPORT);
		schema.optional("DDS", |s| &s.dds, |s| &mut s.dds).include(Flags::HAS_DDS_SUPPORT);
		schema.optional("HD", |s| &s.hd, |s| &mut s.hd).include(Flags::HD_SEQUENCE);
		schema.list("Frame Order", "Frame", |s| &s.frame_order, |s| &mut s.frame_order);
		schema.optional("Comment", |s| &s.comment, |s| &mut s.comment).exclude(Flags::COMPACT);

		// menu anchors only exist in titles with a menu
		schema.should_serialize("Menu Position X", |s| s.menu_position_x.is_some());
		schema.should_serialize("Menu Position Y", |s| s.menu_position_y.is_some());
	}
}

/// Atlas rectangle and placement of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFrameInfo {
	/// Left edge in the atlas
	pub crop_left: u32,
	/// Top edge in the atlas
	pub crop_top: u32,
	/// Right edge in the atlas (exclusive)
	pub crop_right: u32,
	/// Bottom edge in the atlas (exclusive)
	pub crop_bottom: u32,
	/// Upper-left x relative to the hot spot
	pub upper_left_x: i32,
	/// Upper-left y relative to the hot spot
	pub upper_left_y: i32,
}

impl SequenceFrameInfo {
	/// Creates an entry from its crop rectangle and upper-left offset.
	pub fn new(rect: CropRect, upper_left_x: i32, upper_left_y: i32) -> Self {
		Self {
			crop_left: rect.left,
			crop_top: rect.top,
			crop_right: rect.right,
			crop_bottom: rect.bottom,
			upper_left_x,
			upper_left_y,
		}
	}

	/// Crop rectangle in the atlas.
	pub fn crop_rect(&self) -> CropRect {
		CropRect::new(self.crop_left, self.crop_top, self.crop_right, self.crop_bottom)
	}
}

impl PropertyClass for SequenceFrameInfo {
	const CLASS_NAME: &'static str = "SequenceFrameInfo";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.required("Crop Left", |i| &i.crop_left, |i| &mut i.crop_left);
		schema.required("Crop Top", |i| &i.crop_top, |i| &mut i.crop_top);
		schema.required("Crop Right", |i| &i.crop_right, |i| &mut i.crop_right);
		schema.required("Crop Bottom", |i| &i.crop_bottom, |i| &mut i.crop_bottom);
		schema.required("Upper Left X", |i| &i.upper_left_x, |i| &mut i.upper_left_x);
		schema.required("Upper Left Y", |i| &i.upper_left_y, |i| &mut i.upper_left_y);
	}
}

/// Per-frame geometry of an atlas sequence, with the legacy flag word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceFrameInfoList {
	/// Legacy flags
	pub flags: SequenceFlags,
	/// Blit type integer in the title's numbering
	pub blit_type: Option<i32>,
	/// Frames per second
	pub fps: Option<f32>,
	/// One entry per frame; `None` frames render as a 1x1 transparent image
	pub frames: Vec<Option<SequenceFrameInfo>>,
}

impl SequenceFrameInfoList {
	/// Flag word, blit integer and frame rate as a bridge for reconciliation.
	pub fn bridge(&self) -> SequenceFlagsBridge {
		SequenceFlagsBridge {
			flags: self.flags,
			blit_type: self.blit_type,
			fps: self.fps,
		}
	}

	/// Crop rectangle of every frame.
	pub fn crop_rects(&self) -> Vec<Option<CropRect>> {
		self.frames.iter().map(|frame| frame.as_ref().map(SequenceFrameInfo::crop_rect)).collect()
	}
}

impl PropertyClass for SequenceFrameInfoList {
	const CLASS_NAME: &'static str = "SequenceFrameInfoList";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.required("Flags", |l| &l.flags, |l| &mut l.flags);
		schema.optional("Blit Type", |l| &l.blit_type, |l| &mut l.blit_type);
		schema.optional("FPS", |l| &l.fps, |l| &mut l.fps);
		schema.object_list("Frames", "Frame", |l| &l.frames, |l| &mut l.frames);
	}
}
