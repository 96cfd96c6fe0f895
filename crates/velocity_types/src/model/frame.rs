//! Frame metadata.

use serde::{Deserialize, Serialize};

use crate::file::blit::BlitType;
use crate::file::codec::PixelFormat;
use crate::property::{PropertyClass, PropertySerializationFlags as Flags, PropertyValue, SchemaBuilder};

/// Metadata of a single frame, read from its companion property list.
///
/// `Quality` only exists in the second image property-list format and `Texture Format` only
/// in the third; reading either one marks the format generation in the reader's flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameProperties {
	/// Blend mode
	pub blit_type: Option<BlitType>,
	/// Stored without lossy compression
	pub lossless: Option<bool>,
	/// Palette color 0 is transparent
	pub crop_color_0: Option<bool>,
	/// Draw around the hot spot instead of the upper-left corner
	pub center_hot_spot: Option<bool>,
	/// Dithered when reduced to 16 bits
	pub dither: Option<bool>,
	/// JPEG quality, second format generation
	pub quality: Option<i32>,
	/// Target texture format, third format generation
	pub texture_format: Option<PixelFormat>,
	/// Generate mipmaps
	pub mipmaps: Option<bool>,
	/// Store as BC3
	pub dds: Option<bool>,
	/// Hot spot x relative to the image center
	pub hot_spot_x: Option<i32>,
	/// Hot spot y relative to the image center
	pub hot_spot_y: Option<i32>,
	/// Free-form note
	pub comment: Option<String>,
}

impl FrameProperties {
	/// Blit type, `Normal` when unset.
	pub fn blit_type_or_default(&self) -> BlitType {
		self.blit_type.unwrap_or(BlitType::Normal)
	}
}

impl PropertyClass for FrameProperties {
	const CLASS_NAME: &'static str = "Frame";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema
			.enumeration("Blit Type", |f| &f.blit_type, |f| &mut f.blit_type)
			.with_default(PropertyValue::from_enum(BlitType::Normal));
		schema.optional("Lossless", |f| &f.lossless, |f| &mut f.lossless).with_default(false);
		schema.optional("Crop Color 0", |f| &f.crop_color_0, |f| &mut f.crop_color_0).with_default(true);
		schema
			.optional("Center Hot Spot", |f| &f.center_hot_spot, |f| &mut f.center_hot_spot)
			.with_default(false);
		schema.optional("Dither", |f| &f.dither, |f| &mut f.dither).with_default(false);
		schema.optional("Quality", |f| &f.quality, |f| &mut f.quality).include(Flags::IMAGE_FORMAT_2);
		schema
			.enumeration("Texture Format", |f| &f.texture_format, |f| &mut f.texture_format)
			.include(Flags::IMAGE_FORMAT_3);
		schema.optional("Mipmaps", |f| &f.mipmaps, |f| &mut f.mipmaps).include(Flags::HAS_MIPMAP_SUPPORT);
		schema.optional("DDS", |f| &f.dds, |f| &mut f.dds).include(Flags::HAS_DDS_SUPPORT);
		schema.optional("Hot Spot X", |f| &f.hot_spot_x, |f| &mut f.hot_spot_x);
		schema.optional("Hot Spot Y", |f| &f.hot_spot_y, |f| &mut f.hot_spot_y);
		schema.optional("Comment", |f| &f.comment, |f| &mut f.comment).exclude(Flags::COMPACT);
	}
}
