//! Format generation inference.
//!
//! Some properties only exist in one generation of the image property-list format, or only
//! in titles with a given texture feature. Seeing such a property while reading tells the
//! reader which generation it is in. The rules live in one table and are applied by the
//! reader after each successful assignment.

use super::flags::PropertySerializationFlags;

/// `(class token, property name, flag to set)`
pub const INFERENCE_RULES: &[(&str, &str, PropertySerializationFlags)] = &[
	("Frame", "Quality", PropertySerializationFlags::IMAGE_FORMAT_2),
	("Frame", "Texture Format", PropertySerializationFlags::IMAGE_FORMAT_3),
	("Frame", "Mipmaps", PropertySerializationFlags::HAS_MIPMAP_SUPPORT),
	("Frame", "DDS", PropertySerializationFlags::HAS_DDS_SUPPORT),
	("Sequence", "Mipmaps", PropertySerializationFlags::HAS_MIPMAP_SUPPORT),
	("Sequence", "DDS", PropertySerializationFlags::HAS_DDS_SUPPORT),
	("Sequence", "HD", PropertySerializationFlags::HD_SEQUENCE),
];

/// Flags implied by assigning `property` on an object of class `class_name`.
pub fn implied_flags(class_name: &str, property: &str) -> PropertySerializationFlags {
	INFERENCE_RULES
		.iter()
		.filter(|(class, name, _)| *class == class_name && *name == property)
		.fold(PropertySerializationFlags::empty(), |acc, (_, _, flag)| acc | *flag)
}

/// Applies the inference table to `flags` after an assignment.
pub fn on_assigned(class_name: &str, property: &str, flags: &mut PropertySerializationFlags) {
	*flags |= implied_flags(class_name, property);
}
