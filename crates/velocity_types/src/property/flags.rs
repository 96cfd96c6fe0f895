//! Serialization flags threaded through every property-list read and write.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
	/// Format generation and feature bits active for one serialize or deserialize call.
	///
	/// The flags are not stored in the text. Callers derive them from the container being
	/// decoded (and from [`crate::property::inference`] while reading) and pass the same
	/// value to both sides when a round trip must be symmetric.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	pub struct PropertySerializationFlags: u32 {
		/// Second image property-list format
		const IMAGE_FORMAT_2 = 0x0000_0001;
		/// Third image property-list format
		const IMAGE_FORMAT_3 = 0x0000_0002;
		/// Title supports mipmapped textures
		const HAS_MIPMAP_SUPPORT = 0x0000_0004;
		/// Title supports block-compressed (DDS) textures
		const HAS_DDS_SUPPORT = 0x0000_0008;
		/// Compact output, editor-only properties are left out
		const COMPACT = 0x0000_0010;
		/// Sequence uses the HD container
		const HD_SEQUENCE = 0x0000_0020;
	}
}

impl PropertySerializationFlags {
	/// Evaluates the include/exclude rule for a property.
	///
	/// A property is active when none of its exclude bits are set and it either has no
	/// include bits or at least one of them is set.
	#[inline]
	pub fn admits(self, include: Self, exclude: Self) -> bool {
		!self.intersects(exclude) && (include.is_empty() || self.intersects(include))
	}
}
