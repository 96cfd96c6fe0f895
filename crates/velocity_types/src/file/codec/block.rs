//! BC3 slicing.
//!
//! DDS-capable titles store each frame of a sequence as its own run of BC3 blocks, one
//! run per frame-info entry, back to back. Null entries take no bytes.

use std::ops::Range;

use crate::geometry::CropRect;

/// Bytes per 4x4 BC3 block.
pub const BC3_BLOCK_BYTES: usize = 16;

/// Size of a BC3 image: `ceil(w / 4) * ceil(h / 4) * 16`.
pub fn bc3_block_len(width: u32, height: u32) -> usize {
	width.div_ceil(4) as usize * height.div_ceil(4) as usize * BC3_BLOCK_BYTES
}

/// Byte range of every frame's blocks in a concatenated BC3 atlas.
///
/// Ranges are computed from the crop rectangle sizes; `None` entries stay `None`.
pub fn bc3_frame_ranges(rects: &[Option<CropRect>]) -> Vec<Option<Range<usize>>> {
	let mut offset = 0usize;
	rects
		.iter()
		.map(|rect| {
			rect.map(|rect| {
				let len = bc3_block_len(rect.width(), rect.height());
				let range = offset..offset + len;
				offset += len;
				range
			})
		})
		.collect()
}
