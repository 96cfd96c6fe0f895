//! Frame geometry: crop rectangles and hot-spot centering.
//!
//! A frame's upper-left offset is the position of its top-left pixel relative to the hot
//! spot. Centering places the frame on a transparent canvas whose center is the hot spot.
//!
//! ```text
//!  offset > 0 (image entirely right of / below the hot spot)
//!
//!  |<----- size + 2*offset ----->|<------ size ------>|
//!  +-----------------------------+--------------------+
//!  |                  x hot spot |       image        |
//!  +-----------------------------+--------------------+
//!  canvas = 2*size + 2*offset     placement = size + 2*offset
//!
//!  offset <= 0 (hot spot h = -offset pixels into the image)
//!
//!  delta = 2h - size
//!  canvas = size + |delta|        placement = max(0, -delta)
//! ```

use serde::{Deserialize, Serialize};

/// Atlas crop rectangle, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CropRect {
	/// Left edge
	pub left: u32,
	/// Top edge
	pub top: u32,
	/// Right edge (exclusive)
	pub right: u32,
	/// Bottom edge (exclusive)
	pub bottom: u32,
}

impl CropRect {
	/// Creates a rectangle from its edges.
	pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}

	/// Width, zero for inverted rectangles
	pub fn width(&self) -> u32 {
		self.right.saturating_sub(self.left)
	}

	/// Height, zero for inverted rectangles
	pub fn height(&self) -> u32 {
		self.bottom.saturating_sub(self.top)
	}

	/// True when the rectangle covers no pixel.
	pub fn is_empty(&self) -> bool {
		self.width() == 0 || self.height() == 0
	}

	/// True when the rectangle lies inside a `width` x `height` image.
	pub fn fits(&self, width: u32, height: u32) -> bool {
		self.right <= width && self.bottom <= height && !self.is_empty()
	}
}

/// Canvas size and image position for one centered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasPlacement {
	/// Canvas width
	pub canvas_width: u32,
	/// Canvas height
	pub canvas_height: u32,
	/// Image left edge on the canvas
	pub x: u32,
	/// Image top edge on the canvas
	pub y: u32,
}

impl CanvasPlacement {
	/// Computes the canvas that puts the hot spot at its center.
	pub fn centered(upper_left_x: i32, upper_left_y: i32, width: u32, height: u32) -> Self {
		let (canvas_width, x) = center_axis(upper_left_x, width);
		let (canvas_height, y) = center_axis(upper_left_y, height);
		Self {
			canvas_width,
			canvas_height,
			x,
			y,
		}
	}

	/// True when the image already sits centered with no padding.
	pub fn is_identity(&self, width: u32, height: u32) -> bool {
		self.canvas_width == width && self.canvas_height == height && self.x == 0 && self.y == 0
	}
}

/// `(canvas size, placement)` for one axis.
fn center_axis(offset: i32, size: u32) -> (u32, u32) {
	let size = i64::from(size);
	let offset = i64::from(offset);
	let (canvas, placement) = if offset > 0 {
		(2 * size + 2 * offset, size + 2 * offset)
	} else {
		let delta = 2 * -offset - size;
		(size + delta.abs(), (-delta).max(0))
	};
	(clamp_u32(canvas), clamp_u32(placement))
}

fn clamp_u32(value: i64) -> u32 {
	u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
