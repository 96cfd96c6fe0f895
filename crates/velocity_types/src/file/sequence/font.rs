//! Bitmap fonts stored as sequences.
//!
//! A font container is a standard atlas sequence behind a [`FontHeader`]. Character code
//! `first + n` is frame `n`; codes outside `first..=last` have no glyph.

use serde::{Deserialize, Serialize};

use super::{FontHeader, Sequence};
use crate::geometry::CropRect;
use crate::model::{FontProperties, SequenceFrameInfo};

/// One character of a bitmap font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontGlyph {
	/// Character code
	pub code: u32,
	/// Frame index in the sequence
	pub frame: usize,
	/// Atlas rectangle, `None` for characters without pixels
	pub rect: Option<CropRect>,
	/// Upper-left x relative to the pen position
	pub upper_left_x: i32,
	/// Upper-left y relative to the baseline
	pub upper_left_y: i32,
}

impl FontGlyph {
	/// Horizontal advance, zero for empty glyphs.
	pub fn advance(&self) -> u32 {
		self.rect.map_or(0, |rect| rect.width())
	}
}

/// Glyph table of a font sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
	/// Character range and x-height
	pub header: FontHeader,
	/// One glyph per character of the range that has a frame
	pub glyphs: Vec<FontGlyph>,
}

impl Font {
	/// Builds the glyph table of a font sequence, `None` for sequences without a font header.
	///
	/// The range is cut short when the sequence has fewer frames than characters.
	pub fn from_sequence(sequence: &Sequence) -> Option<Self> {
		let header = sequence.font_header?;
		let glyphs = sequence
			.frame_infos
			.frames
			.iter()
			.take(header.glyph_count())
			.enumerate()
			.map(|(frame, info)| FontGlyph {
				code: header.first + frame as u32,
				frame,
				rect: info.as_ref().map(SequenceFrameInfo::crop_rect).filter(|rect| !rect.is_empty()),
				upper_left_x: info.map_or(0, |info| info.upper_left_x),
				upper_left_y: info.map_or(0, |info| info.upper_left_y),
			})
			.collect();
		Some(Self {
			header,
			glyphs,
		})
	}

	/// Glyph of `character`.
	pub fn glyph(&self, character: char) -> Option<&FontGlyph> {
		let index = u32::from(character).checked_sub(self.header.first)?;
		self.glyphs.get(index as usize)
	}

	/// Width of `text` set on one line.
	///
	/// Spaces advance by the font's space width when it has one. Characters without a glyph
	/// are skipped, and the letter spacing is added between glyphs.
	pub fn measure(&self, text: &str, metrics: &FontProperties) -> u32 {
		let spacing = i64::from(metrics.letter_spacing.unwrap_or(0));
		let mut width = 0i64;
		let mut glyphs = 0i64;
		for character in text.chars() {
			let advance = match (character, metrics.space_width) {
				(' ', Some(space)) => i64::from(space),
				_ => match self.glyph(character) {
					Some(glyph) => i64::from(glyph.advance()),
					None => continue,
				},
			};
			width += advance;
			glyphs += 1;
		}
		if glyphs > 1 {
			width += spacing * (glyphs - 1);
		}
		u32::try_from(width.max(0)).unwrap_or(u32::MAX)
	}
}
