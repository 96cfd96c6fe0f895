//! Font metadata.

use serde::{Deserialize, Serialize};

use crate::property::{PropertyClass, SchemaBuilder};

/// Spacing metrics shared by every font.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontProperties {
	/// Distance between baselines
	pub line_height: Option<i32>,
	/// Extra advance after every glyph
	pub letter_spacing: Option<i32>,
	/// Advance of the space character
	pub space_width: Option<i32>,
}

impl PropertyClass for FontProperties {
	const CLASS_NAME: &'static str = "Font";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.optional("Line Height", |f| &f.line_height, |f| &mut f.line_height);
		schema.optional("Letter Spacing", |f| &f.letter_spacing, |f| &mut f.letter_spacing).with_default(0);
		schema.optional("Space Width", |f| &f.space_width, |f| &mut f.space_width);
	}
}

/// A font whose glyphs are frames of a sequence atlas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontBitmapProperties {
	/// Metrics
	pub font: FontProperties,
	/// Sequence holding the glyphs
	pub sequence: Option<String>,
	/// Glyphs carry a one pixel outline
	pub outlined: Option<bool>,
}

impl PropertyClass for FontBitmapProperties {
	const CLASS_NAME: &'static str = "FontBitmap";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.embed(|f| &f.font, |f| &mut f.font);
		schema.optional("Sequence", |f| &f.sequence, |f| &mut f.sequence);
		schema.optional("Outlined", |f| &f.outlined, |f| &mut f.outlined).with_default(false);
	}
}
