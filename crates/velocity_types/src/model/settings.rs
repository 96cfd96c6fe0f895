//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::file::blit::BlitTypeRevision;
use crate::property::{PropertyClass, PropertySerializationFlags as Flags, PropertyValue, SchemaBuilder};

/// The engine's settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
	/// Window width
	pub screen_width: u32,
	/// Window height
	pub screen_height: u32,
	/// Run fullscreen
	pub fullscreen: Option<bool>,
	/// Music volume, 0 to 1
	pub music_volume: Option<f32>,
	/// Effects volume, 0 to 1
	pub sound_volume: Option<f32>,
	/// UI language code
	pub language: Option<String>,
	/// Blit numbering the title's assets were built with
	pub blit_revision: Option<BlitTypeRevision>,
	/// Recently opened files, written by the editor
	pub recent_files: Vec<String>,
}

impl EngineSettings {
	/// Blit numbering, the latest when unset.
	pub fn blit_revision_or_default(&self) -> BlitTypeRevision {
		self.blit_revision.unwrap_or_default()
	}
}

impl PropertyClass for EngineSettings {
	const CLASS_NAME: &'static str = "EngineSettings";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.required("Screen Width", |s| &s.screen_width, |s| &mut s.screen_width);
		schema.required("Screen Height", |s| &s.screen_height, |s| &mut s.screen_height);
		schema.optional("Fullscreen", |s| &s.fullscreen, |s| &mut s.fullscreen).with_default(false);
		schema.optional("Music Volume", |s| &s.music_volume, |s| &mut s.music_volume).with_default(1.0f32);
		schema.optional("Sound Volume", |s| &s.sound_volume, |s| &mut s.sound_volume).with_default(1.0f32);
		schema.optional("Language", |s| &s.language, |s| &mut s.language);
		schema
			.enumeration("Blit Revision", |s| &s.blit_revision, |s| &mut s.blit_revision)
			.with_default(PropertyValue::from_enum(BlitTypeRevision::default()))
			.read_only();
		schema
			.list("Recent Files", "File", |s| &s.recent_files, |s| &mut s.recent_files)
			.exclude(Flags::COMPACT);
	}
}
