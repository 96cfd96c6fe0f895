//! Codec context.
//!
//! Everything the decoders share lives in one explicitly constructed [`CodecContext`]: the
//! property schema registry, a pool of reusable zlib inflaters, the decode options and the
//! imaging backend. Decoders borrow the context; nothing is global.

use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::file::blit::BlitTypeRevision;
use crate::file::error::{FileType, VelocityError};
use crate::imaging::{ImageCrateBackend, ImagingBackend};
use crate::model;
use crate::property::{self, PropertyClass, PropertyObject, PropertySerializationFlags, SchemaRegistry};

/// Upper bound of the zlib expansion ratio.
const MAX_DEFLATE_RATIO: usize = 1032;

/// Options that change how containers are decoded.
///
/// # Presets
///
/// - `default()`: latest blit numbering, 64 megapixel images, transparent RLE seeks
/// - `lenient()`: no image size limit
/// - `strict()`: 16 megapixel images, RLE seeks keep the canvas untouched
///
/// The options derive `serde` so tools can load them from a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
	/// Blit type numbering used to interpret raw blit integers
	pub blit_revision: BlitTypeRevision,
	/// Clear pixels skipped by opaque RLE seeks to transparent
	pub seek_is_fill: bool,
	/// Largest accepted `width * height`
	pub max_pixels: u64,
	/// Place rendered frames on hot-spot centered canvases when the sequence asks for it
	pub center_hot_spots: bool,
	/// Flags passed to the property-list reader before any inference
	pub property_flags: PropertySerializationFlags,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			blit_revision: BlitTypeRevision::default(),
			seek_is_fill: true,
			max_pixels: 64 * 1024 * 1024,
			center_hot_spots: true,
			property_flags: PropertySerializationFlags::empty(),
		}
	}
}

impl DecodeOptions {
	/// Options without an image size limit.
	pub fn lenient() -> Self {
		Self {
			max_pixels: u64::MAX,
			..Self::default()
		}
	}

	/// Options with a lower image size limit that never touch skipped pixels.
	pub fn strict() -> Self {
		Self {
			seek_is_fill: false,
			max_pixels: 16 * 1024 * 1024,
			..Self::default()
		}
	}

	/// Same options with another blit numbering.
	pub fn with_revision(self, blit_revision: BlitTypeRevision) -> Self {
		Self {
			blit_revision,
			..self
		}
	}

	/// Rejects images larger than `max_pixels`.
	pub fn check_dimensions(&self, width: u32, height: u32, file_type: FileType) -> Result<(), VelocityError> {
		let pixels = u64::from(width) * u64::from(height);
		if pixels > self.max_pixels {
			return Err(VelocityError::Unsupported {
				file_type,
				feature: "image dimensions above the configured limit",
			});
		}
		Ok(())
	}
}

/// Free list of zlib inflaters.
#[derive(Debug, Default)]
pub struct InflaterPool {
	free: Mutex<Vec<Decompress>>,
}

impl InflaterPool {
	/// Creates an empty pool.
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes an inflater from the pool, creating one when the pool is empty.
	pub fn rent(&self) -> PooledInflater<'_> {
		let inflater = self
			.free
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.pop()
			.unwrap_or_else(|| Decompress::new(true));
		PooledInflater {
			pool: self,
			inflater: Some(inflater),
		}
	}

	/// Number of idle inflaters.
	pub fn available(&self) -> usize {
		self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	fn give_back(&self, mut inflater: Decompress) {
		inflater.reset(true);
		self.free.lock().unwrap_or_else(PoisonError::into_inner).push(inflater);
	}
}

/// An inflater checked out of an [`InflaterPool`]; returned and reset on drop.
pub struct PooledInflater<'a> {
	pool: &'a InflaterPool,
	inflater: Option<Decompress>,
}

impl Deref for PooledInflater<'_> {
	type Target = Decompress;

	fn deref(&self) -> &Decompress {
		// only taken in drop
		self.inflater.as_ref().unwrap_or_else(|| unreachable!())
	}
}

impl DerefMut for PooledInflater<'_> {
	fn deref_mut(&mut self) -> &mut Decompress {
		self.inflater.as_mut().unwrap_or_else(|| unreachable!())
	}
}

impl Drop for PooledInflater<'_> {
	fn drop(&mut self) {
		if let Some(inflater) = self.inflater.take() {
			self.pool.give_back(inflater);
		}
	}
}

/// Shared state for decoding and encoding Velocity Engine assets.
pub struct CodecContext {
	registry: SchemaRegistry,
	inflaters: InflaterPool,
	options: DecodeOptions,
	backend: Box<dyn ImagingBackend + Send + Sync>,
}

impl std::fmt::Debug for CodecContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CodecContext")
			.field("registry", &self.registry)
			.field("inflaters", &self.inflaters)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl Default for CodecContext {
	fn default() -> Self {
		Self::new(DecodeOptions::default())
	}
}

impl CodecContext {
	/// Creates a context with the engine classes registered and the `image` backend.
	pub fn new(options: DecodeOptions) -> Self {
		let registry = SchemaRegistry::new();
		model::register_engine_classes(&registry);
		Self {
			registry,
			inflaters: InflaterPool::new(),
			options,
			backend: Box::new(ImageCrateBackend),
		}
	}

	/// Replaces the imaging backend.
	pub fn with_backend(mut self, backend: impl ImagingBackend + Send + Sync + 'static) -> Self {
		self.backend = Box::new(backend);
		self
	}

	/// Schema registry
	pub fn registry(&self) -> &SchemaRegistry {
		&self.registry
	}

	/// Inflater pool
	pub fn inflaters(&self) -> &InflaterPool {
		&self.inflaters
	}

	/// Decode options
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Imaging backend
	pub fn backend(&self) -> &dyn ImagingBackend {
		self.backend.as_ref()
	}

	/// Inflates a zlib stream that must produce exactly `expected` bytes.
	///
	/// `expected` comes from the file, so it is checked against the pixel limit (four bytes
	/// per pixel) and against what `data` can expand to before anything is allocated.
	pub fn inflate(&self, data: &[u8], expected: usize, file_type: FileType) -> Result<Vec<u8>, VelocityError> {
		if expected as u64 > self.options.max_pixels.saturating_mul(4) {
			return Err(VelocityError::Unsupported {
				file_type,
				feature: "inflated size above the configured limit",
			});
		}
		if expected > data.len().saturating_mul(MAX_DEFLATE_RATIO) {
			return Err(VelocityError::Decompression {
				file_type,
				message: format!("{} byte stream cannot inflate to {expected} bytes", data.len()),
			});
		}

		let mut inflater = self.inflaters.rent();
		// one spare byte so an oversized stream is detected instead of truncated
		let mut output = Vec::with_capacity(expected + 1);
		let status = inflater
			.decompress_vec(data, &mut output, FlushDecompress::Finish)
			.map_err(|e| VelocityError::Decompression {
				file_type,
				message: e.to_string(),
			})?;
		trace!("inflated {} -> {} bytes ({status:?})", data.len(), output.len());

		if output.is_empty() || output.len() != expected {
			return Err(VelocityError::InflateSizeMismatch {
				file_type,
				expected,
				actual: output.len(),
			});
		}
		if status != Status::StreamEnd {
			debug!("{file_type}: zlib stream did not signal its end");
		}
		Ok(output)
	}

	/// Compresses `data` as a zlib stream.
	pub fn deflate(&self, data: &[u8]) -> Result<Vec<u8>, VelocityError> {
		let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
		encoder.write_all(data)?;
		Ok(encoder.finish()?)
	}

	/// Writes `object` as property-list text.
	pub fn serialize(&self, object: &dyn PropertyObject, flags: PropertySerializationFlags) -> String {
		property::serialize(&self.registry, object, flags)
	}

	/// Reads the first `T` block of `text` into `target`.
	pub fn deserialize<T: PropertyClass>(
		&self,
		text: &str,
		target: &mut T,
		flags: &mut PropertySerializationFlags,
	) -> bool {
		property::deserialize(&self.registry, text, target, flags)
	}
}
