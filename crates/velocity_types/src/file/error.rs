//! Error types for Velocity Engine container parsing.

use std::fmt::Display;

use thiserror::Error;

/// Container family an error was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Single image frame container
	Frame,
	/// Animation / sprite atlas container
	Sequence,
	/// Bitmap font container (a sequence with a font header)
	Font,
	/// Property-list text
	PropertyList,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Frame => write!(f, "Frame"),
			FileType::Sequence => write!(f, "Sequence"),
			FileType::Font => write!(f, "Font"),
			FileType::PropertyList => write!(f, "Property List"),
		}
	}
}

/// Errors that can occur while decoding Velocity Engine assets.
///
/// Every variant except [`VelocityError::Unsupported`] describes malformed input: the decode
/// is aborted at the point of detection and no partially decoded state is handed out.
#[derive(Debug, Error)]
pub enum VelocityError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Container being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// A sentinel byte did not hold its fixed value
	#[error("{file_type}: invalid {field} byte, expected 0x{expected:02X}, got 0x{actual:02X}")]
	InvalidSentinel {
		/// Container being parsed
		file_type: FileType,
		/// Name of the sentinel field
		field: &'static str,
		/// Required value
		expected: u8,
		/// Value found in the stream
		actual: u8,
	},

	/// Embedded frame separator was neither `0x00` nor `0x01`
	#[error("Sequence: invalid embedded frame separator 0x{0:02X}")]
	InvalidSeparator(u8),

	/// The deflate stream could not be inflated
	#[error("{file_type}: decompression failed: {message}")]
	Decompression {
		/// Container being parsed
		file_type: FileType,
		/// Error reported by the inflater
		message: String,
	},

	/// Inflated output did not match the size declared by the container
	#[error("{file_type}: inflated {actual} bytes, container declared {expected} bytes")]
	InflateSizeMismatch {
		/// Container being parsed
		file_type: FileType,
		/// Declared inflated size
		expected: usize,
		/// Number of bytes produced
		actual: usize,
	},

	/// A row pixel offset table did not hold one entry per scanline
	#[error("Frame: row offset table for layer {layer} is {actual} bytes, expected {expected}")]
	RowOffsetTableMismatch {
		/// Layer index
		layer: usize,
		/// Expected table size in bytes (`height * 4`)
		expected: usize,
		/// Declared table size in bytes
		actual: usize,
	},

	/// Sequence source format magic is not one of the known titles
	#[error("Sequence: unknown source format 0x{0:08X}")]
	UnknownSourceFormat(u32),

	/// Pixel format tag is not recognized
	#[error("Frame: unknown pixel format tag {0}")]
	UnknownPixelFormat(u8),

	/// The RLE opcode stream is malformed
	#[error("corrupt opcode stream at byte {position}: {message}")]
	CorruptOpcodeStream {
		/// Offset in the opcode stream
		position: usize,
		/// What went wrong
		message: String,
	},

	/// A pixel stream produced a different number of pixels than the canvas holds
	#[error("pixel count mismatch: expected {expected} pixels, decoded {actual}")]
	PixelCountMismatch {
		/// `width * height`
		expected: usize,
		/// Number of pixel positions produced
		actual: usize,
	},

	/// Decoder was used out of order (e.g. decoded twice without a reset)
	#[error("{file_type}: decoder is in state {state}, call reset() first")]
	DecoderState {
		/// Decoder family
		file_type: FileType,
		/// Current state name
		state: &'static str,
	},

	/// The container variant is recognized but intentionally not implemented
	#[error("{file_type}: {feature} is not supported")]
	Unsupported {
		/// Container being parsed
		file_type: FileType,
		/// Unimplemented feature
		feature: &'static str,
	},

	/// The imaging backend failed
	#[error("imaging backend: {0}")]
	Imaging(String),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl VelocityError {
	/// Creates an insufficient data error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Returns true when the error marks an intentionally unimplemented legacy path
	/// rather than a corrupt asset.
	pub fn is_unsupported(&self) -> bool {
		matches!(self, Self::Unsupported { .. })
	}

	/// Returns true when the error was caused by malformed input data.
	pub fn is_malformed(&self) -> bool {
		!matches!(self, Self::Unsupported { .. } | Self::DecoderState { .. } | Self::Imaging(_))
	}
}
