//! File type tests for `velocity-rs`
//!
//! Containers are built in memory with the layouts the engine writes and decoded through
//! the public API.

mod frame;
mod property;
mod sequence;

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

/// Zlib-compresses `data` the way the engine's tools do.
pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(data).unwrap();
	encoder.finish().unwrap()
}

/// Appends a deflated blob with its deflated and inflated sizes.
pub(crate) fn push_deflated(out: &mut Vec<u8>, data: &[u8]) {
	let deflated = zlib(data);
	out.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
	out.extend_from_slice(&(data.len() as u32).to_le_bytes());
	out.extend_from_slice(&deflated);
}
