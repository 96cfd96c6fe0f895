//! Property-list text decoding.
//!
//! Property lists written by the engine tools are UTF-8, older titles shipped Windows-1252
//! text. Both are accepted; a UTF-8 byte order mark is dropped.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;
use log::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes property-list bytes into text.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
	let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
	match std::str::from_utf8(bytes) {
		Ok(text) => Cow::Borrowed(text),
		Err(_) => {
			debug!("property list is not UTF-8, decoding as Windows-1252");
			let (text, _, _) = WINDOWS_1252.decode(bytes);
			text
		}
	}
}

/// Encodes text as Windows-1252 for titles that cannot read UTF-8.
///
/// Characters with no Windows-1252 mapping are replaced by numeric character references.
pub fn encode_cp1252(text: &str) -> Cow<'_, [u8]> {
	let (bytes, _, _) = WINDOWS_1252.encode(text);
	bytes
}
