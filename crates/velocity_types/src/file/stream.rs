//! Little-endian field readers shared by the container decoders.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use super::error::{FileType, VelocityError};

/// Positional little-endian reads over a seekable stream.
///
/// Short reads are reported as [`VelocityError::InsufficientData`] tagged with the
/// container family being parsed.
pub(crate) trait StreamExt: Read + Seek {
	/// Fills `buffer`, reporting how many bytes the stream had on a short read.
	fn read_full(&mut self, buffer: &mut [u8], file_type: FileType) -> Result<(), VelocityError> {
		let mut filled = 0;
		while filled < buffer.len() {
			match self.read(&mut buffer[filled..]) {
				Ok(0) => return Err(VelocityError::insufficient_data(file_type, buffer.len(), filled)),
				Ok(n) => filled += n,
				Err(e) if e.kind() == ErrorKind::Interrupted => {}
				Err(e) => return Err(e.into()),
			}
		}
		Ok(())
	}

	fn read_array<const N: usize>(&mut self, file_type: FileType) -> Result<[u8; N], VelocityError> {
		let mut buffer = [0u8; N];
		self.read_full(&mut buffer, file_type)?;
		Ok(buffer)
	}

	fn read_u8_le(&mut self, file_type: FileType) -> Result<u8, VelocityError> {
		Ok(self.read_array::<1>(file_type)?[0])
	}

	fn read_i16_le(&mut self, file_type: FileType) -> Result<i16, VelocityError> {
		Ok(i16::from_le_bytes(self.read_array(file_type)?))
	}

	fn read_u16_le(&mut self, file_type: FileType) -> Result<u16, VelocityError> {
		Ok(u16::from_le_bytes(self.read_array(file_type)?))
	}

	fn read_i32_le(&mut self, file_type: FileType) -> Result<i32, VelocityError> {
		Ok(i32::from_le_bytes(self.read_array(file_type)?))
	}

	fn read_u32_le(&mut self, file_type: FileType) -> Result<u32, VelocityError> {
		Ok(u32::from_le_bytes(self.read_array(file_type)?))
	}

	fn read_f32_le(&mut self, file_type: FileType) -> Result<f32, VelocityError> {
		Ok(f32::from_le_bytes(self.read_array(file_type)?))
	}

	/// Reads exactly `len` bytes, refusing sizes larger than what is left in the stream.
	fn read_bytes(&mut self, len: usize, file_type: FileType) -> Result<Vec<u8>, VelocityError> {
		let remaining = self.remaining()?;
		if (len as u64) > remaining {
			return Err(VelocityError::insufficient_data(file_type, len, remaining as usize));
		}
		let mut buffer = vec![0u8; len];
		self.read_full(&mut buffer, file_type)?;
		Ok(buffer)
	}

	/// Reads everything up to the end of the stream.
	fn read_rest(&mut self) -> Result<Vec<u8>, VelocityError> {
		let mut buffer = Vec::new();
		self.read_to_end(&mut buffer)?;
		Ok(buffer)
	}

	/// Number of bytes between the current position and the end of the stream.
	fn remaining(&mut self) -> Result<u64, VelocityError> {
		let position = self.stream_position()?;
		let end = self.seek(SeekFrom::End(0))?;
		self.seek(SeekFrom::Start(position))?;
		Ok(end.saturating_sub(position))
	}
}

impl<R: Read + Seek + ?Sized> StreamExt for R {}
