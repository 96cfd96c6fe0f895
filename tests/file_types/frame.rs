use std::io::Cursor;

use velocity_rs::file::codec::encode_alpha_mask;
use velocity_rs::file::frame::FLAG_RLE;
use velocity_rs::prelude::*;

fn flagged_header(format: PixelFormat, width: u16, height: u16, flags: u32) -> Vec<u8> {
	let mut data = vec![1, format as u8];
	data.extend_from_slice(&(-3i16).to_le_bytes());
	data.extend_from_slice(&4i16.to_le_bytes());
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend_from_slice(&flags.to_le_bytes());
	data
}

/// A 2x2 RLE frame: an opaque red top row and a translucent blue bottom row.
fn rle_frame() -> Vec<u8> {
	// repeat 2 x red, seek 2
	let opaque = [0x02, 0x00, 0xF8, 0x82];
	// seek 2, repeat 2 x blue
	let translucent = [0x82, 0x02, 0x1F, 0x00];
	let alpha = [128, 64];

	let mut data = flagged_header(PixelFormat::Rgb565, 2, 2, FLAG_RLE);
	for layer in [&opaque[..], &translucent[..], &alpha[..]] {
		data.extend_from_slice(&(layer.len() as u32).to_le_bytes());
		data.extend_from_slice(layer);
	}
	for _ in 0..3 {
		data.extend_from_slice(&8u32.to_le_bytes());
		data.extend_from_slice(&0u32.to_le_bytes());
		data.extend_from_slice(&2u32.to_le_bytes());
	}
	data
}

#[test_log::test]
fn test_rle_frame_passes() {
	let context = CodecContext::default();
	let frame = Frame::from_bytes(&context, FrameMode::Flagged, &rle_frame()).unwrap();
	assert!(frame.header.is_rle());
	assert_eq!((frame.header.x, frame.header.y), (3, -4));
	assert_eq!(frame.row_offsets[0], vec![0, 2]);

	let pixels = frame.decode_pixels(&context).unwrap();
	assert_eq!(pixels.pixel(0, 0), Some([255, 0, 0, 255]));
	assert_eq!(pixels.pixel(1, 0), Some([255, 0, 0, 255]));
	assert_eq!(pixels.pixel(0, 1), Some([0, 0, 255, 128]));
	assert_eq!(pixels.pixel(1, 1), Some([0, 0, 255, 64]));
}

#[test_log::test]
fn test_companion_property_list() {
	let context = CodecContext::default();
	let text = "Frame\n{\n\tBlit Type=Blend Black Bias\n\tQuality=80\n\tHot Spot X=2\n}\n";
	let mut decoder = FrameDecoder::new(&context, FrameMode::Flagged);
	let frame = decoder.decode(&mut Cursor::new(rle_frame()), Some(text)).unwrap();
	assert_eq!(frame.properties.blit_type, Some(BlitType::BlendBlackBias));
	assert_eq!(frame.properties.quality, Some(80));
	assert_eq!(frame.properties.hot_spot_x, Some(2));
	assert!(frame.property_flags.contains(PropertySerializationFlags::IMAGE_FORMAT_2));

	let err = decoder.decode(&mut Cursor::new(rle_frame()), None).unwrap_err();
	assert!(matches!(err, VelocityError::DecoderState { .. }));
	decoder.reset();
	assert!(decoder.decode(&mut Cursor::new(rle_frame()), None).is_ok());
}

#[test_log::test]
fn test_mode3_interleaved() {
	let rgba = [1, 2, 3, 4, 5, 6, 7, 8];
	let mut data = Vec::new();
	data.extend_from_slice(&(-1i32).to_le_bytes());
	data.extend_from_slice(&2i32.to_le_bytes());
	data.push(1);
	data.extend_from_slice(&(rgba.len() as u32).to_le_bytes());
	data.extend_from_slice(&rgba);
	data.extend_from_slice(&2u32.to_le_bytes());
	data.extend_from_slice(&1u32.to_le_bytes());

	let context = CodecContext::default();
	let frame = Frame::from_bytes(&context, FrameMode::Mode3, &data).unwrap();
	assert_eq!(frame.header.pixel_format, PixelFormat::Rgba8888);
	assert_eq!((frame.header.x, frame.header.y), (-1, 2));
	let pixels = frame.decode_pixels(&context).unwrap();
	assert_eq!(pixels.pixel(1, 0), Some([5, 6, 7, 8]));
}

#[test_log::test]
fn test_mode3_jpeg_with_mask() {
	let color = image::RgbImage::from_pixel(2, 1, image::Rgb([128, 128, 128]));
	let mut jpeg = Vec::new();
	image::DynamicImage::ImageRgb8(color)
		.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
		.unwrap();
	let alpha = PixelBuffer::from_rgba(2, 1, vec![0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
	let mask = encode_alpha_mask(&alpha);

	let mut data = Vec::new();
	data.extend_from_slice(&0i32.to_le_bytes());
	data.extend_from_slice(&0i32.to_le_bytes());
	data.push(0);
	data.extend_from_slice(&(jpeg.len() as u32).to_le_bytes());
	data.extend_from_slice(&jpeg);
	data.push(0);
	data.extend_from_slice(&(mask.len() as u32).to_le_bytes());
	data.extend_from_slice(&super::zlib(&mask));

	let context = CodecContext::default();
	let frame = Frame::from_bytes(&context, FrameMode::Mode3, &data).unwrap();
	assert_eq!(frame.header.pixel_format, PixelFormat::Jpeg);
	assert_eq!((frame.header.width, frame.header.height), (0, 0));

	let pixels = frame.decode_pixels(&context).unwrap();
	assert_eq!((pixels.width, pixels.height), (2, 1));
	assert_eq!(pixels.pixel(0, 0).map(|pixel| pixel[3]), Some(255));
	assert_eq!(pixels.pixel(1, 0).map(|pixel| pixel[3]), Some(0));
}

#[test_log::test]
fn test_dimension_limit_by_preset() {
	let data = flagged_header(PixelFormat::Rgb565, 5000, 5000, 0);

	let strict = CodecContext::new(DecodeOptions::strict());
	let err = Frame::from_bytes(&strict, FrameMode::Flagged, &data).unwrap_err();
	assert!(err.is_unsupported());

	// within the default limit the header passes and the missing layers are reported
	let context = CodecContext::default();
	let err = Frame::from_bytes(&context, FrameMode::Flagged, &data).unwrap_err();
	assert!(matches!(err, VelocityError::InsufficientData { .. }));
	assert!(err.is_malformed());
}

#[test_log::test]
fn test_legacy_mode_is_unsupported() {
	let context = CodecContext::default();
	let err = Frame::from_bytes(&context, FrameMode::LegacyLiteral, &[0; 16]).unwrap_err();
	assert!(err.is_unsupported());
}
