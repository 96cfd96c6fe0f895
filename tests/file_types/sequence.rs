use velocity_rs::file::codec::encode_planar_rgba;
use velocity_rs::file::sequence::SEQUENCE_SIGNATURE;
use velocity_rs::prelude::*;

use super::push_deflated;

const RED: [u8; 4] = [200, 0, 0, 255];
const GREEN: [u8; 4] = [0, 200, 0, 255];
const BLUE: [u8; 4] = [0, 0, 200, 128];

fn frame_infos() -> SequenceFrameInfoList {
	SequenceFrameInfoList {
		flags: SequenceFlags::LOSSLESS,
		blit_type: Some(2),
		fps: Some(30.0),
		frames: vec![
			Some(SequenceFrameInfo::new(CropRect::new(0, 0, 2, 1), -1, 0)),
			None,
			Some(SequenceFrameInfo::new(CropRect::new(2, 0, 3, 1), 0, 0)),
		],
	}
}

fn standard_sequence(context: &CodecContext, list: &SequenceFrameInfoList) -> Vec<u8> {
	let text = context.serialize(list, PropertySerializationFlags::empty());
	let rgba = [RED, GREEN, BLUE].concat();
	let mut data = vec![SEQUENCE_SIGNATURE];
	push_deflated(&mut data, text.as_bytes());
	data.push(0);
	push_deflated(&mut data, &encode_planar_rgba(&rgba, 3, 1));
	data.extend_from_slice(&3u32.to_le_bytes());
	data.extend_from_slice(&1u32.to_le_bytes());
	data
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
	PixelBuffer::from_rgba(width, height, rgba.repeat((width * height) as usize)).unwrap()
}

#[test_log::test]
fn test_standard_sequence_with_companion_file() {
	let context = CodecContext::default();
	let dir = std::env::temp_dir().join(format!("velocity-rs-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let sequence_path = dir.join("walk.seq");
	let companion_path = dir.join("walk.txt");
	std::fs::write(&sequence_path, standard_sequence(&context, &frame_infos())).unwrap();
	// cp1252 comment
	let mut companion = b"Sequence\r\n{\r\n\tFPS=12\r\n\tComment=caf".to_vec();
	companion.push(0xE9);
	companion.extend_from_slice(b"\r\n}\r\n");
	std::fs::write(&companion_path, companion).unwrap();

	let sequence = Sequence::open(&context, SequenceMode::Atlas, &sequence_path, Some(&companion_path)).unwrap();
	std::fs::remove_dir_all(&dir).unwrap();

	assert_eq!(sequence.layout, SequenceLayout::Standard);
	assert_eq!(sequence.frame_count(), 3);
	// the companion list wins, the frame-info list only fills gaps
	assert_eq!(sequence.properties.fps, Some(12.0));
	assert_eq!(sequence.properties.comment.as_deref(), Some("café"));
	assert_eq!(sequence.properties.blit_type, Some(BlitType::BlendBlackBias));
	assert_eq!(sequence.properties.lossless, Some(true));
	assert_eq!(sequence.properties.center_hot_spot, Some(false));

	let frames = sequence.render_frames(&context).unwrap();
	assert_eq!(frames.len(), 3);
	assert_eq!(frames[0], PixelBuffer::from_rgba(2, 1, [RED, GREEN].concat()).unwrap());
	assert_eq!(frames[1], PixelBuffer::transparent(1, 1));
	assert_eq!(frames[2], solid(1, 1, BLUE));
}

#[test_log::test]
fn test_hd_sequence_reads_stored_properties() {
	let context = CodecContext::default();
	let properties = SequenceProperties {
		fps: Some(8.0),
		..Default::default()
	};
	let text = context.serialize(&properties, PropertySerializationFlags::HD_SEQUENCE)
		+ &context.serialize(&frame_infos(), PropertySerializationFlags::empty());
	let rgba = [RED, GREEN, BLUE].concat();

	let mut data = Vec::new();
	data.extend_from_slice(&(text.len() as u32).to_le_bytes());
	data.extend_from_slice(text.as_bytes());
	data.push(0);
	data.extend_from_slice(&(rgba.len() as u32).to_le_bytes());
	data.extend_from_slice(&rgba);
	data.extend_from_slice(&3u32.to_le_bytes());
	data.extend_from_slice(&1u32.to_le_bytes());

	let sequence = Sequence::from_bytes(&context, SequenceMode::Atlas, &data).unwrap();
	assert_eq!(sequence.layout, SequenceLayout::Hd);
	assert_eq!(sequence.property_list, text);
	assert_eq!(sequence.properties.fps, Some(8.0));
	assert_eq!(sequence.properties.lossless, Some(true));
	assert_eq!(sequence.atlas.size(), Some((3, 1)));

	let atlas = sequence.decode_atlas(&context).unwrap().unwrap();
	assert_eq!(atlas.pixel(2, 0), Some(BLUE));
	let frames = sequence.render_frames(&context).unwrap();
	assert_eq!(frames[2], solid(1, 1, BLUE));
}

#[test_log::test]
fn test_encoded_font() {
	let context = CodecContext::default();
	let frames = [
		Some(PlacedFrame {
			image: solid(3, 2, RED),
			upper_left_x: 0,
			upper_left_y: -2,
		}),
		Some(PlacedFrame {
			image: solid(2, 2, GREEN),
			upper_left_x: 0,
			upper_left_y: -2,
		}),
	];
	let encoded = SequenceEncoder::new(&context).encode_frames(&SequenceProperties::default(), &frames).unwrap();

	let mut data = Vec::new();
	data.extend_from_slice(&u32::from('A').to_le_bytes());
	data.extend_from_slice(&u32::from('C').to_le_bytes());
	data.extend_from_slice(&7i32.to_le_bytes());
	data.extend_from_slice(&encoded);

	let sequence = Sequence::from_bytes(&context, SequenceMode::Atlas, &data).unwrap();
	assert_eq!(sequence.layout, SequenceLayout::Font);
	let font = Font::from_sequence(&sequence).unwrap();
	assert_eq!(font.header.x_height, 7);
	assert_eq!(font.glyphs.len(), 2);
	assert_eq!(font.glyph('A').map(FontGlyph::advance), Some(3));
	assert!(font.glyph('C').is_none());

	let metrics = FontProperties {
		letter_spacing: Some(2),
		..Default::default()
	};
	assert_eq!(font.measure("AB", &metrics), 7);

	let rendered = sequence.render_frames(&context).unwrap();
	assert_eq!(rendered[1], solid(2, 2, GREEN));
}

#[test_log::test]
fn test_truncated_sequence() {
	let context = CodecContext::default();
	let data = standard_sequence(&context, &frame_infos());
	let err = Sequence::from_bytes(&context, SequenceMode::Atlas, &data[..data.len() - 6]).unwrap_err();
	assert!(err.is_malformed());
}
