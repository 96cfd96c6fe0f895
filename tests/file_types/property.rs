use velocity_rs::model::{BrickKind, BrickLayout, Decoration};
use velocity_rs::prelude::*;
use velocity_rs::property::{decode_text, encode_cp1252};

const LEVEL: &str = "\
Decoration
{
	Name=Torch
	Sequence=torch.seq
	X=40
	Y=-12
	Flip X=1
	Editor Note=moved left in the night build
}
BrickLayout
{
	Name=Cellar
	Columns=8
	Rows=2
	Bricks=Array
	{
		Item Count=1
		Brick=Brick
		{
			Kind=Power Up
			Column=4
			Row=1
			Power Up=laser
		}
	}
}
";

#[test_log::test]
fn test_blocks_of_one_file() {
	let context = CodecContext::default();
	let mut flags = PropertySerializationFlags::empty();

	let mut decoration = Decoration::default();
	assert!(context.deserialize(LEVEL, &mut decoration, &mut flags));
	assert_eq!(decoration.name.as_deref(), Some("Torch"));
	assert_eq!((decoration.x, decoration.y), (40, -12));
	assert_eq!(decoration.flip_x, Some(true));

	let mut layout = BrickLayout::default();
	assert!(context.deserialize(LEVEL, &mut layout, &mut flags));
	let brick = layout.brick_at(4, 1).unwrap();
	assert_eq!(brick.kind, Some(BrickKind::PowerUp));
	assert_eq!(brick.power_up.as_deref(), Some("laser"));

	let mut settings = EngineSettings::default();
	assert!(!context.deserialize(LEVEL, &mut settings, &mut flags));
}

#[test_log::test]
fn test_compact_rewrite_drops_editor_fields() {
	let context = CodecContext::default();
	let mut decoration = Decoration::default();
	let mut flags = PropertySerializationFlags::empty();
	assert!(context.deserialize(LEVEL, &mut decoration, &mut flags));

	let compact = context.serialize(&decoration, PropertySerializationFlags::COMPACT);
	assert!(!compact.contains("Editor Note"));
	let mut reread = Decoration::default();
	assert!(context.deserialize(&compact, &mut reread, &mut flags));
	assert_eq!(reread.editor_note, None);
	assert_eq!(reread.sequence, decoration.sequence);
}

#[test_log::test]
fn test_settings_choose_blit_numbering() {
	let settings_text = encode_cp1252("EngineSettings\n{\n\tScreen Width=640\n\tScreen Height=480\n\tBlit Revision=3\n}\n");
	let mut settings = EngineSettings::default();
	let mut flags = PropertySerializationFlags::empty();
	assert!(CodecContext::default().deserialize(&decode_text(&settings_text), &mut settings, &mut flags));

	let list = SequenceFrameInfoList {
		blit_type: Some(0),
		..Default::default()
	};
	let data = SequenceEncoder::new(&CodecContext::default())
		.encode(&list, &PixelBuffer::transparent(0, 0))
		.unwrap();

	let latest = Sequence::from_bytes(&CodecContext::default(), SequenceMode::Atlas, &data).unwrap();
	assert!(latest.is_empty());
	assert_eq!(latest.properties.blit_type, Some(BlitType::Normal));

	let options = DecodeOptions::default().with_revision(settings.blit_revision_or_default());
	let context = CodecContext::new(options);
	let older = Sequence::from_bytes(&context, SequenceMode::Atlas, &data).unwrap();
	assert_eq!(older.properties.blit_type, Some(BlitType::BlendBlackBias));
}
