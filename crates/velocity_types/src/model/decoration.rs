//! Level objects: decorations, decals, shapes and brick layouts.

use serde::{Deserialize, Serialize};

use crate::property::{
	EnumDescriptor, EnumMember, PropertyClass, PropertyEnum, PropertySerializationFlags as Flags, PropertyValue,
	SchemaBuilder,
};

/// A static sprite placed in a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
	/// Object name
	pub name: Option<String>,
	/// Sequence drawn for the object
	pub sequence: Option<String>,
	/// Position x
	pub x: i32,
	/// Position y
	pub y: i32,
	/// Draw layer, higher is in front
	pub layer: Option<i32>,
	/// Mirrored horizontally
	pub flip_x: Option<bool>,
	/// Editor-only note
	pub editor_note: Option<String>,
}

impl PropertyClass for Decoration {
	const CLASS_NAME: &'static str = "Decoration";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.optional("Name", |d| &d.name, |d| &mut d.name);
		schema.optional("Sequence", |d| &d.sequence, |d| &mut d.sequence);
		schema.required("X", |d| &d.x, |d| &mut d.x);
		schema.required("Y", |d| &d.y, |d| &mut d.y);
		schema.optional("Layer", |d| &d.layer, |d| &mut d.layer).with_default(0);
		schema.optional("Flip X", |d| &d.flip_x, |d| &mut d.flip_x).with_default(false);
		schema.optional("Editor Note", |d| &d.editor_note, |d| &mut d.editor_note).exclude(Flags::COMPACT);
	}
}

/// A decoration blended onto the level background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decal {
	/// Placement
	pub decoration: Decoration,
	/// Opacity, 0 to 1
	pub opacity: Option<f32>,
	/// Rotation in degrees
	pub rotation: Option<f32>,
}

impl PropertyClass for Decal {
	const CLASS_NAME: &'static str = "Decal";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.embed(|d| &d.decoration, |d| &mut d.decoration);
		schema.optional("Opacity", |d| &d.opacity, |d| &mut d.opacity).with_default(1.0f32);
		schema.optional("Rotation", |d| &d.rotation, |d| &mut d.rotation);
	}
}

/// One vertex of a [`DecorationShape`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapePoint {
	/// X relative to the decoration position
	pub x: i32,
	/// Y relative to the decoration position
	pub y: i32,
}

impl PropertyClass for ShapePoint {
	const CLASS_NAME: &'static str = "ShapePoint";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.required("X", |p| &p.x, |p| &mut p.x);
		schema.required("Y", |p| &p.y, |p| &mut p.y);
	}
}

/// A decoration with a collision outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecorationShape {
	/// Placement
	pub decoration: Decoration,
	/// Last point connects back to the first
	pub closed: Option<bool>,
	/// Outline vertices
	pub points: Vec<Option<ShapePoint>>,
}

impl PropertyClass for DecorationShape {
	const CLASS_NAME: &'static str = "DecorationShape";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.embed(|s| &s.decoration, |s| &mut s.decoration);
		schema.optional("Closed", |s| &s.closed, |s| &mut s.closed).with_default(true);
		schema.object_list("Points", "Point", |s| &s.points, |s| &mut s.points);
	}
}

/// Behavior of a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BrickKind {
	/// Breaks on the first hit
	#[default]
	Normal = 0,
	/// Needs several hits
	Hard = 1,
	/// Never breaks
	Unbreakable = 2,
	/// Drops a power-up when broken
	PowerUp = 3,
}

impl BrickKind {
	/// All kinds by discriminant.
	pub const ALL: [BrickKind; 4] = [BrickKind::Normal, BrickKind::Hard, BrickKind::Unbreakable, BrickKind::PowerUp];
}

static BRICK_KIND_DESCRIPTOR: EnumDescriptor = EnumDescriptor {
	type_name: "BrickKind",
	members: &[
		EnumMember::named(0, "Normal"),
		EnumMember::named(1, "Hard"),
		EnumMember::named(2, "Unbreakable"),
		EnumMember::named(3, "Power Up"),
	],
};

impl PropertyEnum for BrickKind {
	fn descriptor() -> &'static EnumDescriptor {
		&BRICK_KIND_DESCRIPTOR
	}

	fn to_raw(self) -> i64 {
		self as i64
	}

	fn from_raw(raw: i64) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| *kind as i64 == raw)
	}
}

/// One brick of a [`BrickLayout`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brick {
	/// Behavior
	pub kind: Option<BrickKind>,
	/// Grid column
	pub column: u32,
	/// Grid row
	pub row: u32,
	/// Hits needed to break it
	pub hits: Option<i32>,
	/// Power-up dropped when broken
	pub power_up: Option<String>,
}

impl PropertyClass for Brick {
	const CLASS_NAME: &'static str = "Brick";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema
			.enumeration("Kind", |b| &b.kind, |b| &mut b.kind)
			.with_default(PropertyValue::from_enum(BrickKind::Normal));
		schema.required("Column", |b| &b.column, |b| &mut b.column);
		schema.required("Row", |b| &b.row, |b| &mut b.row);
		schema.optional("Hits", |b| &b.hits, |b| &mut b.hits).with_default(1);
		schema.optional("Power Up", |b| &b.power_up, |b| &mut b.power_up);
		schema.should_serialize("Power Up", |b| b.kind == Some(BrickKind::PowerUp));
	}
}

/// A grid of bricks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrickLayout {
	/// Layout name
	pub name: Option<String>,
	/// Grid width
	pub columns: u32,
	/// Grid height
	pub rows: u32,
	/// Background sequence
	pub background: Option<String>,
	/// Bricks, `None` for empty slots kept by the editor
	pub bricks: Vec<Option<Brick>>,
}

impl BrickLayout {
	/// Brick at a grid cell.
	pub fn brick_at(&self, column: u32, row: u32) -> Option<&Brick> {
		self.bricks.iter().flatten().find(|brick| brick.column == column && brick.row == row)
	}
}

impl PropertyClass for BrickLayout {
	const CLASS_NAME: &'static str = "BrickLayout";

	fn describe(schema: &mut SchemaBuilder<Self>) {
		schema.optional("Name", |l| &l.name, |l| &mut l.name);
		schema.required("Columns", |l| &l.columns, |l| &mut l.columns);
		schema.required("Rows", |l| &l.rows, |l| &mut l.rows);
		schema.optional("Background", |l| &l.background, |l| &mut l.background);
		schema.object_list("Bricks", "Brick", |l| &l.bricks, |l| &mut l.bricks);
	}
}
