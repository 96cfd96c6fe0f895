//! Velocity Engine asset utility.
//!
//! Provides four subcommands:
//! - `frame`: decode one frame container, print its header and save the pixels as PNG.
//! - `sequence`: decode a sequence, print its metadata and save every frame as PNG.
//! - `font`: decode a font sequence and measure a line of text.
//! - `pack`: pack PNG images into a standard atlas sequence.
//!
//! Decode options are read from an optional TOML file and `VELOCITY_*` environment
//! variables:
//!
//! ```toml
//! blit_revision = "Revision3"
//! seek_is_fill = false
//! max_pixels = 16777216
//! center_hot_spots = true
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example velocity_dump -- frame hero.frm --mode 3 --png hero.png
//! cargo run --example velocity_dump -- sequence walk.seq --properties walk.txt --out walk/
//! cargo run --example velocity_dump -- font small.fnt --text "Hello"
//! cargo run --example velocity_dump -- pack a.png b.png --output ab.seq --fps 12
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use velocity_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let context = CodecContext::new(load_options(cli.config.as_deref())?);
	match cli.command {
		Command::Frame(args) => run_frame(&context, args),
		Command::Sequence(args) => run_sequence(&context, args),
		Command::Font(args) => run_font(&context, args),
		Command::Pack(args) => run_pack(&context, args),
	}
}

#[derive(Parser)]
#[command(name = "velocity_dump")]
#[command(author = "velocity-rs project")]
#[command(version)]
#[command(about = "Decode, inspect and pack Velocity Engine frames and sequences", long_about = None)]
struct Cli {
	/// TOML file with decode options
	#[arg(short, long, global = true, value_name = "FILE", env = "VELOCITY_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Decode a single frame container
	Frame(FrameArgs),
	/// Decode a sequence container
	Sequence(SequenceArgs),
	/// Decode a font sequence and measure text
	Font(FontArgs),
	/// Pack PNG images into a standard sequence
	Pack(PackArgs),
}

#[derive(Args)]
struct FrameArgs {
	/// Frame container
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Container layout: 2 (flagged) or 3
	#[arg(short, long, default_value_t = 2)]
	mode: u8,

	/// Companion property list
	#[arg(short, long, value_name = "FILE")]
	properties: Option<PathBuf>,

	/// Save the decoded pixels as PNG
	#[arg(long, value_name = "FILE")]
	png: Option<PathBuf>,

	/// Number of leading bytes to dump
	#[arg(long, default_value_t = 32)]
	hex_bytes: usize,
}

#[derive(Args)]
struct SequenceArgs {
	/// Sequence container
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Read embedded frame containers instead of an atlas
	#[arg(short, long, default_value_t = false)]
	embedded: bool,

	/// Companion property list
	#[arg(short, long, value_name = "FILE")]
	properties: Option<PathBuf>,

	/// Directory for one PNG per frame
	#[arg(short, long, value_name = "DIR")]
	out: Option<PathBuf>,

	/// Also save the whole atlas image
	#[arg(long, default_value_t = false)]
	atlas: bool,
}

#[derive(Args)]
struct FontArgs {
	/// Font container
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Font property list with spacing metrics
	#[arg(short, long, value_name = "FILE")]
	properties: Option<PathBuf>,

	/// Text to measure
	#[arg(short, long)]
	text: String,
}

#[derive(Args)]
struct PackArgs {
	/// PNG images, one per frame
	#[arg(value_name = "PNG", required = true)]
	inputs: Vec<PathBuf>,

	/// Output sequence container
	#[arg(short, long, value_name = "FILE")]
	output: PathBuf,

	/// Frames per second
	#[arg(long)]
	fps: Option<f32>,

	/// Place the hot spot at the bottom center of every frame
	#[arg(long, default_value_t = false)]
	center: bool,
}

fn load_options(path: Option<&Path>) -> Result<DecodeOptions> {
	let mut builder = config::Config::builder();
	if let Some(path) = path {
		builder = builder.add_source(config::File::from(path).required(true));
	}
	let options = builder
		.add_source(config::Environment::with_prefix("VELOCITY").try_parsing(true))
		.build()
		.context("failed to read decode options")?
		.try_deserialize::<DecodeOptions>()
		.context("invalid decode options")?;
	log::debug!("decode options: {options:?}");
	Ok(options)
}

fn read_text(path: Option<&Path>) -> Result<Option<String>> {
	path.map(|path| {
		let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
		Ok(velocity_rs::property::decode_text(&bytes).into_owned())
	})
	.transpose()
}

fn save_png(image: &PixelBuffer, path: &Path) -> Result<()> {
	let rgba = image::RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
		.context("pixel buffer does not match its dimensions")?;
	rgba.save(path).with_context(|| format!("failed to write {}", path.display()))?;
	info!("saved {}x{} image to {}", image.width, image.height, path.display());
	Ok(())
}

fn run_frame(context: &CodecContext, args: FrameArgs) -> Result<()> {
	let Some(mode) = FrameMode::from_u8(args.mode) else {
		bail!("unknown frame mode {}", args.mode);
	};
	let data = fs::read(&args.input).with_context(|| format!("failed to read {}", args.input.display()))?;
	let text = read_text(args.properties.as_deref())?;

	println!("{}", hex::encode(&data[..args.hex_bytes.min(data.len())]));

	let frame = FrameDecoder::new(context, mode)
		.decode(&mut std::io::Cursor::new(&data), text.as_deref())
		.with_context(|| format!("failed to decode {}", args.input.display()))?;
	println!("{}", serde_json::to_string_pretty(&frame)?);

	if let Some(png) = args.png {
		save_png(&frame.decode_pixels(context)?, &png)?;
	}
	Ok(())
}

fn run_sequence(context: &CodecContext, args: SequenceArgs) -> Result<()> {
	let mode = if args.embedded {
		SequenceMode::Embedded
	} else {
		SequenceMode::Atlas
	};
	let sequence = Sequence::open(context, mode, &args.input, args.properties.as_ref())
		.with_context(|| format!("failed to decode {}", args.input.display()))?;
	println!("{}", serde_json::to_string_pretty(&sequence)?);
	info!("{:?} sequence, {} frames", sequence.layout, sequence.frame_count());

	let Some(out) = args.out else {
		return Ok(());
	};
	fs::create_dir_all(&out)?;
	if args.atlas {
		match sequence.decode_atlas(context)? {
			Some(atlas) => save_png(&atlas, &out.join("atlas.png"))?,
			None => warn!("{:?} atlas has no single image", sequence.atlas.size()),
		}
	}
	for (index, frame) in sequence.render_frames(context)?.iter().enumerate() {
		save_png(frame, &out.join(format!("frame_{index:03}.png")))?;
	}
	Ok(())
}

fn run_font(context: &CodecContext, args: FontArgs) -> Result<()> {
	let sequence = Sequence::open(context, SequenceMode::Atlas, &args.input, None::<&Path>)
		.with_context(|| format!("failed to decode {}", args.input.display()))?;
	let Some(font) = Font::from_sequence(&sequence) else {
		bail!("{} has no font header", args.input.display());
	};

	let mut metrics = FontProperties::default();
	if let Some(text) = read_text(args.properties.as_deref())?
		&& !context.deserialize(&text, &mut metrics, &mut PropertySerializationFlags::empty())
	{
		warn!("no Font block in the property list, measuring without spacing");
	}

	let missing: String = args.text.chars().filter(|c| *c != ' ' && font.glyph(*c).is_none()).collect();
	if !missing.is_empty() {
		warn!("no glyphs for {missing:?}");
	}
	println!(
		"{} glyphs ({}..={}), x-height {}",
		font.glyphs.len(),
		font.header.first,
		font.header.last,
		font.header.x_height
	);
	println!("{:?} is {} pixels wide", args.text, font.measure(&args.text, &metrics));
	Ok(())
}

fn run_pack(context: &CodecContext, args: PackArgs) -> Result<()> {
	let frames = args
		.inputs
		.iter()
		.map(|path| {
			let rgba = image::open(path).with_context(|| format!("failed to read {}", path.display()))?.to_rgba8();
			let (width, height) = rgba.dimensions();
			let image = PixelBuffer::from_rgba(width, height, rgba.into_raw())?;
			let (upper_left_x, upper_left_y) = if args.center {
				(-(width as i32) / 2, -(height as i32))
			} else {
				(0, 0)
			};
			Ok(Some(PlacedFrame {
				image,
				upper_left_x,
				upper_left_y,
			}))
		})
		.collect::<Result<Vec<_>>>()?;

	let properties = SequenceProperties {
		fps: args.fps,
		center_hot_spot: Some(args.center),
		..Default::default()
	};
	let data = SequenceEncoder::new(context).encode_frames(&properties, &frames)?;
	fs::write(&args.output, &data).with_context(|| format!("failed to write {}", args.output.display()))?;
	info!("packed {} frames into {} ({} bytes)", frames.len(), args.output.display(), data.len());
	Ok(())
}
