//! Benchmark suite for the pixel codecs and container decoders
//!
//! Every input is generated by `velocity_benches`, so the suite runs without game assets.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use velocity_benches::{
	generate_opaque_pass, generate_planar, generate_rle_frame, generate_standard_sequence, generate_translucent_pass,
	sizes,
};
use velocity_types::context::{CodecContext, DecodeOptions};
use velocity_types::file::codec::{decode_planar_rgba, decode_rle_rgb565};
use velocity_types::file::frame::{Frame, FrameMode};
use velocity_types::file::sequence::{Sequence, SequenceMode};
use velocity_types::file::FileType;

const SIZES: [(&str, (u16, u16)); 4] = [
	("tiny", sizes::TINY),
	("small", sizes::SMALL),
	("character", sizes::CHARACTER),
	("screen", sizes::SCREEN),
];

/// Benchmark both RLE passes over one canvas
fn bench_rle_passes(c: &mut Criterion) {
	let mut group = c.benchmark_group("rle_passes");

	for (name, (width, height)) in SIZES {
		let (w, h) = (usize::from(width), usize::from(height));
		let opaque = generate_opaque_pass(w, h);
		let (translucent, alpha) = generate_translucent_pass(w, h);

		group.throughput(Throughput::Elements((w * h) as u64));
		group.bench_with_input(BenchmarkId::new("opaque", name), &opaque, |b, opaque| {
			let mut canvas = vec![0u8; w * h * 4];
			b.iter(|| {
				let result = decode_rle_rgb565(black_box(opaque), None, &mut canvas, true);
				black_box(result)
			});
		});
		group.bench_with_input(BenchmarkId::new("translucent", name), &translucent, |b, translucent| {
			let mut canvas = vec![0u8; w * h * 4];
			b.iter(|| {
				let result = decode_rle_rgb565(black_box(translucent), Some(&alpha), &mut canvas, true);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark the seek policy of opaque passes
fn bench_rle_seek_policy(c: &mut Criterion) {
	let mut group = c.benchmark_group("rle_seek_policy");
	let (width, height) = sizes::SCREEN;
	let (w, h) = (usize::from(width), usize::from(height));
	let opaque = generate_opaque_pass(w, h);

	for seek_is_fill in [true, false] {
		group.bench_function(BenchmarkId::from_parameter(seek_is_fill), |b| {
			let mut canvas = vec![0u8; w * h * 4];
			b.iter(|| {
				let result = decode_rle_rgb565(black_box(&opaque), None, &mut canvas, seek_is_fill);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark planar delta decoding
fn bench_planar(c: &mut Criterion) {
	let mut group = c.benchmark_group("planar");

	for (name, (width, height)) in SIZES {
		let (w, h) = (usize::from(width), usize::from(height));
		let planes = generate_planar(u32::from(width), u32::from(height));

		group.throughput(Throughput::Bytes(planes.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &planes, |b, planes| {
			b.iter(|| {
				let result = decode_planar_rgba(black_box(planes), w, h, FileType::Sequence);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark a whole mode 2 frame, container parsing included
fn bench_frame_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("frame_decode");
	let context = CodecContext::new(DecodeOptions::lenient());

	for (name, (width, height)) in SIZES {
		let data = generate_rle_frame(width, height);

		group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
		group.bench_with_input(BenchmarkId::new("rle_frame", name), &data, |b, data| {
			b.iter(|| {
				let result = Frame::from_bytes(&context, FrameMode::Flagged, black_box(data))
					.and_then(|frame| frame.decode_pixels(&context));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark standard sequences from bytes to rendered frames
fn bench_sequence_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sequence_decode");
	group.sample_size(50);
	let context = CodecContext::default();

	for frames in [4usize, 16, 64] {
		let data = match generate_standard_sequence(&context, frames, 64, 96) {
			Ok(data) => data,
			Err(e) => {
				eprintln!("Warning: Could not generate a {frames} frame sequence: {e}");
				continue;
			}
		};

		group.throughput(Throughput::Elements(frames as u64));
		group.bench_with_input(BenchmarkId::new("parse", frames), &data, |b, data| {
			b.iter(|| {
				let result = Sequence::from_bytes(&context, SequenceMode::Atlas, black_box(data));
				black_box(result)
			});
		});
		group.bench_with_input(BenchmarkId::new("render", frames), &data, |b, data| {
			b.iter(|| {
				let result = Sequence::from_bytes(&context, SequenceMode::Atlas, black_box(data))
					.and_then(|sequence| sequence.render_frames(&context));
				black_box(result)
			});
		});
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_rle_passes,
	bench_rle_seek_policy,
	bench_planar,
	bench_frame_decode,
	bench_sequence_decode,
);

criterion_main!(benches);
