//! This crate provides the decoders and data types for the `velocity-rs` project.
//!
//! # Formats
//!
//! - **Frame**: single images in three historical container modes
//! - **Sequence**: sprite atlases with a frame-info list, bitmap fonts and embedded-frame
//!   animations of the older titles
//! - **Property list**: the engine's text format for asset metadata and settings
//!
//! Every decoder borrows a [`CodecContext`](context::CodecContext), which owns the property
//! schema registry, the inflater pool, the decode options and the imaging backend.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use velocity_types::prelude::*;
//!
//! # fn main() -> Result<(), VelocityError> {
//! let context = CodecContext::new(DecodeOptions::strict());
//! let sequence = Sequence::open(&context, SequenceMode::Atlas, "title.seq", Some("title.txt"))?;
//! for (index, image) in sequence.render_frames(&context)?.iter().enumerate() {
//!     println!("frame {index}: {}x{}", image.width, image.height);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use velocity_types::context::CodecContext;
//! use velocity_types::file::{Frame, FrameMode};
//!
//! let context = CodecContext::default();
//! let frame = Frame::open(&context, FrameMode::Mode3, "button.frm", None::<&str>);
//! ```

pub mod context;
pub mod file;
pub mod geometry;
pub mod imaging;
pub mod model;
pub mod property;

/// `use velocity_types::prelude::*;` to import commonly used items.
pub mod prelude;
