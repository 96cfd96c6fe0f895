#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `velocity-rs` reads the asset formats of the Velocity Engine: frames, sprite sequences,
//! bitmap fonts and the property lists that describe them.
//!
pub use velocity_types::*;
