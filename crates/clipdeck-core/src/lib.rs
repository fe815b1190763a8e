//! ClipDeck Core - Foundation types for the media engine
//!
//! This crate provides the fundamental types used throughout ClipDeck:
//! - Error taxonomy and `Result` alias
//! - RGBA pixel buffers for decoded frames
//! - PCM sound assets with bounds-checked sample access

pub mod error;
pub mod pixels;
pub mod sound;

pub use error::{ClipdeckError, Result};
pub use pixels::PixelBuffer;
pub use sound::{Sound, SoundId, BYTES_PER_SAMPLE};
