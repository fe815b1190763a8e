//! ClipDeck Container - Clip storage and the media library
//!
//! Implements the binary clip container (JPEG frame sequences with one
//! shared alpha mask and an in-file seek table), raw PCM sound files with
//! WAV import, and the id-keyed in-memory media store.

pub mod clip;
pub mod format;
pub mod library;
pub mod sound_file;

pub use clip::{Clip, ClipBuilder, ClipId, FrameInfo};
pub use format::{decode, encode, CONTAINER_MAGIC, HEADER_LEN};
pub use library::MediaLibrary;
