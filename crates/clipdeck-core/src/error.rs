//! Error types for ClipDeck.

use thiserror::Error;

/// Main error type for ClipDeck operations.
#[derive(Error, Debug)]
pub enum ClipdeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    #[error("Frame index {index} out of range (clip has {frame_count} frames)")]
    FrameIndexOutOfRange { index: usize, frame_count: usize },

    #[error("Invalid sample range {start}..{end} (sound has {len} samples)")]
    SampleRangeInvalid {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Codec failure on frame {frame}: {reason}")]
    CodecFailure { frame: usize, reason: String },

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for ClipDeck operations.
pub type Result<T> = std::result::Result<T, ClipdeckError>;
