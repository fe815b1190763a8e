//! Clip recording: append frames one at a time, encoding through the pool.

use clipdeck_container::{Clip, ClipBuilder};
use clipdeck_core::{ClipdeckError, PixelBuffer, Result};
use tracing::info;

use crate::pool::CodecPool;

/// Builds a clip by encoding frames as they arrive.
///
/// Each appended frame is JPEG-compressed through a pooled codec handle and
/// lands at the end of the contiguous payload. The shared mask may be set at
/// any point before `finish`; a clip recorded without one gets a fully
/// opaque mask so every stored clip composes RGBA the same way.
#[derive(Debug)]
pub struct ClipRecorder {
    pool: CodecPool,
    builder: ClipBuilder,
    width: u32,
    height: u32,
}

impl ClipRecorder {
    /// Start recording a clip with fixed frame dimensions.
    pub fn new(pool: CodecPool, width: u32, height: u32) -> Self {
        Self {
            pool,
            builder: ClipBuilder::new(width, height),
            width,
            height,
        }
    }

    /// Frames recorded so far.
    pub fn frame_count(&self) -> usize {
        self.builder.frame_count()
    }

    /// Encode and append one frame.
    pub fn append_frame(&mut self, pixels: &PixelBuffer) -> Result<()> {
        let index = self.builder.frame_count();
        if (pixels.width, pixels.height) != (self.width, self.height) {
            return Err(ClipdeckError::CodecFailure {
                frame: index,
                reason: format!(
                    "frame is {}x{}, recorder expects {}x{}",
                    pixels.width, pixels.height, self.width, self.height
                ),
            });
        }

        let jpeg = {
            let mut handle = self.pool.checkout();
            handle.encode_rgb(pixels)
        }
        .map_err(|e| ClipdeckError::CodecFailure {
            frame: index,
            reason: e.to_string(),
        })?;
        self.builder.push_frame(&jpeg)
    }

    /// Encode and set the shared greyscale mask from raw luma bytes.
    pub fn set_mask(&mut self, luma: &[u8]) -> Result<()> {
        let jpeg = {
            let mut handle = self.pool.checkout();
            handle.encode_luma(luma, self.width, self.height)
        }?;
        self.builder.set_mask(jpeg);
        Ok(())
    }

    /// Finish the clip.
    ///
    /// Synthesizes an opaque mask when none was recorded.
    pub fn finish(mut self) -> Result<Clip> {
        if !self.builder.has_mask() {
            let opaque = vec![0xFF; self.width as usize * self.height as usize];
            let jpeg = {
                let mut handle = self.pool.checkout();
                handle.encode_luma(&opaque, self.width, self.height)
            }?;
            self.builder.set_mask(jpeg);
        }
        let clip = self.builder.finish();
        info!(
            "Recorded clip: {} frames, {}x{}, {} byte payload",
            clip.frame_count(),
            clip.width,
            clip.height,
            clip.payload.len()
        );
        Ok(clip)
    }
}
