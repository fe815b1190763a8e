//! Stateful JPEG codec handles.
//!
//! A handle owns its encode quality and reusable scratch buffers, so repeated
//! encodes on one handle avoid reallocating the RGB conversion and output
//! buffers. Handles are not shareable; the pool hands them out one owner at
//! a time.

use clipdeck_core::{ClipdeckError, PixelBuffer, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};

/// Default JPEG encode quality for recorded frames.
pub const DEFAULT_QUALITY: u8 = 80;

/// A reusable JPEG encode/decode resource.
#[derive(Debug, Default)]
pub struct CodecHandle {
    id: usize,
    quality: u8,
    rgb_scratch: Vec<u8>,
    jpeg_scratch: Vec<u8>,
}

impl CodecHandle {
    pub(crate) fn new(id: usize, quality: u8) -> Self {
        Self {
            id,
            quality,
            rgb_scratch: Vec::new(),
            jpeg_scratch: Vec::new(),
        }
    }

    /// Pool slot id, stable for the handle's lifetime.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Encode quality this handle writes with.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode an RGBA buffer as a color JPEG, dropping the alpha channel.
    pub fn encode_rgb(&mut self, pixels: &PixelBuffer) -> Result<Vec<u8>> {
        self.rgb_scratch.clear();
        self.rgb_scratch.reserve(pixels.data.len() / 4 * 3);
        for px in pixels.data.chunks_exact(4) {
            self.rgb_scratch.extend_from_slice(&px[..3]);
        }

        self.jpeg_scratch.clear();
        let mut encoder = JpegEncoder::new_with_quality(&mut self.jpeg_scratch, self.quality);
        encoder
            .encode(
                &self.rgb_scratch,
                pixels.width,
                pixels.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ClipdeckError::Encoder(format!("JPEG encode failed: {e}")))?;
        Ok(self.jpeg_scratch.clone())
    }

    /// Encode an 8-bit greyscale buffer as a luma JPEG.
    pub fn encode_luma(&mut self, luma: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        if luma.len() != width as usize * height as usize {
            return Err(ClipdeckError::Encoder(format!(
                "luma buffer is {} bytes, {width}x{height} needs {}",
                luma.len(),
                width as usize * height as usize
            )));
        }
        self.jpeg_scratch.clear();
        let mut encoder = JpegEncoder::new_with_quality(&mut self.jpeg_scratch, self.quality);
        encoder
            .encode(luma, width, height, ExtendedColorType::L8)
            .map_err(|e| ClipdeckError::Encoder(format!("JPEG encode failed: {e}")))?;
        Ok(self.jpeg_scratch.clone())
    }

    /// Decode a color JPEG into tightly packed RGB bytes.
    pub fn decode_rgb(&mut self, jpeg: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
        let dynamic = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
            .map_err(|e| ClipdeckError::Decoder(format!("JPEG decode failed: {e}")))?;
        let rgb = dynamic.into_rgb8();
        let (width, height) = rgb.dimensions();
        Ok((rgb.into_raw(), width, height))
    }

    /// Decode a greyscale JPEG into 8-bit luma bytes.
    pub fn decode_luma(&mut self, jpeg: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
        let dynamic = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
            .map_err(|e| ClipdeckError::Decoder(format!("JPEG decode failed: {e}")))?;
        let luma = dynamic.into_luma8();
        let (width, height) = luma.dimensions();
        Ok((luma.into_raw(), width, height))
    }
}
