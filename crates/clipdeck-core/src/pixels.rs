//! RGBA pixel buffers for decoded frames in CPU memory.

/// A decoded video frame: tightly packed 8-bit RGBA.
///
/// Rows are `width * 4` bytes with no padding, so the buffer can be handed
/// to image codecs without a repacking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGBA pixel data, `width * height * 4` bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes needed for a frame of the given dimensions.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    /// Create a zeroed (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; Self::byte_len(width, height)],
        }
    }

    /// Create a buffer filled with a single RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        for px in buffer.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        buffer
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let mut buffer = Self::new(width, height);
        for y in 0..height {
            let row = buffer.row_mut(y);
            for x in 0..width {
                let i = (x * 4) as usize;
                // Color bars pattern (8 bars)
                let bar = (x * 8 / width) as u8;
                let colors: [[u8; 4]; 8] = [
                    [255, 255, 255, 255], // White
                    [255, 255, 0, 255],   // Yellow
                    [0, 255, 255, 255],   // Cyan
                    [0, 255, 0, 255],     // Green
                    [255, 0, 255, 255],   // Magenta
                    [255, 0, 0, 255],     // Red
                    [0, 0, 255, 255],     // Blue
                    [0, 0, 0, 255],       // Black
                ];
                row[i..i + 4].copy_from_slice(&colors[bar as usize]);
            }
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size() {
        let buffer = PixelBuffer::new(320, 240);
        assert_eq!(buffer.data.len(), 320 * 240 * 4);
    }

    #[test]
    fn test_solid_fill() {
        let buffer = PixelBuffer::solid(8, 8, [10, 20, 30, 40]);
        assert_eq!(buffer.row(3)[4..8], [10, 20, 30, 40]);
    }

    #[test]
    fn test_test_pattern() {
        let buffer = PixelBuffer::test_pattern(640, 480);
        assert_eq!(buffer.width, 640);
        assert_eq!(buffer.height, 480);

        // First bar is white, last bar is black
        assert_eq!(buffer.row(0)[0..4], [255, 255, 255, 255]);
        let last = (640 - 1) * 4;
        assert_eq!(buffer.row(0)[last..last + 4], [0, 0, 0, 255]);
    }
}
