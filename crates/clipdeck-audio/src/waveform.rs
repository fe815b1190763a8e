//! Waveform computation for audio visualization.
//!
//! Reduces stored i16 sample data to min/max pairs for display at a given
//! zoom level.

use serde::{Deserialize, Serialize};

/// A min/max pair representing the amplitude range at a pixel position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WaveformSample {
    pub min: f32,
    pub max: f32,
}

/// Pre-computed waveform data for a mono sound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    /// Samples per waveform pixel (the reduction ratio).
    pub samples_per_pixel: usize,
    /// Min/max pairs for display, normalized to [-1, 1].
    pub data: Vec<WaveformSample>,
    /// Source sample rate.
    pub sample_rate: u32,
}

impl Waveform {
    /// Compute a waveform from raw i16 samples, normalizing each to f32
    /// on the way through.
    pub fn compute(samples: &[i16], samples_per_pixel: usize, sample_rate: u32) -> Self {
        if samples_per_pixel == 0 || samples.is_empty() {
            return Self {
                samples_per_pixel: samples_per_pixel.max(1),
                data: Vec::new(),
                sample_rate,
            };
        }

        let num_pixels = samples.len().div_ceil(samples_per_pixel);
        let mut data = Vec::with_capacity(num_pixels);

        for chunk in samples.chunks(samples_per_pixel) {
            let mut min = f32::MAX;
            let mut max = f32::MIN;
            for &raw in chunk {
                let s = raw as f32 / i16::MAX as f32;
                if s < min {
                    min = s;
                }
                if s > max {
                    max = s;
                }
            }
            data.push(WaveformSample { min, max });
        }

        Self {
            samples_per_pixel,
            data,
            sample_rate,
        }
    }

    /// Get the RMS energy for a range of pixels.
    pub fn rms_range(&self, start_pixel: usize, end_pixel: usize) -> f32 {
        let start = start_pixel.min(self.data.len());
        let end = end_pixel.min(self.data.len());
        if start >= end {
            return 0.0;
        }

        let mut sum = 0.0f64;
        for sample in &self.data[start..end] {
            let peak = sample.max.abs().max(sample.min.abs()) as f64;
            sum += peak * peak;
        }
        let count = (end - start) as f64;
        (sum / count).sqrt() as f32
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.data.len() * self.samples_per_pixel) as f64 / self.sample_rate as f64
    }
}
