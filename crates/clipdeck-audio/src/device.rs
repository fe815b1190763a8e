//! Hardware output: owns the cpal stream that drives the mixer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use tracing::{error, info, warn};

use clipdeck_core::{ClipdeckError, Result};

use crate::mixer::Mixer;
use crate::AudioConfig;

/// Staging frames reserved when the device does not report a buffer size.
const FALLBACK_STAGING_FRAMES: usize = 4096;
/// Upper bound on the staging reservation taken from a device report.
const MAX_STAGING_FRAMES: usize = 32_768;

/// An open output stream. Dropping it stops playback.
pub struct OutputStream {
    _stream: cpal::Stream,
    /// Sample rate the device is actually running at.
    pub sample_rate: u32,
    /// Channel count of the device output.
    pub channels: u16,
}

impl OutputStream {
    /// Open the default output device and start rendering the mixer on its
    /// callback thread. The mixer moves into the stream closure.
    pub fn open(config: &AudioConfig, mut mixer: Mixer) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ClipdeckError::Audio("no output device available".into()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| ClipdeckError::Audio(format!("no default output config: {e}")))?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        mixer.set_output_channels(channels as usize);
        if sample_rate != config.sample_rate {
            warn!(
                "Device runs at {} Hz, sounds are {} Hz; playback speed will differ",
                sample_rate, config.sample_rate
            );
        }

        let staging = staging_len(supported.buffer_size(), channels as usize);
        let stream_config: cpal::StreamConfig = supported.config();
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, mixer, staging)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, mixer, staging)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, mixer, staging)?
            }
            format => {
                return Err(ClipdeckError::Audio(format!(
                    "unsupported sample format '{format}'"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| ClipdeckError::Audio(format!("failed to start stream: {e}")))?;
        info!(
            "Audio output open: {} Hz, {} channels",
            sample_rate, channels
        );

        Ok(Self {
            _stream: stream,
            sample_rate,
            channels,
        })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
    staging_samples: usize,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    // Sized before the stream starts; the callback reallocates only if the
    // device delivers more than it advertised.
    let mut staging: Vec<f32> = vec![0.0; staging_samples];

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if staging.len() < data.len() {
                    staging.resize(data.len(), 0.0);
                }
                let buf = &mut staging[..data.len()];
                mixer.render(buf);
                for (dst, &src) in data.iter_mut().zip(buf.iter()) {
                    *dst = T::from_sample(src);
                }
            },
            |e| error!("Audio stream error: {e}"),
            None,
        )
        .map_err(|e| ClipdeckError::Audio(format!("failed to build stream: {e}")))?;

    Ok(stream)
}

/// Interleaved staging length for the callback buffer, taken from the
/// device's reported buffer bounds.
fn staging_len(buffer_size: &cpal::SupportedBufferSize, channels: usize) -> usize {
    let frames = match *buffer_size {
        cpal::SupportedBufferSize::Range { max, .. } => (max as usize).min(MAX_STAGING_FRAMES),
        cpal::SupportedBufferSize::Unknown => FALLBACK_STAGING_FRAMES,
    };
    frames * channels.max(1)
}
