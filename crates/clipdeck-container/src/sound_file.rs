//! Sound asset I/O: raw PCM files and WAV import.
//!
//! The native asset format is a bare little-endian 16-bit PCM dump with no
//! header; the sample count is the byte length divided by two. WAV import
//! covers bringing external recordings in.

use std::io::Read;
use std::path::Path;

use clipdeck_core::{ClipdeckError, Result, Sound};
use hound::{SampleFormat, WavReader};

/// Save a sound as a raw little-endian 16-bit PCM file.
pub fn save_raw(sound: &Sound, path: &Path) -> Result<()> {
    std::fs::write(path, sound.to_raw_bytes())?;
    Ok(())
}

/// Load a raw little-endian 16-bit PCM file.
pub fn load_raw(path: &Path) -> Result<Sound> {
    let bytes = std::fs::read(path)?;
    Sound::from_raw_bytes(&bytes)
}

/// Import a WAV file as a mono sound.
///
/// 16-bit integer and 32-bit float sources are accepted; stereo input is
/// averaged down to mono.
pub fn import_wav(path: &Path) -> Result<Sound> {
    let reader =
        WavReader::open(path).map_err(|e| ClipdeckError::Audio(format!("failed to open WAV: {e}")))?;
    import_wav_reader(reader)
}

/// Import WAV data from any reader.
pub fn import_wav_reader<R: Read>(reader: WavReader<R>) -> Result<Sound> {
    let spec = reader.spec();
    if spec.channels == 0 || spec.channels > 2 {
        return Err(ClipdeckError::UnsupportedFormat(format!(
            "{} channel WAV (only mono and stereo are supported)",
            spec.channels
        )));
    }

    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ClipdeckError::Audio(format!("failed to read WAV samples: {e}")))?,
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ClipdeckError::Audio(format!("failed to read WAV samples: {e}")))?,
        (format, bits) => {
            return Err(ClipdeckError::UnsupportedFormat(format!(
                "{bits}-bit {format:?} WAV"
            )))
        }
    };

    Ok(Sound::new(downmix(interleaved, spec.channels as usize)))
}

/// Average interleaved stereo frames down to mono; mono passes through.
fn downmix(samples: Vec<i16>, channels: usize) -> Vec<i16> {
    match channels {
        2 => samples
            .chunks_exact(2)
            .map(|frame| ((frame[0] as i32 + frame[1] as i32) / 2) as i16)
            .collect(),
        _ => samples,
    }
}
