//! ClipDeck Audio - Real-time sound playback
//!
//! Mixes playing sound instances into a render ring and feeds the default
//! output device.
//!
//! Architecture:
//! - `RenderBuffer`: Ring of mixed mono samples owned by the render thread
//! - `PlayingSound`: One playback instance (source, range, loop flag, gain)
//! - `Mixer`: Sums active instances per callback and applies master gain
//! - `OutputStream`: cpal stream running the mixer on the device thread
//! - `AudioEngine`: Command-channel front end the rest of the app talks to

pub mod device;
pub mod mixer;
pub mod playing;
pub mod ring_buffer;
pub mod waveform;

pub use device::OutputStream;
pub use mixer::Mixer;
pub use playing::{MixerCommand, PlayingSound, PlayingSoundId};
pub use ring_buffer::RenderBuffer;
pub use waveform::{Waveform, WaveformSample};

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::info;

use clipdeck_core::{ClipdeckError, Result, Sound};

/// Audio engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate the stored sounds were recorded at.
    pub sample_rate: u32,
    /// Output channel count used until a device reports its own.
    pub output_channels: usize,
    /// Render ring capacity in samples.
    pub ring_capacity: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            output_channels: 2,
            ring_capacity: 16_384,
        }
    }
}

/// Top-level audio orchestrator.
///
/// Owns the command channel into the mixer. Before `start` the mixer lives
/// here and can be driven with `render_offline`; after `start` it lives on
/// the device callback thread and is reachable only through commands.
pub struct AudioEngine {
    config: AudioConfig,
    commands: Sender<MixerCommand>,
    playheads: Receiver<(PlayingSoundId, usize)>,
    mixer: Option<Mixer>,
    stream: Option<OutputStream>,
    next_id: AtomicU64,
}

fn build_pipeline(
    config: &AudioConfig,
) -> (
    Sender<MixerCommand>,
    Receiver<(PlayingSoundId, usize)>,
    Mixer,
) {
    let (command_tx, command_rx) = unbounded();
    // Playhead updates are best-effort; a small bound keeps the render
    // thread from queueing unread snapshots forever.
    let (playhead_tx, playhead_rx) = bounded(64);
    let mixer = Mixer::new(config, command_rx, playhead_tx);
    (command_tx, playhead_rx, mixer)
}

impl AudioEngine {
    /// Create a new audio engine.
    pub fn new(config: AudioConfig) -> Self {
        info!("Initializing audio engine");
        let (commands, playheads, mixer) = build_pipeline(&config);
        Self {
            config,
            commands,
            playheads,
            mixer: Some(mixer),
            stream: None,
            next_id: AtomicU64::new(1),
        }
    }

    /// Open the default output device and hand the mixer to its callback
    /// thread. Errors if playback is already running. A failed open
    /// rebuilds the channels, so playhead receivers taken earlier go dead.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(ClipdeckError::Audio("engine already started".into()));
        }
        let mixer = self
            .mixer
            .take()
            .ok_or_else(|| ClipdeckError::Audio("mixer unavailable".into()))?;

        match OutputStream::open(&self.config, mixer) {
            Ok(stream) => {
                info!("Audio playback started");
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                // The mixer moved into the failed open. Rebuild the
                // pipeline so the engine can be started again.
                let (commands, playheads, mixer) = build_pipeline(&self.config);
                self.commands = commands;
                self.playheads = playheads;
                self.mixer = Some(mixer);
                Err(e)
            }
        }
    }

    /// Stop playback and reset to the initial state. The engine can be
    /// started again afterwards.
    ///
    /// The command and playhead channels are rebuilt: receivers taken from
    /// `playhead_updates` before this call go dead and listeners must
    /// re-subscribe.
    pub fn shutdown(&mut self) {
        let _ = self.commands.send(MixerCommand::StopAll);
        self.stream = None;
        let (commands, playheads, mixer) = build_pipeline(&self.config);
        self.commands = commands;
        self.playheads = playheads;
        self.mixer = Some(mixer);
        info!("Audio engine shut down");
    }

    /// Queue a sound for playback over `range` (sample indices into the
    /// sound). Returns the instance id used for stops and playhead lookups.
    pub fn play_sound(
        &self,
        sound: &Arc<Sound>,
        range: Range<usize>,
        looped: bool,
        gain: f32,
    ) -> Result<PlayingSoundId> {
        if range.start >= range.end || range.end > sound.len() {
            return Err(ClipdeckError::SampleRangeInvalid {
                start: range.start,
                end: range.end,
                len: sound.len(),
            });
        }
        let id = PlayingSoundId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let playing = PlayingSound::new(id, Arc::clone(sound), range, looped, gain);
        self.commands
            .send(MixerCommand::Play(playing))
            .map_err(|_| ClipdeckError::Audio("mixer channel closed".into()))?;
        Ok(id)
    }

    /// Stop one playing instance at the next callback boundary.
    pub fn stop_sound(&self, id: PlayingSoundId) -> Result<()> {
        self.commands
            .send(MixerCommand::Stop(id))
            .map_err(|_| ClipdeckError::Audio("mixer channel closed".into()))
    }

    /// Stop every playing instance at the next callback boundary.
    pub fn stop_all(&self) -> Result<()> {
        self.commands
            .send(MixerCommand::StopAll)
            .map_err(|_| ClipdeckError::Audio("mixer channel closed".into()))
    }

    /// Set the master gain, clamped to [0, 1] on the mixer side.
    pub fn set_master_gain(&self, gain: f32) -> Result<()> {
        self.commands
            .send(MixerCommand::SetMasterGain(gain))
            .map_err(|_| ClipdeckError::Audio("mixer channel closed".into()))
    }

    /// Channel of (instance, playhead) snapshots published each callback.
    /// The receiver goes dead when `shutdown` or a failed `start` rebuilds
    /// the pipeline; call again for a live one.
    pub fn playhead_updates(&self) -> Receiver<(PlayingSoundId, usize)> {
        self.playheads.clone()
    }

    /// Drive the mixer directly without a device. Available until `start`
    /// hands the mixer to a stream; used by tests and offline rendering.
    pub fn render_offline(&mut self, out: &mut [f32]) -> Result<()> {
        match self.mixer.as_mut() {
            Some(mixer) => {
                mixer.render(out);
                Ok(())
            }
            None => Err(ClipdeckError::Audio(
                "engine is driving a live stream".into(),
            )),
        }
    }

    /// Sample rate in effect: the device's once open, else the configured one.
    pub fn sample_rate(&self) -> u32 {
        self.stream
            .as_ref()
            .map(|s| s.sample_rate)
            .unwrap_or(self.config.sample_rate)
    }

    /// Output channel count in effect.
    pub fn channels(&self) -> usize {
        self.stream
            .as_ref()
            .map(|s| s.channels as usize)
            .unwrap_or(self.config.output_channels)
    }

    /// Whether a device stream is running.
    pub fn is_started(&self) -> bool {
        self.stream.is_some()
    }

    /// Engine configuration.
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new(AudioConfig::default())
    }
}
