//! Real-time mixer: sums playing sound instances into the render ring.
//!
//! `render` runs on the audio callback thread. Each callback drains the
//! command channel, mixes one callback quantum into the ring at the write
//! cursor, then copies buffered samples from the play cursor to the
//! hardware buffer. Sounds that end naturally are marked during the mix and
//! erased at the start of the following callback.

use crossbeam_channel::{Receiver, Sender};
use tracing::warn;

use crate::playing::{MixerCommand, PlayingSound, PlayingSoundId};
use crate::ring_buffer::RenderBuffer;
use crate::AudioConfig;

/// Mixes playing sounds into mono f32 and feeds the hardware output.
pub struct Mixer {
    sounds: Vec<PlayingSound>,
    /// Instances that ended naturally last callback, erased next drain.
    finished: Vec<PlayingSoundId>,
    ring: RenderBuffer,
    /// Mono mix buffer for the fill step.
    scratch: Vec<f32>,
    /// Mono staging buffer for the output copy.
    staging: Vec<f32>,
    commands: Receiver<MixerCommand>,
    playheads: Sender<(PlayingSoundId, usize)>,
    output_channels: usize,
    master_gain: f32,
    primed: bool,
}

impl Mixer {
    /// Create a mixer wired to a command channel and a playhead listener.
    pub fn new(
        config: &AudioConfig,
        commands: Receiver<MixerCommand>,
        playheads: Sender<(PlayingSoundId, usize)>,
    ) -> Self {
        Self {
            sounds: Vec::with_capacity(32),
            finished: Vec::with_capacity(8),
            ring: RenderBuffer::new(config.ring_capacity),
            scratch: vec![0.0; 4096],
            staging: vec![0.0; 4096],
            commands,
            playheads,
            output_channels: config.output_channels.max(1),
            master_gain: 1.0,
            primed: false,
        }
    }

    /// Number of instances currently being mixed.
    pub fn active_sounds(&self) -> usize {
        self.sounds.len()
    }

    /// Samples buffered ahead of the play cursor.
    pub fn buffered_samples(&self) -> usize {
        self.ring.available_read()
    }

    /// Current master gain.
    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub(crate) fn set_output_channels(&mut self, channels: usize) {
        self.output_channels = channels.max(1);
    }

    /// Render one callback quantum into an interleaved hardware buffer.
    ///
    /// The frame count is `out.len()` divided by the output channel count;
    /// the mono mix is duplicated into every channel of each frame. The
    /// very first render fills the ring twice, building one callback of
    /// lead before the output copy.
    pub fn render(&mut self, out: &mut [f32]) {
        let frames = out.len() / self.output_channels.max(1);

        self.drain_commands();
        if !self.primed {
            self.fill(frames);
            self.primed = true;
        }
        self.fill(frames);
        self.copy_out(out, frames);
        self.publish_playheads();
    }

    /// Apply pending removals and queued commands. Runs only at the
    /// callback boundary, never mid-mix.
    fn drain_commands(&mut self) {
        if !self.finished.is_empty() {
            let Self {
                sounds, finished, ..
            } = self;
            sounds.retain(|s| !finished.contains(&s.id));
            finished.clear();
        }

        while let Ok(command) = self.commands.try_recv() {
            match command {
                MixerCommand::Play(sound) => self.sounds.push(sound),
                MixerCommand::Stop(id) => self.sounds.retain(|s| s.id != id),
                MixerCommand::StopAll => self.sounds.clear(),
                MixerCommand::SetMasterGain(gain) => self.master_gain = gain.clamp(0.0, 1.0),
            }
        }
    }

    /// Mix `frames` samples from every active sound into the ring.
    fn fill(&mut self, frames: usize) {
        if self.scratch.len() < frames {
            self.scratch.resize(frames, 0.0);
        }
        let master = self.master_gain;
        let Self {
            sounds,
            finished,
            scratch,
            ring,
            ..
        } = self;
        let scratch = &mut scratch[..frames];
        scratch.fill(0.0);

        for sound in sounds.iter_mut() {
            // Bounds are enforced here rather than reported; the render
            // path has nowhere to surface an error.
            let end = sound.range.end.min(sound.sound.len());
            let start = sound.range.start.min(end);
            sound.playhead = sound.playhead.max(start).min(end);
            let remaining = end - sound.playhead;

            if remaining >= frames {
                let src = &sound.sound.samples[sound.playhead..sound.playhead + frames];
                for (dst, &s) in scratch.iter_mut().zip(src) {
                    *dst += s as f32 / i16::MAX as f32 * sound.gain;
                }
                sound.playhead += frames;
            } else if sound.looped {
                // Restart from the top next callback; the partial tail is
                // dropped, not played.
                sound.playhead = start;
            } else {
                // The tail is audible through this callback; the instance
                // is erased at the start of the next one.
                let src = &sound.sound.samples[sound.playhead..end];
                for (dst, &s) in scratch.iter_mut().zip(src) {
                    *dst += s as f32 / i16::MAX as f32 * sound.gain;
                }
                sound.playhead = end;
                finished.push(sound.id);
            }
        }

        for s in scratch.iter_mut() {
            *s = (*s * master).clamp(-1.0, 1.0);
        }
        ring.write(scratch);
    }

    /// Copy `frames` buffered samples to the hardware buffer, duplicating
    /// mono into every output channel.
    fn copy_out(&mut self, out: &mut [f32], frames: usize) {
        let channels = self.output_channels.max(1);
        if self.staging.len() < frames {
            self.staging.resize(frames, 0.0);
        }
        let staging = &mut self.staging[..frames];

        let got = self.ring.read(staging);
        if got < frames {
            // Underrun: pad with silence, never replay stale samples.
            staging[got..].fill(0.0);
            warn!("Audio underrun: {} of {} frames buffered", got, frames);
        }

        for (frame, &sample) in staging.iter().enumerate() {
            let base = frame * channels;
            for slot in &mut out[base..base + channels] {
                *slot = sample;
            }
        }
        for slot in &mut out[frames * channels..] {
            *slot = 0.0;
        }
    }

    /// Snapshot playhead positions for the listener side.
    fn publish_playheads(&self) {
        for sound in &self.sounds {
            // Dropped when the listener lags; the render thread never blocks.
            let _ = self.playheads.try_send((sound.id, sound.playhead));
        }
    }
}
