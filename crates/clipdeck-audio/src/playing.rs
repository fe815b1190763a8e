//! Playing sound instances and mixer control messages.

use std::ops::Range;
use std::sync::Arc;

use clipdeck_core::Sound;

/// Identifier for one playing instance of a sound.
///
/// Allocated from a monotonic counter; many instances of the same stored
/// sound can play at once, each with its own id and playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayingSoundId(pub u64);

/// One sound instance being mixed.
#[derive(Debug, Clone)]
pub struct PlayingSound {
    /// Instance id
    pub id: PlayingSoundId,
    /// Shared handle to the stored samples
    pub sound: Arc<Sound>,
    /// Sample range `[start, end)` this instance plays within
    pub range: Range<usize>,
    /// Restart from `range.start` when the range is exhausted
    pub looped: bool,
    /// Next sample to mix, always inside `range`
    pub playhead: usize,
    /// Linear gain in `[0, 1]`
    pub gain: f32,
}

impl PlayingSound {
    /// Create an instance with its playhead at the start of the range.
    ///
    /// The range is clamped into the sound and the gain into `[0, 1]`, so a
    /// constructed instance can always be mixed without bounds failures.
    pub fn new(
        id: PlayingSoundId,
        sound: Arc<Sound>,
        range: Range<usize>,
        looped: bool,
        gain: f32,
    ) -> Self {
        let end = range.end.min(sound.len());
        let start = range.start.min(end);
        Self {
            id,
            sound,
            range: start..end,
            looped,
            playhead: start,
            gain: gain.clamp(0.0, 1.0),
        }
    }

    /// Samples left before the range is exhausted.
    pub fn remaining(&self) -> usize {
        self.range.end.saturating_sub(self.playhead)
    }
}

/// Control messages consumed at the start of each render callback.
///
/// Producers live on control threads; the render thread drains the channel
/// without blocking and never mutates the sound list mid-render.
#[derive(Debug)]
pub enum MixerCommand {
    /// Begin mixing a new instance.
    Play(PlayingSound),
    /// Remove an instance. Takes effect at the next callback boundary.
    Stop(PlayingSoundId),
    /// Remove every instance.
    StopAll,
    /// Replace the master gain.
    SetMasterGain(f32),
}
