//! In-memory media store keyed by id.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use clipdeck_core::{ClipdeckError, Result, Sound, SoundId};
use tracing::info;

use crate::clip::{Clip, ClipId};
use crate::{format, sound_file};

/// Owner of loaded media assets.
///
/// Clips and sounds are held behind `Arc` so decode and playback paths can
/// share payloads without copying. Removing an entry drops the library's
/// reference; outstanding handles keep the payload alive.
#[derive(Debug, Default)]
pub struct MediaLibrary {
    clips: HashMap<ClipId, Arc<Clip>>,
    sounds: HashMap<SoundId, Arc<Sound>>,
}

impl MediaLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Clips ──

    /// Take ownership of a clip, returning its id.
    pub fn insert_clip(&mut self, clip: Clip) -> ClipId {
        let id = clip.id;
        self.clips.insert(id, Arc::new(clip));
        id
    }

    /// Shared handle to a clip.
    pub fn clip(&self, id: ClipId) -> Option<Arc<Clip>> {
        self.clips.get(&id).cloned()
    }

    /// Remove a clip from the library.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Arc<Clip>> {
        self.clips.remove(&id)
    }

    /// Ids of all stored clips.
    pub fn clip_ids(&self) -> Vec<ClipId> {
        self.clips.keys().copied().collect()
    }

    /// Number of stored clips.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Load a clip container file into the library.
    pub fn load_clip(&mut self, path: &Path) -> Result<ClipId> {
        let clip = format::load_from_file(path)?;
        info!(
            "Loaded clip from {}: {} frames, {}x{}",
            path.display(),
            clip.frame_count(),
            clip.width,
            clip.height
        );
        Ok(self.insert_clip(clip))
    }

    /// Write a stored clip to a container file.
    pub fn save_clip(&self, id: ClipId, path: &Path) -> Result<()> {
        let clip = self
            .clip(id)
            .ok_or_else(|| ClipdeckError::NotFound(format!("clip {}", id.0)))?;
        format::save_to_file(&clip, path)?;
        info!(
            "Saved clip to {}: {} frames",
            path.display(),
            clip.frame_count()
        );
        Ok(())
    }

    // ── Sounds ──

    /// Take ownership of a sound, returning its id.
    pub fn insert_sound(&mut self, sound: Sound) -> SoundId {
        let id = sound.id;
        self.sounds.insert(id, Arc::new(sound));
        id
    }

    /// Shared handle to a sound.
    pub fn sound(&self, id: SoundId) -> Option<Arc<Sound>> {
        self.sounds.get(&id).cloned()
    }

    /// Remove a sound from the library.
    pub fn remove_sound(&mut self, id: SoundId) -> Option<Arc<Sound>> {
        self.sounds.remove(&id)
    }

    /// Ids of all stored sounds.
    pub fn sound_ids(&self) -> Vec<SoundId> {
        self.sounds.keys().copied().collect()
    }

    /// Number of stored sounds.
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Load a raw PCM file into the library.
    pub fn load_sound(&mut self, path: &Path) -> Result<SoundId> {
        let sound = sound_file::load_raw(path)?;
        info!(
            "Loaded sound from {}: {} samples",
            path.display(),
            sound.len()
        );
        Ok(self.insert_sound(sound))
    }

    /// Write a stored sound to a raw PCM file.
    pub fn save_sound(&self, id: SoundId, path: &Path) -> Result<()> {
        let sound = self
            .sound(id)
            .ok_or_else(|| ClipdeckError::NotFound(format!("sound {}", id.0)))?;
        sound_file::save_raw(&sound, path)?;
        info!(
            "Saved sound to {}: {} samples",
            path.display(),
            sound.len()
        );
        Ok(())
    }

    /// Import a WAV file into the library as a mono sound.
    pub fn import_wav(&mut self, path: &Path) -> Result<SoundId> {
        let sound = sound_file::import_wav(path)?;
        info!(
            "Imported WAV from {}: {} samples",
            path.display(),
            sound.len()
        );
        Ok(self.insert_sound(sound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipBuilder;

    fn small_clip() -> Clip {
        let mut builder = ClipBuilder::new(8, 8);
        builder.push_frame(&[1, 2, 3]).unwrap();
        builder.set_mask(vec![9; 4]);
        builder.finish()
    }

    #[test]
    fn test_insert_and_fetch_clip() {
        let mut library = MediaLibrary::new();
        let id = library.insert_clip(small_clip());

        let a = library.clip(id).unwrap();
        let b = library.clip(id).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(library.clip_count(), 1);
    }

    #[test]
    fn test_remove_keeps_outstanding_handles_alive() {
        let mut library = MediaLibrary::new();
        let id = library.insert_clip(small_clip());

        let handle = library.clip(id).unwrap();
        library.remove_clip(id);
        assert!(library.clip(id).is_none());
        assert_eq!(handle.frame_count(), 1);
    }

    #[test]
    fn test_insert_and_fetch_sound() {
        let mut library = MediaLibrary::new();
        let id = library.insert_sound(Sound::new(vec![5; 10]));
        assert_eq!(library.sound(id).unwrap().len(), 10);
    }

    #[test]
    fn test_save_missing_clip_is_not_found() {
        let library = MediaLibrary::new();
        let result = library.save_clip(ClipId::new(), Path::new("missing.clip"));
        assert!(matches!(result, Err(ClipdeckError::NotFound(_))));
    }
}
