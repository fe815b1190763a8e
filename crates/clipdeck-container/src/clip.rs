//! Clip data model: JPEG frame sequences sharing one alpha mask.

use clipdeck_core::{ClipdeckError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of one frame's JPEG data inside the clip payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Byte offset into the payload
    pub offset: u32,
    /// Length of the frame's JPEG data in bytes
    pub length: u32,
}

/// A video clip: per-frame JPEG data in one contiguous payload, plus one
/// greyscale JPEG mask shared by every frame.
///
/// Frame entries tile the payload exactly: `frames[i].offset +
/// frames[i].length == frames[i + 1].offset`, and the last entry ends at
/// `payload.len()`. Frame content is immutable once the clip is built.
#[derive(Debug, Clone)]
pub struct Clip {
    /// Unique clip ID (assigned at build/load time, not stored in the file)
    pub id: ClipId,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Per-frame payload locations, in presentation order
    pub frames: Vec<FrameInfo>,
    /// Shared greyscale JPEG alpha mask
    pub mask: Vec<u8>,
    /// Concatenated per-frame JPEG data
    pub payload: Vec<u8>,
}

impl Clip {
    /// Number of frames in the clip.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Borrow the JPEG bytes of one frame.
    pub fn frame_bytes(&self, index: usize) -> Result<&[u8]> {
        let info = self
            .frames
            .get(index)
            .ok_or(ClipdeckError::FrameIndexOutOfRange {
                index,
                frame_count: self.frames.len(),
            })?;
        let start = info.offset as usize;
        let end = start + info.length as usize;
        self.payload.get(start..end).ok_or_else(|| {
            ClipdeckError::CorruptContainer(format!(
                "frame {} spans {}..{} beyond payload of {} bytes",
                index,
                start,
                end,
                self.payload.len()
            ))
        })
    }
}

/// Incremental clip construction for the recording path.
///
/// Frames are appended one at a time; the payload stays contiguous and the
/// offset table is maintained as frames arrive.
#[derive(Debug)]
pub struct ClipBuilder {
    width: u32,
    height: u32,
    frames: Vec<FrameInfo>,
    payload: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl ClipBuilder {
    /// Start a clip with fixed frame dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            payload: Vec::new(),
            mask: None,
        }
    }

    /// Frames appended so far.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Append one frame's JPEG data.
    pub fn push_frame(&mut self, jpeg: &[u8]) -> Result<()> {
        if jpeg.is_empty() {
            return Err(ClipdeckError::CorruptContainer(
                "zero-length frame data".into(),
            ));
        }
        let offset = self.payload.len();
        if offset as u64 + jpeg.len() as u64 > u32::MAX as u64 {
            return Err(ClipdeckError::CorruptContainer(
                "payload exceeds 4 GiB container limit".into(),
            ));
        }
        self.frames.push(FrameInfo {
            offset: offset as u32,
            length: jpeg.len() as u32,
        });
        self.payload.extend_from_slice(jpeg);
        Ok(())
    }

    /// Set the shared greyscale JPEG mask. Replaces any previous mask.
    /// The container's 4 GiB field limits are checked at encode time.
    pub fn set_mask(&mut self, jpeg: Vec<u8>) {
        self.mask = Some(jpeg);
    }

    /// True once a mask has been set.
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Finish the clip, assigning a fresh id.
    pub fn finish(self) -> Clip {
        Clip {
            id: ClipId::new(),
            width: self.width,
            height: self.height,
            frames: self.frames,
            mask: self.mask.unwrap_or_default(),
            payload: self.payload,
        }
    }
}
