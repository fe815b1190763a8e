//! Binary clip container encode/decode.
//!
//! Layout, little-endian with all fields 4-byte aligned: an 8-word header
//! (magic, frame count, width, height, mask offset/length, payload
//! offset/length), one u32 payload-relative offset per frame, the mask
//! bytes, then the JPEG payload. Frame lengths are not stored; they are
//! reconstructed from consecutive offsets on read.

use clipdeck_core::{ClipdeckError, Result};

use crate::clip::{Clip, ClipId, FrameInfo};

/// Magic number identifying a clip container.
pub const CONTAINER_MAGIC: u32 = 0x000F_1DE0;

/// Fixed header size in bytes (8 little-endian u32 words).
pub const HEADER_LEN: usize = 32;

/// Encode a clip into the container byte format.
///
/// Fails when the frame table, mask, or payload would push a header field
/// past the u32 range the format stores.
pub fn encode(clip: &Clip) -> Result<Vec<u8>> {
    let (mask_offset, payload_offset) =
        header_layout(clip.frames.len(), clip.mask.len(), clip.payload.len())?;

    let mut out = Vec::with_capacity(payload_offset as usize + clip.payload.len());
    for word in [
        CONTAINER_MAGIC,
        clip.frames.len() as u32,
        clip.width,
        clip.height,
        mask_offset,
        clip.mask.len() as u32,
        payload_offset,
        clip.payload.len() as u32,
    ] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    for frame in &clip.frames {
        out.extend_from_slice(&frame.offset.to_le_bytes());
    }
    out.extend_from_slice(&clip.mask);
    out.extend_from_slice(&clip.payload);
    Ok(out)
}

/// Decode a container, validating the header and the frame offset table.
pub fn decode(bytes: &[u8]) -> Result<Clip> {
    let magic = read_u32(bytes, 0)?;
    if magic != CONTAINER_MAGIC {
        return Err(ClipdeckError::CorruptContainer(format!(
            "bad magic 0x{magic:08X}, expected 0x{CONTAINER_MAGIC:08X}"
        )));
    }
    let frame_count = read_u32(bytes, 4)? as usize;
    let width = read_u32(bytes, 8)?;
    let height = read_u32(bytes, 12)?;
    let mask_offset = read_u32(bytes, 16)?;
    let mask_length = read_u32(bytes, 20)?;
    let payload_offset = read_u32(bytes, 24)?;
    let payload_length = read_u32(bytes, 28)?;

    // Bound the offset table before allocating for it.
    let table_end = HEADER_LEN as u64 + frame_count as u64 * 4;
    if table_end > bytes.len() as u64 {
        return Err(ClipdeckError::CorruptContainer(format!(
            "offset table for {frame_count} frames exceeds {} byte input",
            bytes.len()
        )));
    }
    let mut offsets = Vec::with_capacity(frame_count);
    for i in 0..frame_count {
        offsets.push(read_u32(bytes, HEADER_LEN + i * 4)?);
    }

    let mask = slice_region(bytes, mask_offset, mask_length, "mask")?.to_vec();
    let payload = slice_region(bytes, payload_offset, payload_length, "payload")?.to_vec();

    // Each frame's length is the gap to the next offset; the last frame
    // runs to the end of the payload. Entries are resolved strictly in
    // order since each depends on its successor.
    let mut frames = Vec::with_capacity(frame_count);
    for (i, &offset) in offsets.iter().enumerate() {
        let next = match offsets.get(i + 1) {
            Some(&next) => next,
            None => payload_length,
        };
        if offset >= next {
            return Err(ClipdeckError::CorruptContainer(format!(
                "frame {i} offset {offset} not below next boundary {next}"
            )));
        }
        frames.push(FrameInfo {
            offset,
            length: next - offset,
        });
    }

    Ok(Clip {
        id: ClipId::new(),
        width,
        height,
        frames,
        mask,
        payload,
    })
}

/// Write a clip container to a file.
pub fn save_to_file(clip: &Clip, path: &std::path::Path) -> Result<()> {
    std::fs::write(path, encode(clip)?)?;
    Ok(())
}

/// Read a clip container from a file.
pub fn load_from_file(path: &std::path::Path) -> Result<Clip> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Resolve the mask and payload offsets, rejecting clips whose regions do
/// not fit the header's u32 words.
fn header_layout(frame_count: usize, mask_len: usize, payload_len: usize) -> Result<(u32, u32)> {
    let mask_offset = HEADER_LEN as u64 + frame_count as u64 * 4;
    let payload_offset = mask_offset + mask_len as u64;
    if payload_offset > u32::MAX as u64 || payload_len as u64 > u32::MAX as u64 {
        return Err(ClipdeckError::CorruptContainer(
            "clip exceeds 4 GiB container limit".into(),
        ));
    }
    Ok((mask_offset as u32, payload_offset as u32))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32> {
    match bytes.get(at..at + 4) {
        Some(word) => Ok(u32::from_le_bytes([word[0], word[1], word[2], word[3]])),
        None => Err(ClipdeckError::CorruptContainer(format!(
            "truncated at byte {at}"
        ))),
    }
}

fn slice_region<'a>(bytes: &'a [u8], offset: u32, length: u32, what: &str) -> Result<&'a [u8]> {
    let start = offset as u64;
    let end = start + length as u64;
    if end > bytes.len() as u64 {
        return Err(ClipdeckError::CorruptContainer(format!(
            "{what} region {start}..{end} exceeds {} byte input",
            bytes.len()
        )));
    }
    Ok(&bytes[start as usize..end as usize])
}
