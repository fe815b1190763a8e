//! Frame access: decode one clip frame into an RGBA pixel buffer.

use clipdeck_container::Clip;
use clipdeck_core::{ClipdeckError, PixelBuffer, Result};

use crate::pool::CodecPool;

/// Decode frame `index` of a clip, composing the frame's color JPEG with the
/// clip's shared greyscale mask as the alpha channel.
///
/// Checks out one codec handle for the duration of the call; the handle goes
/// back to the pool on every path, including decode failures. A malformed
/// frame surfaces `CodecFailure` and leaves the rest of the clip decodable.
pub fn decode_frame(pool: &CodecPool, clip: &Clip, index: usize) -> Result<PixelBuffer> {
    let jpeg = clip.frame_bytes(index)?;
    let mut handle = pool.checkout();

    let (rgb, width, height) = handle
        .decode_rgb(jpeg)
        .map_err(|e| codec_failure(index, e))?;
    if (width, height) != (clip.width, clip.height) {
        return Err(ClipdeckError::CodecFailure {
            frame: index,
            reason: format!(
                "frame decoded to {width}x{height}, clip header says {}x{}",
                clip.width, clip.height
            ),
        });
    }

    let (mask, mask_width, mask_height) = handle
        .decode_luma(&clip.mask)
        .map_err(|e| codec_failure(index, e))?;
    if (mask_width, mask_height) != (clip.width, clip.height) {
        return Err(ClipdeckError::CodecFailure {
            frame: index,
            reason: format!(
                "mask decoded to {mask_width}x{mask_height}, clip is {}x{}",
                clip.width, clip.height
            ),
        });
    }

    let mut out = PixelBuffer::new(clip.width, clip.height);
    for ((dst, src), alpha) in out
        .data
        .chunks_exact_mut(4)
        .zip(rgb.chunks_exact(3))
        .zip(mask.iter())
    {
        dst[..3].copy_from_slice(src);
        dst[3] = *alpha;
    }
    Ok(out)
}

fn codec_failure(frame: usize, source: ClipdeckError) -> ClipdeckError {
    ClipdeckError::CodecFailure {
        frame,
        reason: source.to_string(),
    }
}
