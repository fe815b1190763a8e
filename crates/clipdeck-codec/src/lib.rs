//! ClipDeck Codec - JPEG codec pool and frame access
//!
//! A fixed pool of reusable codec handles bounds concurrent JPEG work:
//! `checkout` blocks until a handle is free, and the RAII guard returns it
//! on drop. On top of the pool sit the frame access layer (decode one clip
//! frame plus the shared mask into RGBA) and the recording path (append
//! frames one at a time).

pub mod frames;
pub mod jpeg;
pub mod pool;
pub mod record;

pub use frames::decode_frame;
pub use jpeg::{CodecHandle, DEFAULT_QUALITY};
pub use pool::{CodecPool, PooledHandle, DEFAULT_POOL_SIZE};
pub use record::ClipRecorder;
