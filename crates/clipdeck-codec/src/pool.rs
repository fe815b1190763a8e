//! Bounded blocking pool of codec handles.
//!
//! One structure owns the idle handles and the wakeup logic: `checkout`
//! blocks while the pool is empty and returns an RAII guard, and dropping
//! the guard checks the handle back in and wakes one waiter. A handle is
//! exclusively owned between checkout and checkin.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::jpeg::{CodecHandle, DEFAULT_QUALITY};

/// Default number of codec handles in a pool.
pub const DEFAULT_POOL_SIZE: usize = 10;

struct PoolInner {
    idle: Mutex<Vec<CodecHandle>>,
    available: Condvar,
}

/// Fixed-size pool of JPEG codec handles shared by decode and encode work.
///
/// Cloning the pool clones a reference to the same handles.
#[derive(Clone)]
pub struct CodecPool {
    inner: Arc<PoolInner>,
    size: usize,
}

impl CodecPool {
    /// Create a pool of `size` handles with the default encode quality.
    pub fn new(size: usize) -> Self {
        Self::with_quality(size, DEFAULT_QUALITY)
    }

    /// Create a pool of `size` handles writing JPEGs at `quality`.
    pub fn with_quality(size: usize, quality: u8) -> Self {
        let idle = (0..size).map(|id| CodecHandle::new(id, quality)).collect();
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(idle),
                available: Condvar::new(),
            }),
            size,
        }
    }

    /// Total number of handles owned by the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Handles currently checked in.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().len()
    }

    /// Take exclusive ownership of a handle, blocking until one is free.
    ///
    /// Waiting on a busy pool is the intended backpressure, not an error.
    pub fn checkout(&self) -> PooledHandle {
        let mut idle = self.inner.idle.lock();
        loop {
            if let Some(handle) = idle.pop() {
                debug!("Checked out codec handle {}", handle.id());
                return PooledHandle {
                    handle,
                    pool: Arc::clone(&self.inner),
                };
            }
            self.inner.available.wait(&mut idle);
        }
    }
}

impl Default for CodecPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

impl std::fmt::Debug for CodecPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecPool")
            .field("size", &self.size)
            .field("idle", &self.idle_count())
            .finish()
    }
}

/// RAII checkout guard. Dereferences to the codec handle; dropping it
/// returns the handle to the pool and wakes one waiter, on every exit path.
pub struct PooledHandle {
    handle: CodecHandle,
    pool: Arc<PoolInner>,
}

impl Deref for PooledHandle {
    type Target = CodecHandle;

    fn deref(&self) -> &CodecHandle {
        &self.handle
    }
}

impl DerefMut for PooledHandle {
    fn deref_mut(&mut self) -> &mut CodecHandle {
        &mut self.handle
    }
}

impl Drop for PooledHandle {
    fn drop(&mut self) {
        let handle = std::mem::take(&mut self.handle);
        debug!("Checked in codec handle {}", handle.id());
        let mut idle = self.pool.idle.lock();
        idle.push(handle);
        self.pool.available.notify_one();
    }
}
