//! Fixed-size circular sample buffer for the render callback.
//!
//! Both cursors belong to the render thread: the mix step writes at the
//! write cursor, the hardware-copy step reads at the play cursor, all within
//! one callback. Cross-thread traffic goes over the command channel instead,
//! so no atomics are needed here.

/// A circular f32 sample buffer with independent write and play cursors.
pub struct RenderBuffer {
    buffer: Box<[f32]>,
    capacity: usize,
    write_pos: usize,
    play_pos: usize,
}

impl RenderBuffer {
    /// Create a new ring with the given capacity (in samples).
    pub fn new(capacity: usize) -> Self {
        // Add 1 to distinguish full from empty
        let actual_cap = capacity + 1;
        Self {
            buffer: vec![0.0f32; actual_cap].into_boxed_slice(),
            capacity: actual_cap,
            write_pos: 0,
            play_pos: 0,
        }
    }

    /// Number of samples buffered between the play and write cursors.
    pub fn available_read(&self) -> usize {
        if self.write_pos >= self.play_pos {
            self.write_pos - self.play_pos
        } else {
            self.capacity - self.play_pos + self.write_pos
        }
    }

    /// Number of samples that can be written without overtaking the play cursor.
    pub fn available_write(&self) -> usize {
        self.capacity - 1 - self.available_read()
    }

    /// Write samples at the write cursor. Returns the number actually written.
    pub fn write(&mut self, data: &[f32]) -> usize {
        let count = data.len().min(self.available_write());
        if count == 0 {
            return 0;
        }

        // Write in up to two segments (wrap-around)
        let w = self.write_pos;
        let first = (self.capacity - w).min(count);
        self.buffer[w..w + first].copy_from_slice(&data[..first]);
        let second = count - first;
        if second > 0 {
            self.buffer[..second].copy_from_slice(&data[first..count]);
        }

        self.write_pos = (w + count) % self.capacity;
        count
    }

    /// Read samples at the play cursor. Returns the number actually read;
    /// the remainder of `output` is left untouched for the caller to silence.
    pub fn read(&mut self, output: &mut [f32]) -> usize {
        let count = output.len().min(self.available_read());
        if count == 0 {
            return 0;
        }

        let r = self.play_pos;
        let first = (self.capacity - r).min(count);
        output[..first].copy_from_slice(&self.buffer[r..r + first]);
        let second = count - first;
        if second > 0 {
            output[first..count].copy_from_slice(&self.buffer[..second]);
        }

        self.play_pos = (r + count) % self.capacity;
        count
    }

    /// Drop all buffered samples.
    pub fn clear(&mut self) {
        self.play_pos = self.write_pos;
    }
}
