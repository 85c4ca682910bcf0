//! Waveform tap — the most recent output samples, readable from any thread.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Samples held by the tap.
pub const TAP_SIZE: usize = 256;

struct TapBuffer {
    samples: [AtomicU32; TAP_SIZE],
    write_index: AtomicUsize,
}

/// Lock-free ring of the last [`TAP_SIZE`] limiter output samples.
///
/// Clones share the same buffer: the engine writes, UIs read.
#[derive(Clone)]
pub struct WaveformTap {
    inner: Arc<TapBuffer>,
}

impl WaveformTap {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TapBuffer {
                samples: std::array::from_fn(|_| AtomicU32::new(0.0f32.to_bits())),
                write_index: AtomicUsize::new(0),
            }),
        }
    }

    #[inline]
    pub fn push(&self, sample: f32) {
        let index = self.inner.write_index.load(Ordering::Relaxed);
        self.inner.samples[index].store(sample.to_bits(), Ordering::Relaxed);
        self.inner
            .write_index
            .store((index + 1) % TAP_SIZE, Ordering::Release);
    }

    /// Copy of the buffer, oldest sample first. Never blocks.
    pub fn snapshot(&self) -> Vec<f32> {
        let start = self.inner.write_index.load(Ordering::Acquire);
        (0..TAP_SIZE)
            .map(|i| f32::from_bits(self.inner.samples[(start + i) % TAP_SIZE].load(Ordering::Relaxed)))
            .collect()
    }

    /// Peak absolute value currently in the buffer.
    pub fn peak(&self) -> f32 {
        self.inner
            .samples
            .iter()
            .map(|s| f32::from_bits(s.load(Ordering::Relaxed)).abs())
            .fold(0.0, f32::max)
    }
}

impl Default for WaveformTap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WaveformTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformTap").field("peak", &self.peak()).finish()
    }
}
