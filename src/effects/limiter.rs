//! Master limiter — instant-attack peak limiter with a hard ceiling.

/// Brick-wall limiter. Gain drops instantly to keep peaks at the threshold
/// and recovers smoothly; a final clamp guarantees nothing exceeds it.
#[derive(Debug, Clone)]
pub struct Limiter {
    ceiling: f64,
    gain: f64,
    release_coeff: f64,
}

impl Limiter {
    /// Create a limiter at `threshold_db` dBFS, recovering over roughly
    /// `release_secs`.
    pub fn new(threshold_db: f64, release_secs: f64, sample_rate: u32) -> Self {
        let ceiling = 10f64.powf(threshold_db / 20.0).min(1.0);
        debug_assert!(ceiling > 0.0);
        let release_coeff = if release_secs > 0.0 {
            (-1.0 / (release_secs * sample_rate as f64)).exp()
        } else {
            0.0
        };
        Self {
            ceiling,
            gain: 1.0,
            release_coeff,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f64) -> f64 {
        let peak = sample.abs();
        let needed = if peak > self.ceiling {
            self.ceiling / peak
        } else {
            1.0
        };
        if needed < self.gain {
            self.gain = needed;
        } else {
            self.gain = needed + (self.gain - needed) * self.release_coeff;
        }
        (sample * self.gain).clamp(-self.ceiling, self.ceiling)
    }

    /// Linear output ceiling.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Current gain reduction factor (1.0 = none).
    pub fn gain(&self) -> f64 {
        self.gain
    }
}
