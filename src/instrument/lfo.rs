//! Tempo-synced low-frequency oscillator.

use super::oscillator::{advance_phase, oscillator, Waveform};

/// A sine LFO sweeping linearly between `min` and `max`, with its period
/// expressed in beats so it follows tempo changes.
#[derive(Debug, Clone)]
pub struct Lfo {
    period_beats: f64,
    min: f64,
    max: f64,
    phase: f64,
}

impl Lfo {
    pub fn new(period_beats: f64, min: f64, max: f64) -> Self {
        Self {
            period_beats,
            min,
            max,
            phase: 0.0,
        }
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Rate in Hz at `bpm`.
    pub fn rate_hz(&self, bpm: f64) -> f64 {
        bpm / 60.0 / self.period_beats
    }

    /// Current output value.
    pub fn value(&self) -> f64 {
        let unit = (oscillator(Waveform::Sine, self.phase) + 1.0) * 0.5;
        self.min + unit * (self.max - self.min)
    }

    /// Advance by `samples` at `bpm` and return the new value.
    pub fn advance(&mut self, samples: u32, bpm: f64, sample_rate: f64) -> f64 {
        self.phase = advance_phase(self.phase, self.rate_hz(bpm) * samples as f64, sample_rate);
        self.value()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
