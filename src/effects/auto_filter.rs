//! Auto-filter — an LFO-swept low-pass insert.

use crate::instrument::{Lfo, LowPass, Slope};

/// Octaves the sweep rises above the base frequency.
pub const SWEEP_OCTAVES: f64 = 2.6;
/// LFO period in beats.
const PERIOD_BEATS: f64 = 1.0;
const Q: f64 = 1.0;
const UPDATE_INTERVAL: u32 = 32;

#[derive(Debug, Clone)]
pub struct AutoFilter {
    filter: LowPass,
    lfo: Lfo,
    base: f64,
    sample_rate: f64,
    countdown: u32,
}

impl AutoFilter {
    pub fn new(base_frequency: f64, sample_rate: u32) -> Self {
        let base = base_frequency.max(1.0);
        Self {
            filter: LowPass::new(base, Q, Slope::Db12, sample_rate as f64),
            lfo: Lfo::new(PERIOD_BEATS, base, sweep_top(base)),
            base,
            sample_rate: sample_rate as f64,
            countdown: 0,
        }
    }

    /// Move the bottom of the sweep.
    pub fn set_base(&mut self, base_frequency: f64) {
        let base = base_frequency.max(1.0);
        if (base - self.base).abs() > 1e-9 {
            self.base = base;
            self.lfo.set_range(base, sweep_top(base));
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn cutoff(&self) -> f64 {
        self.filter.cutoff()
    }

    #[inline]
    pub fn process(&mut self, input: f64, bpm: f64) -> f64 {
        if self.countdown == 0 {
            self.countdown = UPDATE_INTERVAL;
            let cutoff = self.lfo.advance(UPDATE_INTERVAL, bpm, self.sample_rate);
            self.filter.set_cutoff(cutoff);
        }
        self.countdown -= 1;
        self.filter.process(input)
    }
}

fn sweep_top(base: f64) -> f64 {
    base * 2f64.powf(SWEEP_OCTAVES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    #[test]
    fn sweep_spans_two_point_six_octaves() {
        let mut af = AutoFilter::new(1200.0, SR);
        let mut lo = f64::MAX;
        let mut hi: f64 = 0.0;
        // Two beats at 120 BPM.
        for _ in 0..SR {
            af.process(0.0, 120.0);
            lo = lo.min(af.cutoff());
            hi = hi.max(af.cutoff());
        }
        let top = 1200.0 * 2f64.powf(SWEEP_OCTAVES);
        assert!(lo >= 1200.0 - 1e-6 && lo < 1300.0);
        assert!(hi <= top + 1e-6 && hi > top * 0.95);
    }

    #[test]
    fn set_base_moves_range() {
        let mut af = AutoFilter::new(1200.0, SR);
        af.set_base(200.0);
        assert_eq!(af.base(), 200.0);
        for _ in 0..SR {
            af.process(0.0, 120.0);
            assert!(af.cutoff() <= 200.0 * 2f64.powf(SWEEP_OCTAVES) + 1e-6);
        }
    }

    #[test]
    fn silence_in_silence_out() {
        let mut af = AutoFilter::new(1200.0, SR);
        for _ in 0..1000 {
            assert_eq!(af.process(0.0, 120.0), 0.0);
        }
    }
}
