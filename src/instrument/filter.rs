//! Resonant low-pass filters built from cascaded biquads.
//!
//! Coefficients follow the Audio EQ Cookbook low-pass formula. A 24 dB/oct
//! slope is two identical 12 dB/oct stages in series.

use std::f64::consts::PI;

/// Normalized biquad coefficients (a0 divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Low-pass coefficients. Cutoff is kept below Nyquist and Q at or above 0.5.
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let q = q.max(0.5);
        let cutoff = cutoff.clamp(10.0, sample_rate * 0.45);
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_omega) / 2.0 / a0,
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// One direct-form-I biquad stage.
#[derive(Debug, Clone)]
struct Biquad {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    const fn new() -> Self {
        Self {
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, c: &BiquadCoeffs, input: f64) -> f64 {
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }
}

/// Filter steepness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slope {
    Db12,
    Db24,
}

impl Slope {
    fn stages(self) -> usize {
        match self {
            Slope::Db12 => 1,
            Slope::Db24 => 2,
        }
    }
}

/// A resonant low-pass whose cutoff can move while it runs.
#[derive(Debug, Clone)]
pub struct LowPass {
    coeffs: BiquadCoeffs,
    stages: [Biquad; 2],
    active_stages: usize,
    cutoff: f64,
    q: f64,
    sample_rate: f64,
}

impl LowPass {
    pub fn new(cutoff: f64, q: f64, slope: Slope, sample_rate: f64) -> Self {
        Self {
            coeffs: BiquadCoeffs::lowpass(cutoff, q, sample_rate),
            stages: [Biquad::new(), Biquad::new()],
            active_stages: slope.stages(),
            cutoff,
            q,
            sample_rate,
        }
    }

    /// Move the cutoff. Coefficients are only recomputed when it changes.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        if (cutoff - self.cutoff).abs() > 1e-6 {
            self.cutoff = cutoff;
            self.coeffs = BiquadCoeffs::lowpass(cutoff, self.q, self.sample_rate);
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let mut x = input;
        for stage in &mut self.stages[..self.active_stages] {
            x = stage.process(&self.coeffs, x);
        }
        x
    }

    pub fn reset(&mut self) {
        self.stages = [Biquad::new(), Biquad::new()];
    }
}
