//! Oscillator primitives — phase-driven waveform and FM sample generation.

use std::f64::consts::TAU;

/// Available waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

/// Generate a single sample for the given waveform at the specified phase.
///
/// `phase` is in the range [0.0, 1.0), representing one full cycle.
/// Returns a value in [-1.0, 1.0].
#[inline]
pub fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            if phase < 0.25 {
                4.0 * phase
            } else if phase < 0.75 {
                2.0 - 4.0 * phase
            } else {
                4.0 * phase - 4.0
            }
        }
    }
}

/// Two-operator FM: a sine carrier phase-modulated by a sine modulator.
///
/// `index` is the modulation depth in radians.
#[inline]
pub fn fm(carrier_phase: f64, modulator_phase: f64, index: f64) -> f64 {
    (carrier_phase * TAU + index * (modulator_phase * TAU).sin()).sin()
}

/// Advance a normalized phase by one sample at `freq` Hz.
#[inline]
pub fn advance_phase(phase: f64, freq: f64, sample_rate: f64) -> f64 {
    (phase + freq / sample_rate).fract()
}
