//! Freeverb-style mono reverb.
//!
//! Eight parallel damped comb filters feed four serial allpasses. The comb
//! feedback is derived from the requested decay time.

const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];

const FIXED_GAIN: f64 = 0.015;
const SCALE_WET: f64 = 3.0;
const SCALE_DAMPING: f64 = 0.4;
const MAX_FEEDBACK: f64 = 0.98;

#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f64>,
    index: usize,
    filter_store: f64,
    damp1: f64,
    damp2: f64,
    feedback: f64,
}

impl CombFilter {
    fn new(size: usize, feedback: f64, damping: f64) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            filter_store: 0.0,
            damp1: damping,
            damp2: 1.0 - damping,
            feedback,
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let output = self.buffer[self.index];
        self.filter_store = output * self.damp2 + self.filter_store * self.damp1;
        self.buffer[self.index] = input + self.filter_store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f64>,
    index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let buf_out = self.buffer[self.index];
        self.buffer[self.index] = input + buf_out * 0.5;
        self.index = (self.index + 1) % self.buffer.len();
        buf_out - input
    }
}

/// Comb feedback giving a 60 dB decay over `decay_secs` for a comb of
/// `delay_secs`.
fn feedback_for_decay(delay_secs: f64, decay_secs: f64) -> f64 {
    if decay_secs <= 0.0 {
        return 0.0;
    }
    10f64.powf(-3.0 * delay_secs / decay_secs).min(MAX_FEEDBACK)
}

#[derive(Debug, Clone)]
pub struct Reverb {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
    decay_secs: f64,
}

impl Reverb {
    /// `damping` is 0..1; higher values darken the tail faster.
    pub fn new(decay_secs: f64, damping: f64, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        let scale = sr / 44100.0;
        let damping = damping.clamp(0.0, 1.0) * SCALE_DAMPING;

        let combs = COMB_TUNINGS
            .iter()
            .map(|&size| {
                let len = (size as f64 * scale) as usize;
                let feedback = feedback_for_decay(len as f64 / sr, decay_secs);
                CombFilter::new(len, feedback, damping)
            })
            .collect();
        let allpasses = ALLPASS_TUNINGS
            .iter()
            .map(|&size| AllpassFilter::new((size as f64 * scale) as usize))
            .collect();

        Self {
            combs,
            allpasses,
            decay_secs,
        }
    }

    pub fn decay_secs(&self) -> f64 {
        self.decay_secs
    }

    /// Wet/dry mix of one sample. `wet` is 0..1.
    #[inline]
    pub fn process(&mut self, input: f64, wet: f64) -> f64 {
        let wet = wet.clamp(0.0, 1.0);
        let scaled = input * FIXED_GAIN;
        let mut out: f64 = self.combs.iter_mut().map(|c| c.process(scaled)).sum();
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        input * (1.0 - wet) + out * wet * SCALE_WET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn energy(samples: &[f64]) -> f64 {
        samples.iter().map(|s| s * s).sum()
    }

    #[test]
    fn dry_mix_passes_input() {
        let mut reverb = Reverb::new(4.0, 0.5, SR);
        for &x in &[0.5, -0.25, 0.0, 1.0] {
            assert!((reverb.process(x, 0.0) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn impulse_leaves_a_tail() {
        let mut reverb = Reverb::new(4.0, 0.5, SR);
        reverb.process(1.0, 1.0);
        let tail: Vec<f64> = (0..SR as usize).map(|_| reverb.process(0.0, 1.0)).collect();
        assert!(energy(&tail[22050..]) > 0.0);
    }

    #[test]
    fn tail_decays() {
        let mut reverb = Reverb::new(1.0, 0.5, SR);
        reverb.process(1.0, 1.0);
        let tail: Vec<f64> = (0..(SR * 3) as usize).map(|_| reverb.process(0.0, 1.0)).collect();
        let early = energy(&tail[..SR as usize]);
        let late = energy(&tail[(SR * 2) as usize..]);
        assert!(late < early * 1e-3);
    }

    #[test]
    fn longer_decay_uses_more_feedback() {
        let short = feedback_for_decay(0.03, 1.0);
        let long = feedback_for_decay(0.03, 4.0);
        assert!(long > short);
        assert!(long <= MAX_FEEDBACK);
        assert_eq!(feedback_for_decay(0.03, 0.0), 0.0);
    }
}
