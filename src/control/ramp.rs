//! Linear parameter ramps advanced once per sample.

/// A value that moves linearly to its target over a fixed number of samples.
#[derive(Debug, Clone)]
pub struct Ramp {
    current: f64,
    target: f64,
    step: f64,
    samples_remaining: u32,
}

impl Ramp {
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
        }
    }

    /// Start moving toward `target`, arriving after `secs` seconds.
    ///
    /// A zero-length ramp jumps immediately.
    pub fn ramp_to(&mut self, target: f64, secs: f64, sample_rate: u32) {
        let samples = (secs * sample_rate as f64).round();
        if samples < 1.0 {
            self.set_immediate(target);
            return;
        }
        self.target = target;
        self.samples_remaining = samples as u32;
        self.step = (target - self.current) / samples;
    }

    pub fn set_immediate(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.samples_remaining = 0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        if self.samples_remaining > 0 {
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            } else {
                self.current += self.step;
            }
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.samples_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn reaches_target_exactly() {
        let mut ramp = Ramp::new(120.0);
        ramp.ramp_to(156.0, 1.0, 100);
        for _ in 0..100 {
            ramp.next_sample();
        }
        assert_eq!(ramp.current(), 156.0);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn halfway_is_linear() {
        let mut ramp = Ramp::new(0.0);
        ramp.ramp_to(1.0, 0.1, 1000);
        for _ in 0..50 {
            ramp.next_sample();
        }
        assert_approx_eq!(ramp.current(), 0.5);
        assert_eq!(ramp.target(), 1.0);
    }

    #[test]
    fn retarget_mid_ramp_starts_from_current() {
        let mut ramp = Ramp::new(0.0);
        ramp.ramp_to(1.0, 1.0, 10);
        for _ in 0..5 {
            ramp.next_sample();
        }
        let midway = ramp.current();
        ramp.ramp_to(0.0, 1.0, 10);
        let next = ramp.next_sample();
        assert!(next < midway);
    }

    #[test]
    fn zero_time_jumps() {
        let mut ramp = Ramp::new(3.0);
        ramp.ramp_to(7.0, 0.0, 48000);
        assert_eq!(ramp.current(), 7.0);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn never_overshoots() {
        let mut ramp = Ramp::new(200.0);
        ramp.ramp_to(60.0, 0.5, 44100);
        while ramp.is_ramping() {
            let v = ramp.next_sample();
            assert!((60.0..=200.0).contains(&v));
        }
    }
}
