//! Effects bus — shared sends, master limiter and the analysis tap.
//!
//! Topology (built once, never rebuilt per session):
//!
//! ```text
//! voices ─┬─ direct ──────────────┐
//!         ├─ delay send ── delay ──┤
//!         ├─ reverb send ─ reverb ─┼─ limiter ─ tap
//!         └─ filter send ─ auto ───┘
//! ```

pub mod analyser;
pub mod auto_filter;
pub mod delay;
pub mod limiter;
pub mod reverb;

pub use analyser::{WaveformTap, TAP_SIZE};
pub use auto_filter::AutoFilter;
pub use delay::FeedbackDelay;
pub use limiter::Limiter;
pub use reverb::Reverb;

use crate::instrument::Routing;

/// Master limiter threshold in dBFS.
pub const LIMITER_THRESHOLD_DB: f64 = -2.0;
const LIMITER_RELEASE_SECS: f64 = 0.1;
/// Dotted eighth.
const DELAY_TIME_BEATS: f64 = 0.75;
const DELAY_FEEDBACK: f64 = 0.3;
/// Longest delay the line holds; covers a dotted eighth down to 45 BPM.
const DELAY_MAX_SECS: f64 = 1.0;
const REVERB_DECAY_SECS: f64 = 4.0;
const REVERB_DAMPING: f64 = 0.5;

/// One sample of voice output split across the bus sends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BusInput {
    pub direct: f64,
    pub delay: f64,
    pub reverb: f64,
    pub auto_filter: f64,
}

impl BusInput {
    /// Add a voice sample to every send its routing enables.
    #[inline]
    pub fn send(&mut self, routing: Routing, sample: f64) {
        if routing.direct {
            self.direct += sample;
        }
        if routing.delay {
            self.delay += sample;
        }
        if routing.reverb {
            self.reverb += sample;
        }
        if routing.auto_filter {
            self.auto_filter += sample;
        }
    }
}

/// Per-sample effect parameters, usually read from control ramps.
#[derive(Debug, Clone, Copy)]
pub struct BusParams {
    pub bpm: f64,
    pub reverb_wet: f64,
    pub filter_base: f64,
}

pub struct EffectsBus {
    delay: FeedbackDelay,
    reverb: Reverb,
    auto_filter: AutoFilter,
    limiter: Limiter,
    tap: WaveformTap,
}

impl EffectsBus {
    pub fn new(sample_rate: u32, filter_base: f64) -> Self {
        Self {
            delay: FeedbackDelay::new(DELAY_TIME_BEATS, DELAY_FEEDBACK, DELAY_MAX_SECS, sample_rate),
            reverb: Reverb::new(REVERB_DECAY_SECS, REVERB_DAMPING, sample_rate),
            auto_filter: AutoFilter::new(filter_base, sample_rate),
            limiter: Limiter::new(LIMITER_THRESHOLD_DB, LIMITER_RELEASE_SECS, sample_rate),
            tap: WaveformTap::new(),
        }
    }

    /// Run one sample through every effect and the limiter. The limited
    /// sample is also written to the tap.
    #[inline]
    pub fn process(&mut self, input: BusInput, params: BusParams) -> f64 {
        self.auto_filter.set_base(params.filter_base);
        let mix = input.direct
            + self.delay.process(input.delay, params.bpm)
            + self.reverb.process(input.reverb, params.reverb_wet)
            + self.auto_filter.process(input.auto_filter, params.bpm);
        let out = self.limiter.process(mix);
        self.tap.push(out as f32);
        out
    }

    /// Shared handle to the analysis tap.
    pub fn tap(&self) -> WaveformTap {
        self.tap.clone()
    }

    pub fn limiter_ceiling(&self) -> f64 {
        self.limiter.ceiling()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn params() -> BusParams {
        BusParams {
            bpm: 120.0,
            reverb_wet: 0.3,
            filter_base: 1200.0,
        }
    }

    #[test]
    fn send_respects_routing() {
        let mut bus = BusInput::default();
        bus.send(Routing::DIRECT, 0.5);
        bus.send(Routing::REVERB.with_delay(), 0.25);
        bus.send(Routing::REVERB.with_auto_filter(), 0.1);
        assert_eq!(bus.direct, 0.5);
        assert_eq!(bus.delay, 0.25);
        assert!((bus.reverb - 0.35).abs() < 1e-12);
        assert_eq!(bus.auto_filter, 0.1);
    }

    #[test]
    fn direct_signal_reaches_output() {
        let mut fx = EffectsBus::new(SR, 1200.0);
        let input = BusInput {
            direct: 0.5,
            ..BusInput::default()
        };
        assert!((fx.process(input, params()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn output_never_exceeds_ceiling() {
        let mut fx = EffectsBus::new(SR, 1200.0);
        let ceiling = fx.limiter_ceiling();
        for i in 0..SR {
            let x = (i as f64 * 0.05).sin() * 2.0;
            let input = BusInput {
                direct: x,
                delay: x,
                reverb: x,
                auto_filter: x,
            };
            assert!(fx.process(input, params()).abs() <= ceiling + 1e-12);
        }
    }

    #[test]
    fn tap_sees_limited_output() {
        let mut fx = EffectsBus::new(SR, 1200.0);
        let tap = fx.tap();
        let input = BusInput {
            direct: 3.0,
            ..BusInput::default()
        };
        fx.process(input, params());
        let last = tap.snapshot()[TAP_SIZE - 1];
        assert!((last as f64 - fx.limiter_ceiling()).abs() < 1e-6);
    }
}
