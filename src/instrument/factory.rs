//! Instrument factory — the voice recipe for each style.

use crate::style::Style;

use super::envelope::AdsrEnvelope;
use super::filter::Slope;
use super::lfo::Lfo;
use super::oscillator::Waveform;
use super::voice::{FilterSpec, FilterSweep, Polyphony, Routing, Tone, VoiceSpec, MAX_POLYPHONY};
use super::{Layer, Slot};

const POLY_GAIN: f64 = 0.25;
const PAD_GAIN: f64 = 0.2;
const MONO_GAIN: f64 = 0.5;

/// Filter envelope shared by the square-wave basses.
const BASS_SWEEP: FilterSweep = FilterSweep {
    octaves: 3.0,
    envelope: AdsrEnvelope::new(0.6, 0.2, 0.5, 2.0),
};

/// Acid filter LFO: one cycle per eighth note between these cutoffs.
const ACID_LFO_PERIOD_BEATS: f64 = 0.5;
const ACID_LFO_MIN_HZ: f64 = 400.0;
const ACID_LFO_MAX_HZ: f64 = 3000.0;

fn poly(tone: Tone, envelope: AdsrEnvelope, routing: Routing, gain: f64) -> VoiceSpec {
    VoiceSpec {
        tone,
        envelope,
        polyphony: Polyphony::Poly(MAX_POLYPHONY),
        filter: None,
        routing,
        gain,
    }
}

fn mono(waveform: Waveform, envelope: AdsrEnvelope, filter: FilterSpec, routing: Routing) -> VoiceSpec {
    VoiceSpec {
        tone: Tone::Wave(waveform),
        envelope,
        polyphony: Polyphony::Mono,
        filter: Some(filter),
        routing,
        gain: MONO_GAIN,
    }
}

/// Build the voice set for one style. Styles without a dedicated recipe get
/// a generic triangle lead and square bass. Never fails.
pub fn build_layer(style: Style, sample_rate: u32) -> Layer {
    let layer = Layer::new(style, sample_rate);
    match style {
        Style::Cyberpunk => layer
            .with_voice(
                Slot::Lead,
                poly(
                    Tone::Wave(Waveform::Saw),
                    AdsrEnvelope::new(0.02, 0.1, 0.3, 1.0),
                    Routing::REVERB.with_delay(),
                    POLY_GAIN,
                ),
            )
            .with_voice(
                Slot::Bass,
                mono(
                    Waveform::Square,
                    AdsrEnvelope::new(0.005, 0.2, 0.4, 0.2),
                    FilterSpec {
                        cutoff: 200.0,
                        q: 2.0,
                        slope: Slope::Db24,
                        sweep: Some(BASS_SWEEP),
                    },
                    Routing::DIRECT,
                ),
            ),
        Style::Lofi => layer.with_voice(
            Slot::Lead,
            poly(
                Tone::Fm {
                    harmonicity: 3.0,
                    modulation_index: 2.0,
                },
                AdsrEnvelope::new(0.05, 0.2, 0.1, 0.5),
                Routing::REVERB,
                POLY_GAIN,
            ),
        ),
        Style::Ambient => layer.with_voice(
            Slot::Pad,
            poly(
                Tone::Wave(Waveform::Triangle),
                AdsrEnvelope::new(1.5, 1.0, 0.8, 3.0),
                Routing::REVERB.with_auto_filter(),
                PAD_GAIN,
            ),
        ),
        Style::Acid => layer
            .with_voice(
                Slot::Bass,
                mono(
                    Waveform::Saw,
                    AdsrEnvelope::new(0.01, 0.4, 0.0, 0.1),
                    FilterSpec {
                        cutoff: ACID_LFO_MIN_HZ,
                        q: 8.0,
                        slope: Slope::Db24,
                        sweep: None,
                    },
                    Routing::default().with_delay(),
                ),
            )
            .with_modulator(
                Slot::Bass,
                Lfo::new(ACID_LFO_PERIOD_BEATS, ACID_LFO_MIN_HZ, ACID_LFO_MAX_HZ),
            ),
        Style::Cinematic => layer
            .with_voice(
                Slot::Lead,
                poly(
                    Tone::Wave(Waveform::Saw),
                    AdsrEnvelope::new(0.8, 0.5, 0.8, 1.5),
                    Routing::REVERB,
                    POLY_GAIN,
                ),
            )
            .with_voice(
                Slot::Bass,
                mono(
                    Waveform::Saw,
                    AdsrEnvelope::new(0.1, 0.5, 0.8, 1.0),
                    FilterSpec {
                        cutoff: 200.0,
                        q: 1.0,
                        slope: Slope::Db24,
                        sweep: None,
                    },
                    Routing::DIRECT,
                ),
            ),
        Style::EightBit | Style::Retrowave | Style::Trap | Style::DeepHouse | Style::Glitch => layer
            .with_voice(
                Slot::Lead,
                poly(
                    Tone::Wave(Waveform::Triangle),
                    AdsrEnvelope::new(0.005, 0.1, 0.3, 1.0),
                    Routing::REVERB,
                    POLY_GAIN,
                ),
            )
            .with_voice(
                Slot::Bass,
                mono(
                    Waveform::Square,
                    AdsrEnvelope::new(0.005, 0.1, 0.9, 1.0),
                    FilterSpec {
                        cutoff: 200.0,
                        q: 6.0,
                        slope: Slope::Db24,
                        sweep: Some(BASS_SWEEP),
                    },
                    Routing::DIRECT,
                ),
            ),
    }
}
