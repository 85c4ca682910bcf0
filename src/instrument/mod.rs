//! Instruments — oscillators, envelopes, filters and the per-style layer of voices.

pub mod envelope;
pub mod factory;
pub mod filter;
pub mod lfo;
pub mod oscillator;
pub mod voice;

pub use envelope::AdsrEnvelope;
pub use factory::build_layer;
pub use filter::{LowPass, Slope};
pub use lfo::Lfo;
pub use oscillator::Waveform;
pub use voice::{FilterSpec, FilterSweep, Polyphony, Routing, Tone, Voice, VoiceSpec, MAX_POLYPHONY};

use crate::effects::BusInput;
use crate::style::Style;
use crate::theory::Pitch;

/// Samples between modulator updates.
const MODULATION_INTERVAL: u32 = 32;

/// The role a voice plays inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Lead,
    Bass,
    Pad,
}

/// Which slots of a layer hold a voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotSet {
    pub lead: bool,
    pub bass: bool,
    pub pad: bool,
}

/// An LFO bound to the filter cutoff of one slot.
#[derive(Debug, Clone)]
pub struct Modulator {
    pub lfo: Lfo,
    pub target: Slot,
}

/// One style's voice set. Every slot is optional.
#[derive(Debug, Clone)]
pub struct Layer {
    style: Style,
    lead: Option<Voice>,
    bass: Option<Voice>,
    pad: Option<Voice>,
    modulator: Option<Modulator>,
    sample_rate: f64,
    modulation_countdown: u32,
}

impl Layer {
    pub fn new(style: Style, sample_rate: u32) -> Self {
        Self {
            style,
            lead: None,
            bass: None,
            pad: None,
            modulator: None,
            sample_rate: sample_rate as f64,
            modulation_countdown: 0,
        }
    }

    pub fn with_voice(mut self, slot: Slot, spec: VoiceSpec) -> Self {
        let voice = Voice::new(spec, self.sample_rate as u32);
        *self.slot_mut(slot) = Some(voice);
        self
    }

    pub fn with_modulator(mut self, target: Slot, lfo: Lfo) -> Self {
        self.modulator = Some(Modulator { lfo, target });
        self
    }

    pub fn style(&self) -> Style {
        self.style
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Voice> {
        match slot {
            Slot::Lead => &mut self.lead,
            Slot::Bass => &mut self.bass,
            Slot::Pad => &mut self.pad,
        }
    }

    pub fn voice(&self, slot: Slot) -> Option<&Voice> {
        match slot {
            Slot::Lead => self.lead.as_ref(),
            Slot::Bass => self.bass.as_ref(),
            Slot::Pad => self.pad.as_ref(),
        }
    }

    pub fn voice_mut(&mut self, slot: Slot) -> Option<&mut Voice> {
        self.slot_mut(slot).as_mut()
    }

    pub fn slots(&self) -> SlotSet {
        SlotSet {
            lead: self.lead.is_some(),
            bass: self.bass.is_some(),
            pad: self.pad.is_some(),
        }
    }

    pub fn modulator(&self) -> Option<&Modulator> {
        self.modulator.as_ref()
    }

    /// Schedule a note on a slot. Returns false when the slot is empty.
    pub fn trigger(&mut self, slot: Slot, pitch: Pitch, velocity: f64, duration: f64, delay: u32) -> bool {
        match self.voice_mut(slot) {
            Some(voice) => {
                voice.note_on(pitch, velocity, duration, delay);
                true
            }
            None => false,
        }
    }

    /// Render one sample of every voice into the bus sends.
    pub fn render(&mut self, bpm: f64, bus: &mut BusInput) {
        if self.modulation_countdown == 0 {
            self.modulation_countdown = MODULATION_INTERVAL;
            let sample_rate = self.sample_rate;
            let modulation = self
                .modulator
                .as_mut()
                .map(|m| (m.target, m.lfo.advance(MODULATION_INTERVAL, bpm, sample_rate)));
            if let Some((target, cutoff)) = modulation {
                if let Some(voice) = self.voice_mut(target) {
                    voice.set_cutoff(Some(cutoff));
                }
            }
        }
        self.modulation_countdown -= 1;

        for voice in [&mut self.lead, &mut self.bass, &mut self.pad]
            .into_iter()
            .flatten()
        {
            if voice.is_silent() {
                continue;
            }
            let sample = voice.render();
            bus.send(voice.routing(), sample);
        }
    }

    /// Silence every voice and reset the modulator. Safe to call repeatedly.
    pub fn release(&mut self) {
        for voice in [&mut self.lead, &mut self.bass, &mut self.pad]
            .into_iter()
            .flatten()
        {
            voice.release_all();
        }
        if let Some(m) = self.modulator.as_mut() {
            m.lfo.reset();
        }
    }

    pub fn is_silent(&self) -> bool {
        [&self.lead, &self.bass, &self.pad]
            .into_iter()
            .flatten()
            .all(Voice::is_silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::pitch::{pitch, C};

    #[test]
    fn trigger_on_missing_slot_is_refused() {
        let mut layer = build_layer(Style::Ambient, 44100);
        assert!(!layer.trigger(Slot::Lead, pitch(C, 3), 1.0, 0.5, 0));
        assert!(layer.trigger(Slot::Pad, pitch(C, 3), 1.0, 0.5, 0));
    }

    #[test]
    fn render_feeds_routed_buses() {
        let mut layer = build_layer(Style::Ambient, 44100);
        layer.trigger(Slot::Pad, pitch(C, 3), 1.0, 1.0, 0);
        let mut peak_reverb: f64 = 0.0;
        let mut peak_direct: f64 = 0.0;
        for _ in 0..44100 {
            let mut bus = BusInput::default();
            layer.render(120.0, &mut bus);
            peak_reverb = peak_reverb.max(bus.reverb.abs());
            peak_direct = peak_direct.max(bus.direct.abs());
        }
        assert!(peak_reverb > 0.0);
        assert_eq!(peak_direct, 0.0);
    }

    #[test]
    fn release_silences_layer() {
        let mut layer = build_layer(Style::Cyberpunk, 44100);
        layer.trigger(Slot::Lead, pitch(C, 3), 1.0, 0.5, 0);
        layer.trigger(Slot::Bass, pitch(C, 2), 1.0, 0.5, 0);
        assert!(!layer.is_silent());
        layer.release();
        layer.release();
        assert!(layer.is_silent());
    }

    #[test]
    fn modulator_drives_target_cutoff() {
        let mut layer = build_layer(Style::Acid, 44100);
        let mut bus = BusInput::default();
        for _ in 0..4410 {
            layer.render(120.0, &mut bus);
        }
        layer.trigger(Slot::Bass, pitch(C, 3), 1.0, 0.2, 0);
        let mut cutoffs = Vec::new();
        for _ in 0..44 {
            for _ in 0..MODULATION_INTERVAL {
                layer.render(120.0, &mut bus);
            }
            cutoffs.push(layer.voice(Slot::Bass).and_then(Voice::filter_cutoff).unwrap());
        }
        assert!(cutoffs.iter().all(|c| (400.0 - 1e-6..=3000.0 + 1e-6).contains(c)));
        assert!(cutoffs.windows(2).any(|w| (w[0] - w[1]).abs() > 1.0));
    }
}
