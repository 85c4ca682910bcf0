//! Synth voices — mono and poly note rendering with optional resonant filter.
//!
//! A voice owns its sounding notes. Notes can be scheduled a few samples
//! ahead (for lookahead and humanized timing); they start sample-accurately
//! when their delay runs out. Poly voices steal their oldest note when full,
//! mono voices retrigger. Stolen notes fade over a few milliseconds instead
//! of cutting off.

use crate::theory::Pitch;

use super::envelope::AdsrEnvelope;
use super::filter::{LowPass, Slope};
use super::oscillator::{advance_phase, fm, oscillator, Waveform};

/// Most notes a poly voice sounds at once.
pub const MAX_POLYPHONY: usize = 8;

/// Samples between filter cutoff updates.
const CONTROL_INTERVAL: u32 = 32;

/// Fade applied to stolen notes, in seconds.
const STEAL_FADE_SECS: f64 = 0.005;

/// Oscillator source of a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Wave(Waveform),
    /// Sine carrier modulated by a sine at `harmonicity` × the note frequency.
    Fm {
        harmonicity: f64,
        modulation_index: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polyphony {
    Mono,
    Poly(usize),
}

impl Polyphony {
    fn max_notes(self) -> usize {
        match self {
            Polyphony::Mono => 1,
            Polyphony::Poly(n) => n.clamp(1, MAX_POLYPHONY),
        }
    }
}

/// Per-note filter envelope: opens the cutoff by up to `octaves`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSweep {
    pub octaves: f64,
    pub envelope: AdsrEnvelope,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub cutoff: f64,
    pub q: f64,
    pub slope: Slope,
    pub sweep: Option<FilterSweep>,
}

/// Which effect buses a voice feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Routing {
    pub direct: bool,
    pub delay: bool,
    pub reverb: bool,
    pub auto_filter: bool,
}

impl Routing {
    pub const DIRECT: Routing = Routing {
        direct: true,
        delay: false,
        reverb: false,
        auto_filter: false,
    };

    pub const REVERB: Routing = Routing {
        direct: false,
        delay: false,
        reverb: true,
        auto_filter: false,
    };

    pub const fn with_delay(mut self) -> Self {
        self.delay = true;
        self
    }

    pub const fn with_auto_filter(mut self) -> Self {
        self.auto_filter = true;
        self
    }
}

/// Everything needed to build a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    pub tone: Tone,
    pub envelope: AdsrEnvelope,
    pub polyphony: Polyphony,
    pub filter: Option<FilterSpec>,
    pub routing: Routing,
    /// Output scaling applied to the summed notes.
    pub gain: f64,
}

#[derive(Debug, Clone)]
struct Note {
    freq: f64,
    velocity: f64,
    duration: f64,
    phase: f64,
    mod_phase: f64,
    elapsed: u64,
    delay: u32,
    started: bool,
    fade: Option<u32>,
}

impl Note {
    fn is_held(&self) -> bool {
        self.started && self.fade.is_none()
    }
}

/// A playable voice built from a [`VoiceSpec`].
#[derive(Debug, Clone)]
pub struct Voice {
    spec: VoiceSpec,
    notes: Vec<Note>,
    filter: Option<LowPass>,
    modulated_cutoff: Option<f64>,
    control_countdown: u32,
    sample_rate: f64,
    fade_samples: u32,
}

impl Voice {
    pub fn new(spec: VoiceSpec, sample_rate: u32) -> Self {
        let sample_rate = sample_rate as f64;
        let max_notes = spec.polyphony.max_notes();
        Self {
            filter: spec
                .filter
                .map(|f| LowPass::new(f.cutoff, f.q, f.slope, sample_rate)),
            notes: Vec::with_capacity(max_notes * 2 + 4),
            modulated_cutoff: None,
            control_countdown: 0,
            sample_rate,
            fade_samples: ((STEAL_FADE_SECS * sample_rate) as u32).max(1),
            spec,
        }
    }

    pub fn spec(&self) -> &VoiceSpec {
        &self.spec
    }

    pub fn routing(&self) -> Routing {
        self.spec.routing
    }

    /// Schedule a note `delay` samples from now, held for `duration` seconds.
    pub fn note_on(&mut self, pitch: Pitch, velocity: f64, duration: f64, delay: u32) {
        self.notes.push(Note {
            freq: pitch.frequency(),
            velocity: velocity.clamp(0.0, 1.0),
            duration: duration.max(0.0),
            phase: 0.0,
            mod_phase: 0.0,
            elapsed: 0,
            delay,
            started: false,
            fade: None,
        });
    }

    /// Override the filter cutoff (used by modulators). `None` restores the
    /// configured cutoff.
    pub fn set_cutoff(&mut self, cutoff: Option<f64>) {
        self.modulated_cutoff = cutoff;
    }

    pub fn filter_cutoff(&self) -> Option<f64> {
        self.filter.as_ref().map(LowPass::cutoff)
    }

    /// Notes currently held (started and not being stolen).
    pub fn held_notes(&self) -> usize {
        self.notes.iter().filter(|n| n.is_held()).count()
    }

    /// Notes scheduled but not yet started.
    pub fn pending_notes(&self) -> usize {
        self.notes.iter().filter(|n| !n.started).count()
    }

    pub fn is_silent(&self) -> bool {
        self.notes.is_empty()
    }

    /// Drop every scheduled and sounding note. Safe to call repeatedly.
    pub fn release_all(&mut self) {
        self.notes.clear();
        self.modulated_cutoff = None;
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
    }

    fn start_note(&mut self, index: usize) {
        self.notes[index].started = true;
        let max_notes = self.spec.polyphony.max_notes();
        let fade = self.fade_samples;

        let mut held = self
            .notes
            .iter()
            .enumerate()
            .filter(|(i, n)| *i != index && n.is_held())
            .count();
        while held >= max_notes {
            let oldest = self
                .notes
                .iter()
                .enumerate()
                .filter(|(i, n)| *i != index && n.is_held())
                .max_by_key(|(_, n)| n.elapsed)
                .map(|(i, _)| i);
            match oldest {
                Some(i) => {
                    self.notes[i].fade = Some(fade);
                    held -= 1;
                }
                None => break,
            }
        }
    }

    fn update_filter(&mut self) {
        let Some(filter) = self.filter.as_mut() else {
            return;
        };
        let Some(spec) = self.spec.filter else {
            return;
        };
        let mut cutoff = self.modulated_cutoff.unwrap_or(spec.cutoff);
        if let Some(sweep) = spec.sweep {
            let newest = self
                .notes
                .iter()
                .filter(|n| n.is_held())
                .min_by_key(|n| n.elapsed);
            if let Some(note) = newest {
                let t = note.elapsed as f64 / self.sample_rate;
                cutoff *= 2f64.powf(sweep.octaves * sweep.envelope.amplitude(t, note.duration));
            }
        }
        filter.set_cutoff(cutoff);
    }

    /// Render one mono sample.
    pub fn render(&mut self) -> f64 {
        if self.notes.is_empty() {
            return 0.0;
        }

        for i in 0..self.notes.len() {
            let note = &mut self.notes[i];
            if note.started {
                continue;
            }
            if note.delay == 0 {
                self.start_note(i);
            } else {
                note.delay -= 1;
            }
        }

        if self.control_countdown == 0 {
            self.update_filter();
            self.control_countdown = CONTROL_INTERVAL;
        }
        self.control_countdown -= 1;

        let sr = self.sample_rate;
        let envelope = self.spec.envelope;
        let tone = self.spec.tone;
        let fade_len = self.fade_samples as f64;
        let mut any_finished = false;
        let mut sum = 0.0;

        for note in self.notes.iter_mut().filter(|n| n.started) {
            let t = note.elapsed as f64 / sr;
            let mut amp = envelope.amplitude(t, note.duration) * note.velocity;
            if let Some(remaining) = note.fade.as_mut() {
                amp *= *remaining as f64 / fade_len;
                *remaining = remaining.saturating_sub(1);
            }

            let sample = match tone {
                Tone::Wave(waveform) => oscillator(waveform, note.phase),
                Tone::Fm {
                    harmonicity,
                    modulation_index,
                } => {
                    let s = fm(note.phase, note.mod_phase, modulation_index);
                    note.mod_phase = advance_phase(note.mod_phase, note.freq * harmonicity, sr);
                    s
                }
            };
            note.phase = advance_phase(note.phase, note.freq, sr);
            note.elapsed += 1;
            sum += sample * amp;

            if note.fade == Some(0) || t >= envelope.total_duration(note.duration) {
                any_finished = true;
            }
        }

        if any_finished {
            self.notes.retain(|n| {
                !(n.started
                    && (n.fade == Some(0)
                        || n.elapsed as f64 / sr > envelope.total_duration(n.duration)))
            });
        }

        let out = match self.filter.as_mut() {
            Some(filter) => filter.process(sum),
            None => sum,
        };
        out * self.spec.gain
    }
}
