//! Performer — decides what each layer plays on a tick.
//!
//! Random draws happen in a fixed order per layer so a seeded source
//! reproduces a run exactly:
//!
//! 1. lead density draw
//! 2. acid gate and acid note index (acid bass only)
//! 3. lead note index, velocity, timing offset, build coin (lead firing only)

use crate::emotion::VelocityBand;
use crate::instrument::{Slot, SlotSet};
use crate::style::Style;
use crate::theory::{Chord, Pitch};

use super::random::RandomSource;
use super::section::Section;

/// Pad hits land every this many ticks.
const PAD_INTERVAL: u64 = 32;
/// Sparse bass roots land every this many ticks.
const ROOT_BASS_INTERVAL: u64 = 8;
/// Acid notes fire when the gate draw exceeds this.
const ACID_GATE: f64 = 0.3;
/// Lead timing humanization, ± seconds.
const TIMING_SPREAD_SECS: f64 = 0.01;

/// Musical note lengths used by the performer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValue {
    Sixteenth,
    Eighth,
    Quarter,
    Half,
}

impl NoteValue {
    pub fn beats(self) -> f64 {
        match self {
            NoteValue::Sixteenth => 0.25,
            NoteValue::Eighth => 0.5,
            NoteValue::Quarter => 1.0,
            NoteValue::Half => 2.0,
        }
    }

    pub fn secs(self, bpm: f64) -> f64 {
        self.beats() * 60.0 / bpm
    }
}

/// A note the engine should start on a layer's voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTrigger {
    /// Index of the layer in the session's layer list.
    pub layer: usize,
    pub slot: Slot,
    pub pitch: Pitch,
    /// Humanization offset from the tick time, in seconds.
    pub offset_secs: f64,
    pub length: NoteValue,
    pub velocity: f64,
}

/// What the performer needs to know about a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformerLayer {
    pub style: Style,
    pub slots: SlotSet,
}

/// Drop a root an octave: octave 3 goes to 2, and with `include_fourth`
/// octave 4 goes to 3. Lower roots are left alone.
fn drop_root(root: Pitch, include_fourth: bool) -> Pitch {
    match root.octave() {
        3 => root.transpose(-12),
        4 if include_fourth => root.transpose(-12),
        _ => root,
    }
}

/// Run one tick of performer logic for a single layer.
#[allow(clippy::too_many_arguments)]
pub fn perform_layer(
    index: usize,
    layer: PerformerLayer,
    tick: u64,
    section: Section,
    chord: &Chord,
    band: VelocityBand,
    random: &mut dyn RandomSource,
    out: &mut Vec<NoteTrigger>,
) {
    let dynamics = section.dynamics();
    let r = random.next_f64();
    let note = |slot, pitch, length, velocity, offset_secs| NoteTrigger {
        layer: index,
        slot,
        pitch,
        offset_secs,
        length,
        velocity,
    };

    if layer.slots.pad && tick % PAD_INTERVAL == 0 && section != Section::Drop {
        for &pitch in chord.notes() {
            out.push(note(Slot::Pad, pitch, NoteValue::Half, 1.0, 0.0));
        }
    }

    if layer.slots.bass && dynamics.allow_bass {
        match layer.style {
            Style::Cyberpunk | Style::Retrowave => {
                if section == Section::Drop || tick % 2 == 0 {
                    if let Some(root) = chord.root() {
                        out.push(note(Slot::Bass, drop_root(root, true), NoteValue::Eighth, 1.0, 0.0));
                    }
                }
            }
            Style::Acid => {
                if random.next_f64() > ACID_GATE {
                    let i = random.pick_index(chord.len().max(1));
                    if let Some(pitch) = chord.note_wrapped(i) {
                        out.push(note(Slot::Bass, pitch, NoteValue::Sixteenth, 1.0, 0.0));
                    }
                }
            }
            _ => {
                if tick % ROOT_BASS_INTERVAL == 0 {
                    if let Some(root) = chord.root() {
                        out.push(note(Slot::Bass, drop_root(root, false), NoteValue::Quarter, 1.0, 0.0));
                    }
                }
            }
        }
    }

    if layer.slots.lead && dynamics.allow_lead && r < dynamics.density {
        let i = random.pick_index(chord.len().max(1));
        let velocity = band.sample(random.next_f64());
        let offset = random.next_f64() * 2.0 * TIMING_SPREAD_SECS - TIMING_SPREAD_SECS;
        let length = match section {
            Section::Build if random.next_f64() > 0.5 => NoteValue::Sixteenth,
            Section::Breakdown => NoteValue::Half,
            _ => NoteValue::Eighth,
        };
        if let Some(pitch) = chord.note_wrapped(i) {
            out.push(note(Slot::Lead, pitch, length, velocity, offset));
        }
    }
}
