//! Transport & scheduler — song structure, harmony and per-tick performance.
//!
//! One tick is an eighth note. On every tick the scheduler derives the
//! section from the arrangement, advances the chord every `chord_ticks`
//! ticks and asks the performer what each layer plays.

pub mod notify;
pub mod performer;
pub mod random;
pub mod section;
pub mod transport;

pub use notify::{subscription, Notification, NotificationReceiver, Notifier};
pub use performer::{NoteTrigger, NoteValue, PerformerLayer};
pub use random::{FixedSequence, RandomSource};
pub use section::{Arrangement, Section, SectionDynamics, DEFAULT_SECTION_LENGTH};
pub use transport::{tick_duration_secs, PlayState, Transport, TransportState};

use crate::emotion::VelocityBand;
use crate::theory::{ChordLabel, Progression};

/// Default ticks between chord changes (two bars).
pub const DEFAULT_CHORD_TICKS: u64 = 16;

/// Structure settings for a scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureConfig {
    pub section_length: u64,
    pub chord_ticks: u64,
    pub arrangement: Arrangement,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            section_length: DEFAULT_SECTION_LENGTH,
            chord_ticks: DEFAULT_CHORD_TICKS,
            arrangement: Arrangement::default(),
        }
    }
}

/// Result of one tick. Reused between ticks to avoid allocation.
#[derive(Debug, Default)]
pub struct TickOutput {
    pub notes: Vec<NoteTrigger>,
    pub section_changed: Option<Section>,
    pub chord_changed: Option<ChordLabel>,
}

impl TickOutput {
    pub fn with_capacity(notes: usize) -> Self {
        Self {
            notes: Vec::with_capacity(notes),
            section_changed: None,
            chord_changed: None,
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.section_changed = None;
        self.chord_changed = None;
    }
}

pub struct Scheduler {
    structure: StructureConfig,
    progression: Option<Progression>,
    state: TransportState,
    random: Box<dyn RandomSource>,
}

impl Scheduler {
    pub fn new(structure: StructureConfig, random: Box<dyn RandomSource>) -> Self {
        let mut structure = structure;
        structure.section_length = structure.section_length.max(1);
        structure.chord_ticks = structure.chord_ticks.max(1);
        let first = structure.arrangement.first();
        Self {
            structure,
            progression: None,
            state: TransportState::initial(first),
            random,
        }
    }

    /// Bind a progression and rewind to the top of the arrangement.
    pub fn start(&mut self, progression: Progression) {
        self.progression = Some(progression);
        self.reset();
    }

    /// Unbind the progression and rewind. Ticks are ignored until the next start.
    pub fn stop(&mut self) {
        self.progression = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = TransportState::initial(self.structure.arrangement.first());
    }

    pub fn is_active(&self) -> bool {
        self.progression.is_some()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn structure(&self) -> &StructureConfig {
        &self.structure
    }

    pub fn progression(&self) -> Option<Progression> {
        self.progression
    }

    /// Label of the chord currently sounding.
    pub fn current_chord(&self) -> Option<ChordLabel> {
        self.progression
            .map(|p| p.chord(self.state.chord_index).label())
    }

    /// Run tick `tick` for every layer and fill `out`.
    pub fn tick(&mut self, tick: u64, layers: &[PerformerLayer], band: VelocityBand, out: &mut TickOutput) {
        out.clear();
        let Some(progression) = self.progression else {
            return;
        };
        let section_length = self.structure.section_length;
        let chord_ticks = self.structure.chord_ticks;

        let section = self.structure.arrangement.section_at(tick, section_length);
        if tick % section_length == 0 {
            out.section_changed = Some(section);
        }

        let mut chord_index = self.state.chord_index;
        if tick == 0 {
            chord_index = 0;
            out.chord_changed = Some(progression.chord(0).label());
        } else if tick % chord_ticks == 0 {
            chord_index = (chord_index + 1) % progression.len().max(1);
            out.chord_changed = Some(progression.chord(chord_index).label());
        }

        self.state = TransportState {
            tick,
            chord_index,
            section,
        };

        let chord = progression.chord(chord_index);
        for (index, layer) in layers.iter().enumerate() {
            performer::perform_layer(
                index,
                *layer,
                tick,
                section,
                &chord,
                band,
                self.random.as_mut(),
                &mut out.notes,
            );
        }
    }
}
