//! Engine status published through atomics for other threads.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::control::{ControlParam, DjControls};
use crate::emotion::Emotion;
use crate::scheduler::Section;

#[derive(Debug)]
struct StatusCells {
    playing: AtomicBool,
    section: AtomicU8,
    emotion: AtomicU8,
    layer_count: AtomicUsize,
    tick: AtomicU64,
    controls: [AtomicU64; 4],
}

/// Read-mostly view of the engine's state. Clones share the same cells.
#[derive(Debug, Clone)]
pub struct EngineStatus {
    cells: Arc<StatusCells>,
}

fn section_code(section: Section) -> u8 {
    Section::ALL.iter().position(|&s| s == section).unwrap_or(0) as u8
}

fn emotion_code(emotion: Option<Emotion>) -> u8 {
    emotion
        .and_then(|e| Emotion::ALL.iter().position(|&x| x == e))
        .map_or(0, |i| i as u8 + 1)
}

fn param_index(param: ControlParam) -> usize {
    match param {
        ControlParam::Bpm => 0,
        ControlParam::Filter => 1,
        ControlParam::Reverb => 2,
        ControlParam::Volume => 3,
    }
}

impl EngineStatus {
    pub fn new(controls: DjControls) -> Self {
        let status = Self {
            cells: Arc::new(StatusCells {
                playing: AtomicBool::new(false),
                section: AtomicU8::new(section_code(Section::Intro)),
                emotion: AtomicU8::new(0),
                layer_count: AtomicUsize::new(0),
                tick: AtomicU64::new(0),
                controls: std::array::from_fn(|_| AtomicU64::new(0)),
            }),
        };
        status.set_controls(&controls);
        status
    }

    pub fn is_playing(&self) -> bool {
        self.cells.playing.load(Ordering::Acquire)
    }

    pub fn section(&self) -> Section {
        let code = self.cells.section.load(Ordering::Acquire) as usize;
        Section::ALL.get(code).copied().unwrap_or(Section::Intro)
    }

    pub fn emotion(&self) -> Option<Emotion> {
        match self.cells.emotion.load(Ordering::Acquire) {
            0 => None,
            code => Emotion::ALL.get(code as usize - 1).copied(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.cells.layer_count.load(Ordering::Acquire)
    }

    pub fn tick(&self) -> u64 {
        self.cells.tick.load(Ordering::Acquire)
    }

    pub fn control(&self, param: ControlParam) -> f64 {
        f64::from_bits(self.cells.controls[param_index(param)].load(Ordering::Acquire))
    }

    pub fn controls(&self) -> DjControls {
        DjControls {
            bpm: self.control(ControlParam::Bpm),
            filter: self.control(ControlParam::Filter),
            reverb: self.control(ControlParam::Reverb),
            volume: self.control(ControlParam::Volume),
        }
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.cells.playing.store(playing, Ordering::Release);
    }

    pub(crate) fn set_section(&self, section: Section) {
        self.cells.section.store(section_code(section), Ordering::Release);
    }

    pub(crate) fn set_emotion(&self, emotion: Option<Emotion>) {
        self.cells.emotion.store(emotion_code(emotion), Ordering::Release);
    }

    pub(crate) fn set_layer_count(&self, count: usize) {
        self.cells.layer_count.store(count, Ordering::Release);
    }

    pub(crate) fn set_tick(&self, tick: u64) {
        self.cells.tick.store(tick, Ordering::Release);
    }

    pub(crate) fn set_controls(&self, controls: &DjControls) {
        for param in ControlParam::ALL {
            self.cells.controls[param_index(param)].store(controls.get(param).to_bits(), Ordering::Release);
        }
    }
}
