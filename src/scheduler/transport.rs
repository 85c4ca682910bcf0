//! Transport — play/stop control and drift-free eighth-note tick generation.
//!
//! The transport is advanced once per output sample at the current (possibly
//! ramping) tempo. A fractional accumulator carries the remainder between
//! ticks so long sessions never drift.

use super::section::Section;

/// Ticks per beat: one tick is an eighth note.
pub const TICKS_PER_BEAT: f64 = 2.0;

/// Seconds per tick at `bpm`.
pub fn tick_duration_secs(bpm: f64) -> f64 {
    60.0 / bpm / TICKS_PER_BEAT
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Song position reported to the rest of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportState {
    /// Last tick performed; counts monotonically from 0 each session.
    pub tick: u64,
    pub chord_index: usize,
    pub section: Section,
}

impl TransportState {
    pub fn initial(section: Section) -> Self {
        Self {
            tick: 0,
            chord_index: 0,
            section,
        }
    }
}

/// Sample-clocked tick source.
#[derive(Debug)]
pub struct Transport {
    sample_rate: u32,
    state: PlayState,
    next_tick: u64,
    /// Fractional tick accumulator. A tick fires when it reaches 1.
    phase: f64,
}

impl Transport {
    /// Create a stopped transport whose first tick fires on the first sample.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            state: PlayState::Stopped,
            next_tick: 0,
            phase: 1.0,
        }
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
    }

    /// Rewind to tick 0 without changing play state.
    pub fn reset(&mut self) {
        self.next_tick = 0;
        self.phase = 1.0;
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Number of ticks fired since the last reset.
    pub fn ticks_elapsed(&self) -> u64 {
        self.next_tick
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Advance one sample at `bpm`. Returns the tick that falls on this
    /// sample, if any. Stopped transports never tick.
    #[inline]
    pub fn advance_sample(&mut self, bpm: f64) -> Option<u64> {
        if self.state == PlayState::Stopped {
            return None;
        }
        let fired = if self.phase >= 1.0 {
            self.phase -= 1.0;
            let tick = self.next_tick;
            self.next_tick += 1;
            Some(tick)
        } else {
            None
        };
        self.phase += bpm / 60.0 * TICKS_PER_BEAT / self.sample_rate as f64;
        fired
    }
}
