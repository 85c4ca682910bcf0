//! Music theory data — pitches, chords, and the per-style progression library.

pub mod chord;
pub mod pitch;
pub mod progression;

pub use chord::{Chord, ChordLabel, ChordQuality};
pub use pitch::{pitch, Pitch};
pub use progression::Progression;
