//! Absolute pitches — note-name parsing, naming, and frequency conversion.

use std::fmt;

/// Pitch class semitone offsets from C.
pub const C: u8 = 0;
pub const CS: u8 = 1;
pub const D: u8 = 2;
pub const DS: u8 = 3;
pub const E: u8 = 4;
pub const F: u8 = 5;
pub const FS: u8 = 6;
pub const G: u8 = 7;
pub const GS: u8 = 8;
pub const A: u8 = 9;
pub const AS: u8 = 10;
pub const B: u8 = 11;

const CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// An octave-qualified pitch stored as a MIDI note number (C4 = 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch(u8);

/// Build a pitch from a pitch class and an octave at compile time.
///
/// Out-of-range combinations saturate to the MIDI range.
pub const fn pitch(class: u8, octave: i32) -> Pitch {
    let midi = (octave + 1) * 12 + class as i32;
    if midi < 0 {
        Pitch(0)
    } else if midi > 127 {
        Pitch(127)
    } else {
        Pitch(midi as u8)
    }
}

impl Pitch {
    /// Wrap a raw MIDI note number, clamped to 0–127.
    pub fn from_midi(note: u8) -> Self {
        Self(note.min(127))
    }

    /// Parse a note name such as `C3`, `D#3`, `Bb2` or `C-1`.
    ///
    /// Format: `<letter><optional accidental><octave>`; the letter may be
    /// lowercase. Returns `None` for malformed names or notes outside MIDI range.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let base: i32 = match chars.next()?.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let rest = chars.as_str();
        let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
            (1, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (-1, r)
        } else {
            (0, rest)
        };

        let octave: i32 = octave_str.parse().ok()?;
        let midi = (octave + 1) * 12 + base + accidental;
        if (0..=127).contains(&midi) {
            Some(Self(midi as u8))
        } else {
            None
        }
    }

    /// MIDI note number.
    pub fn midi(self) -> u8 {
        self.0
    }

    /// Pitch class 0–11 (C = 0).
    pub fn class(self) -> u8 {
        self.0 % 12
    }

    /// Scientific-notation octave (C4 = middle C).
    pub fn octave(self) -> i32 {
        self.0 as i32 / 12 - 1
    }

    /// Pitch-class name without octave, using sharps (`"D#"`).
    pub fn class_name(self) -> &'static str {
        CLASS_NAMES[self.class() as usize]
    }

    /// Transpose by a number of semitones, saturating at the MIDI range.
    pub fn transpose(self, semitones: i32) -> Self {
        Self((self.0 as i32 + semitones).clamp(0, 127) as u8)
    }

    /// Frequency in Hz, A4 = 440 Hz.
    pub fn frequency(self) -> f64 {
        440.0 * 2.0f64.powf((self.0 as f64 - 69.0) / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class_name(), self.octave())
    }
}
