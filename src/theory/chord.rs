//! Chords and their human-readable labels.

use std::fmt;

use super::pitch::Pitch;

/// Maximum number of notes a chord can hold.
pub const MAX_CHORD_NOTES: usize = 4;

/// An ordered set of absolute pitches sounding together. The first note is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    notes: [Pitch; MAX_CHORD_NOTES],
    len: u8,
}

impl Chord {
    pub const fn triad(root: Pitch, third: Pitch, fifth: Pitch) -> Self {
        Self {
            notes: [root, third, fifth, root],
            len: 3,
        }
    }

    pub const fn seventh(root: Pitch, third: Pitch, fifth: Pitch, seventh: Pitch) -> Self {
        Self {
            notes: [root, third, fifth, seventh],
            len: 4,
        }
    }

    /// Build from a slice; notes past [`MAX_CHORD_NOTES`] are dropped.
    pub fn from_notes(notes: &[Pitch]) -> Self {
        let mut chord = Self {
            notes: [Pitch::from_midi(0); MAX_CHORD_NOTES],
            len: 0,
        };
        for (slot, note) in chord.notes.iter_mut().zip(notes) {
            *slot = *note;
            chord.len += 1;
        }
        chord
    }

    pub fn notes(&self) -> &[Pitch] {
        &self.notes[..self.len as usize]
    }

    /// The lowest-listed note. Chords in the catalog always have at least three.
    pub fn root(&self) -> Option<Pitch> {
        self.notes().first().copied()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Note at `index`, wrapped modulo the chord size.
    pub fn note_wrapped(&self, index: usize) -> Option<Pitch> {
        let notes = self.notes();
        if notes.is_empty() {
            None
        } else {
            Some(notes[index % notes.len()])
        }
    }

    /// Root name plus quality, e.g. `Cm`, `Fmaj7`, `C5`.
    pub fn label(&self) -> ChordLabel {
        let Some(root) = self.root() else {
            return ChordLabel {
                root: "",
                quality: ChordQuality::Unknown,
            };
        };
        ChordLabel {
            root: root.class_name(),
            quality: ChordQuality::classify(root, self.notes()),
        }
    }
}

/// Harmonic quality inferred from the intervals above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Major7,
    Minor7,
    Dominant7,
    Power,
    Diminished,
    Augmented,
    Unknown,
}

impl ChordQuality {
    fn classify(root: Pitch, notes: &[Pitch]) -> Self {
        // Bitmask of pitch-class intervals above the root, octave-folded.
        let mut mask: u16 = 0;
        for note in notes {
            let interval = (note.midi() as i32 - root.midi() as i32).rem_euclid(12);
            mask |= 1 << interval;
        }
        let has = |i: u16| mask & (1 << i) != 0;

        match (has(3), has(4), has(6), has(7), has(8), has(10), has(11)) {
            (false, true, _, true, _, false, true) => ChordQuality::Major7,
            (true, false, _, true, _, true, false) => ChordQuality::Minor7,
            (false, true, _, true, _, true, false) => ChordQuality::Dominant7,
            (false, true, _, true, _, _, _) => ChordQuality::Major,
            (true, false, _, true, _, _, _) => ChordQuality::Minor,
            (true, false, true, false, _, _, _) => ChordQuality::Diminished,
            (false, true, _, false, true, _, _) => ChordQuality::Augmented,
            (false, false, _, true, _, _, _) => ChordQuality::Power,
            _ => ChordQuality::Unknown,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major | ChordQuality::Unknown => "",
            ChordQuality::Minor => "m",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Power => "5",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
        }
    }
}

/// Allocation-free chord label, rendered with `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordLabel {
    pub root: &'static str,
    pub quality: ChordQuality,
}

impl fmt::Display for ChordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}
