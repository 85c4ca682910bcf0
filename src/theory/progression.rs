//! Per-style chord progressions with a default fallback.

use super::chord::Chord;
use super::pitch::*;
use crate::style::Style;

/// A cyclic chord sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    name: &'static str,
    chords: &'static [Chord],
}

// i - VI - VII - iv
const CYBERPUNK: &[Chord] = &[
    Chord::triad(pitch(C, 3), pitch(DS, 3), pitch(G, 3)),
    Chord::triad(pitch(GS, 2), pitch(C, 3), pitch(DS, 3)),
    Chord::triad(pitch(AS, 2), pitch(D, 3), pitch(F, 3)),
    Chord::triad(pitch(F, 2), pitch(GS, 2), pitch(C, 3)),
];

// Imaj7 - IVmaj7 - ii7 - V7
const LOFI: &[Chord] = &[
    Chord::seventh(pitch(C, 3), pitch(E, 3), pitch(G, 3), pitch(B, 3)),
    Chord::seventh(pitch(F, 3), pitch(A, 3), pitch(C, 4), pitch(E, 4)),
    Chord::seventh(pitch(D, 3), pitch(F, 3), pitch(A, 3), pitch(C, 4)),
    Chord::seventh(pitch(G, 3), pitch(B, 3), pitch(D, 4), pitch(F, 4)),
];

const AMBIENT: &[Chord] = &[
    Chord::seventh(pitch(F, 2), pitch(A, 2), pitch(C, 3), pitch(E, 3)),
    Chord::seventh(pitch(G, 2), pitch(B, 2), pitch(D, 3), pitch(F, 3)),
    Chord::seventh(pitch(E, 2), pitch(G, 2), pitch(B, 2), pitch(D, 3)),
    Chord::seventh(pitch(A, 2), pitch(C, 3), pitch(E, 3), pitch(G, 3)),
];

const CINEMATIC: &[Chord] = &[
    Chord::triad(pitch(D, 2), pitch(F, 2), pitch(A, 2)),
    Chord::triad(pitch(AS, 1), pitch(D, 2), pitch(F, 2)),
    Chord::triad(pitch(C, 2), pitch(E, 2), pitch(G, 2)),
    Chord::triad(pitch(G, 1), pitch(AS, 1), pitch(D, 2)),
];

const RETROWAVE: &[Chord] = &[
    Chord::triad(pitch(C, 3), pitch(G, 3), pitch(C, 4)),
    Chord::triad(pitch(AS, 2), pitch(F, 3), pitch(AS, 3)),
    Chord::triad(pitch(GS, 2), pitch(DS, 3), pitch(GS, 3)),
    Chord::triad(pitch(G, 2), pitch(D, 3), pitch(G, 3)),
];

const DEFAULT: &[Chord] = &[
    Chord::triad(pitch(C, 3), pitch(E, 3), pitch(G, 3)),
    Chord::triad(pitch(F, 3), pitch(A, 3), pitch(C, 4)),
    Chord::triad(pitch(A, 2), pitch(C, 3), pitch(E, 3)),
    Chord::triad(pitch(G, 2), pitch(B, 2), pitch(D, 3)),
];

impl Progression {
    /// The fallback used when no style-specific progression exists.
    pub const DEFAULT: Progression = Progression {
        name: "default",
        chords: DEFAULT,
    };

    /// Look up the progression for a primary style, falling back to [`Progression::DEFAULT`].
    pub fn for_style(style: Style) -> Self {
        let (name, chords) = match style {
            Style::Cyberpunk => ("cyberpunk", CYBERPUNK),
            Style::Lofi => ("lofi", LOFI),
            Style::Ambient => ("ambient", AMBIENT),
            Style::Cinematic => ("cinematic", CINEMATIC),
            Style::Retrowave => ("retrowave", RETROWAVE),
            _ => return Self::DEFAULT,
        };
        Self { name, chords }
    }

    /// Look up by an optional style; `None` yields the default progression.
    pub fn for_primary(style: Option<Style>) -> Self {
        style.map(Self::for_style).unwrap_or(Self::DEFAULT)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Chord at `index`, wrapped modulo the progression length.
    pub fn chord(&self, index: usize) -> Chord {
        if self.chords.is_empty() {
            return Chord::from_notes(&[]);
        }
        self.chords[index % self.chords.len()]
    }

    pub fn chords(&self) -> &'static [Chord] {
        self.chords
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::DEFAULT
    }
}
