//! Style catalog — the selectable genres, their base tempos, and style sets.

pub mod recipe;
pub mod set;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use recipe::{oracle_pick, MixRecipe, MIX_RECIPES};
pub use set::{StyleSet, MAX_STYLES};

/// A selectable musical genre. Keys the progression, tempo and voice tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Cyberpunk,
    Lofi,
    Ambient,
    EightBit,
    Cinematic,
    Retrowave,
    Acid,
    Trap,
    DeepHouse,
    Glitch,
}

impl Style {
    pub const ALL: [Style; 10] = [
        Style::Cyberpunk,
        Style::Lofi,
        Style::Ambient,
        Style::EightBit,
        Style::Cinematic,
        Style::Retrowave,
        Style::Acid,
        Style::Trap,
        Style::DeepHouse,
        Style::Glitch,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Style::Cyberpunk => "cyberpunk",
            Style::Lofi => "lofi",
            Style::Ambient => "ambient",
            Style::EightBit => "eight_bit",
            Style::Cinematic => "cinematic",
            Style::Retrowave => "retrowave",
            Style::Acid => "acid",
            Style::Trap => "trap",
            Style::DeepHouse => "deep_house",
            Style::Glitch => "glitch",
        }
    }

    /// Tempo in BPM a session starts at when this style is primary.
    pub fn base_tempo(self) -> f64 {
        match self {
            Style::Lofi => 85.0,
            Style::Ambient => 70.0,
            Style::Trap | Style::Glitch => 145.0,
            Style::DeepHouse => 124.0,
            _ => 120.0,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let style = match normalized.as_str() {
            "cyberpunk" => Style::Cyberpunk,
            "lofi" | "lo_fi" => Style::Lofi,
            "ambient" => Style::Ambient,
            "eight_bit" | "8bit" | "8_bit" => Style::EightBit,
            "cinematic" => Style::Cinematic,
            "retrowave" => Style::Retrowave,
            "acid" => Style::Acid,
            "trap" => Style::Trap,
            "deep_house" | "deephouse" => Style::DeepHouse,
            "glitch" => Style::Glitch,
            _ => return Err(SelectionError::UnknownStyle(s.to_string())),
        };
        Ok(style)
    }
}

/// Errors raised while turning user input into a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no styles selected")]
    Empty,
    #[error("{0} styles selected, at most 3 allowed")]
    TooMany(usize),
    #[error("unknown style: {0}")]
    UnknownStyle(String),
    #[error("unknown emotion: {0}")]
    UnknownEmotion(String),
    #[error("unknown mix recipe: {0}")]
    UnknownRecipe(String),
}
