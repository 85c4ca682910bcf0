//! Emotion modulator — mood presets layered on top of the style tempo.
//!
//! An emotion scales the base tempo and recentres the velocity band used
//! for lead humanization. Only one emotion is active at a time; clearing it
//! leaves the current tempo where it is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::control::ControlParam;
use crate::style::SelectionError;

/// Seconds the transport takes to reach an emotion's tempo.
pub const EMOTION_RAMP_SECS: f64 = 1.0;

/// Velocity band width around an emotion's velocity base.
const VELOCITY_SPREAD: f64 = 0.4;

/// Band used when no emotion is active.
const NEUTRAL_VELOCITY: VelocityBand = VelocityBand { low: 0.6, high: 1.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Calm,
    Excited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tonality {
    Major,
    Minor,
}

/// The modifiers an emotion carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionParams {
    pub tonality: Tonality,
    pub bpm_multiplier: f64,
    /// Filter brightness, 0.0–1.0.
    pub brightness: f64,
    /// Reverb amount, 0.0–1.0.
    pub reverb_amount: f64,
    /// Centre of the humanized velocity band, 0.0–1.0.
    pub velocity_base: f64,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Calm,
        Emotion::Excited,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Calm => "calm",
            Emotion::Excited => "excited",
        }
    }

    pub fn params(self) -> EmotionParams {
        let (tonality, bpm_multiplier, brightness, reverb_amount, velocity_base) = match self {
            Emotion::Happy => (Tonality::Major, 1.2, 0.8, 0.2, 0.85),
            Emotion::Sad => (Tonality::Minor, 0.7, 0.3, 0.5, 0.6),
            Emotion::Angry => (Tonality::Minor, 1.4, 1.0, 0.1, 0.95),
            Emotion::Calm => (Tonality::Major, 0.8, 0.4, 0.6, 0.65),
            Emotion::Excited => (Tonality::Major, 1.3, 0.9, 0.3, 0.9),
        };
        EmotionParams {
            tonality,
            bpm_multiplier,
            brightness,
            reverb_amount,
            velocity_base,
        }
    }

    /// Tempo this emotion asks for on top of `base_tempo`, kept inside the
    /// bpm control range.
    pub fn tempo(self, base_tempo: f64) -> f64 {
        ControlParam::Bpm.clamp(base_tempo * self.params().bpm_multiplier)
    }

    /// Parse an emotion name, where `none` (or an empty string) clears it.
    pub fn parse_optional(s: &str) -> Result<Option<Emotion>, SelectionError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(None),
            _ => s.parse().map(Some),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Emotion {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| SelectionError::UnknownEmotion(s.to_string()))
    }
}

/// Inclusive velocity range for humanized notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityBand {
    pub low: f64,
    pub high: f64,
}

impl VelocityBand {
    /// Map a uniform draw in `[0, 1)` into the band.
    pub fn sample(&self, unit: f64) -> f64 {
        self.low + unit * (self.high - self.low)
    }
}

/// Tracks the selected emotion and derives tempo targets and dynamics from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionModulator {
    current: Option<Emotion>,
}

impl EmotionModulator {
    pub fn new(initial: Option<Emotion>) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Option<Emotion> {
        self.current
    }

    /// Store the emotion. Returns the tempo to move to when an emotion is
    /// set and a session base tempo is known; clearing never changes tempo.
    pub fn apply(&mut self, emotion: Option<Emotion>, base_tempo: Option<f64>) -> Option<f64> {
        self.current = emotion;
        Some(emotion?.tempo(base_tempo?))
    }

    /// Tempo target for a freshly started session.
    pub fn session_tempo(&self, base_tempo: f64) -> f64 {
        match self.current {
            Some(emotion) => emotion.tempo(base_tempo),
            None => base_tempo,
        }
    }

    pub fn velocity_band(&self) -> VelocityBand {
        match self.current {
            Some(emotion) => {
                let base = emotion.params().velocity_base;
                let half = VELOCITY_SPREAD / 2.0;
                VelocityBand {
                    low: (base - half).clamp(0.0, 1.0),
                    high: (base + half).clamp(0.0, 1.0),
                }
            }
            None => NEUTRAL_VELOCITY,
        }
    }
}
