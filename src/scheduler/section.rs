//! Song sections, their dynamics and the arrangement that orders them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default number of ticks per section.
pub const DEFAULT_SECTION_LENGTH: u64 = 64;

/// A structural part of the song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Verse,
    Build,
    Drop,
    Breakdown,
    Outro,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Intro,
        Section::Verse,
        Section::Build,
        Section::Drop,
        Section::Breakdown,
        Section::Outro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Intro => "INTRO",
            Section::Verse => "VERSE",
            Section::Build => "BUILD",
            Section::Drop => "DROP",
            Section::Breakdown => "BREAKDOWN",
            Section::Outro => "OUTRO",
        }
    }

    pub fn dynamics(self) -> SectionDynamics {
        let (density, allow_bass, allow_lead) = match self {
            Section::Intro => (0.2, false, true),
            Section::Verse => (0.5, true, true),
            Section::Build => (0.8, true, true),
            Section::Drop => (1.0, true, true),
            Section::Breakdown => (0.3, true, false),
            Section::Outro => (0.2, false, true),
        };
        SectionDynamics {
            density,
            allow_bass,
            allow_lead,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}

/// Per-section performance policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionDynamics {
    /// Probability that a lead note fires on a tick.
    pub density: f64,
    pub allow_bass: bool,
    pub allow_lead: bool,
}

/// The ordered sections of one song cycle. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct Arrangement {
    sections: Vec<Section>,
}

impl Arrangement {
    /// Build from a list; an empty list is rejected.
    pub fn new(sections: Vec<Section>) -> Option<Self> {
        if sections.is_empty() {
            None
        } else {
            Some(Self { sections })
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn first(&self) -> Section {
        self.sections.first().copied().unwrap_or(Section::Intro)
    }

    /// Ticks in one full cycle at `section_length` ticks per section.
    pub fn cycle_ticks(&self, section_length: u64) -> u64 {
        self.sections.len() as u64 * section_length.max(1)
    }

    /// Section playing at `tick`. The arrangement wraps after its last section.
    pub fn section_at(&self, tick: u64, section_length: u64) -> Section {
        let section_length = section_length.max(1);
        let position = tick % self.cycle_ticks(section_length);
        self.sections[(position / section_length) as usize]
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self {
            sections: vec![
                Section::Intro,
                Section::Verse,
                Section::Build,
                Section::Drop,
                Section::Outro,
            ],
        }
    }
}

impl TryFrom<Vec<Section>> for Arrangement {
    type Error = String;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::new(sections).ok_or_else(|| "arrangement needs at least one section".to_string())
    }
}

impl From<Arrangement> for Vec<Section> {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.sections
    }
}
