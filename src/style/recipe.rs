//! Mix recipes — curated style triples, plus the random "oracle" pick.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{SelectionError, Style, StyleSet, MAX_STYLES};

/// A named preset combination of three styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixRecipe {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub styles: [Style; MAX_STYLES],
}

pub static MIX_RECIPES: [MixRecipe; 7] = [
    MixRecipe {
        id: "cyber-chase",
        name: "Neon Chase",
        description: "High energy cyberpunk with acid bass",
        styles: [Style::Cyberpunk, Style::Acid, Style::Glitch],
    },
    MixRecipe {
        id: "retro-dream",
        name: "Midnight Dream",
        description: "Nostalgic chill for late nights",
        styles: [Style::Lofi, Style::Retrowave, Style::Ambient],
    },
    MixRecipe {
        id: "epic-game",
        name: "Epic Level",
        description: "Orchestral chiptune with trap beats",
        styles: [Style::Cinematic, Style::EightBit, Style::Trap],
    },
    MixRecipe {
        id: "deep-focus",
        name: "Deep Focus",
        description: "Deep grooves for work and study",
        styles: [Style::DeepHouse, Style::Ambient, Style::Lofi],
    },
    MixRecipe {
        id: "night-drive",
        name: "Night Drive",
        description: "Cinematic synthwave for driving",
        styles: [Style::Retrowave, Style::Cyberpunk, Style::Cinematic],
    },
    MixRecipe {
        id: "glitch-hop",
        name: "Glitch Hop",
        description: "Broken beats with retro textures",
        styles: [Style::Glitch, Style::Trap, Style::EightBit],
    },
    MixRecipe {
        id: "acid-rain",
        name: "Acid Rain",
        description: "Psychedelic acid lines in rain",
        styles: [Style::Acid, Style::Ambient, Style::DeepHouse],
    },
];

impl MixRecipe {
    /// Look a recipe up by id; `_` and `-` are interchangeable.
    pub fn find(id: &str) -> Result<&'static MixRecipe, SelectionError> {
        let wanted = id.trim().to_ascii_lowercase().replace('_', "-");
        MIX_RECIPES
            .iter()
            .find(|recipe| recipe.id == wanted)
            .ok_or_else(|| SelectionError::UnknownRecipe(id.to_string()))
    }

    pub fn style_set(&self) -> StyleSet {
        StyleSet::truncated(&self.styles).unwrap_or_else(|_| StyleSet::single(self.styles[0]))
    }
}

/// Three distinct styles chosen uniformly at random.
pub fn oracle_pick<R: Rng + ?Sized>(rng: &mut R) -> StyleSet {
    let picked: Vec<Style> = Style::ALL
        .choose_multiple(rng, MAX_STYLES)
        .copied()
        .collect();
    StyleSet::truncated(&picked).unwrap_or_else(|_| StyleSet::single(Style::Cyberpunk))
}
