//! OSC message mapping — converts OSC addresses and arguments to control events.

use rosc::{OscMessage, OscType};
use serde::{Deserialize, Serialize};

use crate::control::{ControlEvent, ControlParam};
use crate::emotion::Emotion;
use crate::style::{MixRecipe, Style, StyleSet};

/// What an OSC message maps to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OscTarget {
    /// Set a DJ control (expects a numeric arg in user units).
    Control(ControlParam),
    /// Select an emotion by name; `none` or no argument clears it.
    Emotion,
    /// Start a session. String args name styles or a single mix recipe;
    /// without args the last session resumes.
    Play,
    Stop,
    Toggle,
}

/// A mapping from an OSC address to a target action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OscMapping {
    pub address_pattern: String,
    pub target: OscTarget,
}

impl OscMapping {
    pub fn new(address: &str, target: OscTarget) -> Self {
        Self {
            address_pattern: address.to_string(),
            target,
        }
    }
}

/// Apply an OSC message against mappings to produce a control event.
pub fn apply_osc_message(msg: &OscMessage, mappings: &[OscMapping]) -> Option<ControlEvent> {
    let mapping = mappings
        .iter()
        .find(|m| osc_address_matches(&msg.addr, &m.address_pattern))?;
    match mapping.target {
        OscTarget::Control(param) => {
            let value = extract_float(&msg.args, 0)?;
            Some(ControlEvent::SetControl(param, param.clamp(value)))
        }
        OscTarget::Emotion => match extract_string(&msg.args, 0) {
            None => Some(ControlEvent::SetEmotion(None)),
            Some(name) => Emotion::parse_optional(name).ok().map(ControlEvent::SetEmotion),
        },
        OscTarget::Play => {
            let names: Vec<&str> = msg
                .args
                .iter()
                .filter_map(|arg| match arg {
                    OscType::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            if names.is_empty() {
                return Some(ControlEvent::Resume);
            }
            if let [single] = names.as_slice() {
                if let Ok(recipe) = MixRecipe::find(single) {
                    return Some(ControlEvent::Start(recipe.style_set()));
                }
            }
            let styles: Vec<Style> = names.iter().filter_map(|n| n.parse().ok()).collect();
            StyleSet::truncated(&styles).ok().map(ControlEvent::Start)
        }
        OscTarget::Stop => Some(ControlEvent::Stop),
        OscTarget::Toggle => Some(ControlEvent::Toggle),
    }
}

/// Exact address match.
fn osc_address_matches(addr: &str, pattern: &str) -> bool {
    addr == pattern
}

/// Extract a number from OSC args at the given index.
fn extract_float(args: &[OscType], index: usize) -> Option<f64> {
    args.get(index).and_then(|arg| match arg {
        OscType::Float(f) => Some(*f as f64),
        OscType::Double(d) => Some(*d),
        OscType::Int(i) => Some(*i as f64),
        OscType::Long(l) => Some(*l as f64),
        _ => None,
    })
}

fn extract_string(args: &[OscType], index: usize) -> Option<&str> {
    args.get(index).and_then(|arg| match arg {
        OscType::String(s) => Some(s.as_str()),
        _ => None,
    })
}
