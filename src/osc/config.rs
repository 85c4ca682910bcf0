//! OSC configuration — listen port and address mappings.

use serde::{Deserialize, Serialize};

use super::mapping::{OscMapping, OscTarget};
use crate::control::ControlParam;

/// OSC settings, read from the `osc` section of the engine config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscConfig {
    /// Start the listener even without `--osc`.
    #[serde(default)]
    pub enabled: bool,
    /// UDP port to listen on.
    #[serde(default = "default_port")]
    pub listen_port: u16,
    #[serde(default = "OscConfig::default_mappings")]
    pub mappings: Vec<OscMapping>,
}

fn default_port() -> u16 {
    9000
}

impl OscConfig {
    /// `/bpm`, `/filter`, `/reverb`, `/volume`, `/emotion`, `/play`, `/stop`, `/toggle`.
    fn default_mappings() -> Vec<OscMapping> {
        let mut mappings: Vec<OscMapping> = ControlParam::ALL
            .into_iter()
            .map(|param| OscMapping::new(&format!("/{}", param.name()), OscTarget::Control(param)))
            .collect();
        mappings.push(OscMapping::new("/emotion", OscTarget::Emotion));
        mappings.push(OscMapping::new("/play", OscTarget::Play));
        mappings.push(OscMapping::new("/stop", OscTarget::Stop));
        mappings.push(OscMapping::new("/toggle", OscTarget::Toggle));
        mappings
    }
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_port: default_port(),
            mappings: Self::default_mappings(),
        }
    }
}
