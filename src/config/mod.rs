//! Engine configuration — loaded from `~/.vibe-oracle/config.yaml`.
//!
//! Every field has a default, so a partial file (or no file) is fine.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::control::DjControls;
use crate::emotion::Emotion;
use crate::osc::OscConfig;
use crate::scheduler::{Arrangement, StructureConfig, DEFAULT_CHORD_TICKS, DEFAULT_SECTION_LENGTH};

/// Sample rate used for offline rendering when none is configured.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_CHANNELS: u16 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Output sample rate. Live playback uses the device default when unset.
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    /// Seed for reproducible performances; entropy when unset.
    pub seed: Option<u64>,
    /// Ticks (eighth notes) per section.
    pub section_length: u64,
    /// Ticks between chord changes.
    pub chord_ticks: u64,
    pub arrangement: Arrangement,
    /// Initial DJ controls. The bpm is replaced by the style tempo on start.
    pub controls: DjControls,
    pub emotion: Option<Emotion>,
    pub osc: OscConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: None,
            channels: None,
            seed: None,
            section_length: DEFAULT_SECTION_LENGTH,
            chord_ticks: DEFAULT_CHORD_TICKS,
            arrangement: Arrangement::default(),
            controls: DjControls::default(),
            emotion: None,
            osc: OscConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn structure(&self) -> StructureConfig {
        StructureConfig {
            section_length: self.section_length.max(1),
            chord_ticks: self.chord_ticks.max(1),
            arrangement: self.arrangement.clone(),
        }
    }

    /// Sample rate for offline rendering.
    pub fn offline_sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    pub fn offline_channels(&self) -> u16 {
        self.channels.unwrap_or(DEFAULT_CHANNELS).max(1)
    }
}

/// `~/.vibe-oracle/config.yaml`, or `./.vibe-oracle/config.yaml` without a home directory.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".vibe-oracle");
    path.push("config.yaml");
    path
}

/// Load from the default path. A missing file yields the defaults.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_from(&default_config_path())
}

/// Load from `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_to(path: &Path, config: &EngineConfig) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Section;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.section_length, 64);
        assert_eq!(config.chord_ticks, 16);
        assert_eq!(config.controls, DjControls::default());
        assert_eq!(config.offline_sample_rate(), 44100);
        assert_eq!(config.offline_channels(), 2);
        assert_eq!(config.structure(), StructureConfig::default());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
seed: 42
emotion: calm
controls:
  filter: 10
arrangement: [intro, verse, breakdown, drop, outro]
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.emotion, Some(Emotion::Calm));
        assert_eq!(config.controls.filter, 10.0);
        assert_eq!(config.controls.volume, 80.0);
        assert_eq!(config.arrangement.sections()[2], Section::Breakdown);
        assert_eq!(config.section_length, 64);
        assert_eq!(config.osc, OscConfig::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = EngineConfig {
            seed: Some(7),
            sample_rate: Some(48000),
            emotion: Some(Emotion::Excited),
            ..EngineConfig::default()
        };
        save_to(&path, &config).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "section_length: [not a number").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn empty_arrangement_is_rejected() {
        assert!(serde_yaml::from_str::<EngineConfig>("arrangement: []").is_err());
    }
}
