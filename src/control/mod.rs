//! Live control surface — DJ parameters, their ranges and mappings, and ramps.
//!
//! The four DJ controls are stored in user units (BPM and percentages) and
//! mapped to engine units (cutoff Hz, reverb wet, linear gain) when applied.
//! Every change reaches the engine through a [`Ramp`] so nothing clicks.

pub mod dispatch;
pub mod ingress;
pub mod ramp;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use dispatch::{Controller, SessionTarget};
pub use ingress::{control_channel, ControlEvent, ControlReceiver, ControlSender};
pub use ramp::Ramp;

/// Lowest tempo the bpm control accepts.
pub const MIN_BPM: f64 = 60.0;
/// Highest tempo the bpm control accepts.
pub const MAX_BPM: f64 = 200.0;

/// Cutoff at filter = 0.
const CUTOFF_MIN_HZ: f64 = 200.0;
/// Cutoff span covered by filter 0–100.
const CUTOFF_SPAN_HZ: f64 = 2000.0;
/// Gain at volume = 0.
const VOLUME_FLOOR_DB: f64 = -20.0;

/// One of the four live-controllable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlParam {
    Bpm,
    Filter,
    Reverb,
    Volume,
}

impl ControlParam {
    pub const ALL: [ControlParam; 4] = [
        ControlParam::Bpm,
        ControlParam::Filter,
        ControlParam::Reverb,
        ControlParam::Volume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlParam::Bpm => "bpm",
            ControlParam::Filter => "filter",
            ControlParam::Reverb => "reverb",
            ControlParam::Volume => "volume",
        }
    }

    /// Inclusive `(min, max)` range in user units.
    pub fn range(self) -> (f64, f64) {
        match self {
            ControlParam::Bpm => (MIN_BPM, MAX_BPM),
            _ => (0.0, 100.0),
        }
    }

    /// Clamp a value into range. NaN maps to the minimum.
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.range();
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }

    /// Time a change takes to reach its target.
    pub fn ramp_secs(self) -> f64 {
        match self {
            ControlParam::Bpm => 0.5,
            _ => 0.1,
        }
    }
}

impl fmt::Display for ControlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bpm" | "tempo" => Ok(ControlParam::Bpm),
            "filter" | "cutoff" => Ok(ControlParam::Filter),
            "reverb" => Ok(ControlParam::Reverb),
            "volume" | "vol" => Ok(ControlParam::Volume),
            other => Err(format!("unknown control: {other}")),
        }
    }
}

/// The DJ control set, in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DjControls {
    pub bpm: f64,
    pub filter: f64,
    pub reverb: f64,
    pub volume: f64,
}

impl Default for DjControls {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            filter: 50.0,
            reverb: 30.0,
            volume: 80.0,
        }
    }
}

impl DjControls {
    pub fn get(&self, param: ControlParam) -> f64 {
        match param {
            ControlParam::Bpm => self.bpm,
            ControlParam::Filter => self.filter,
            ControlParam::Reverb => self.reverb,
            ControlParam::Volume => self.volume,
        }
    }

    /// Store a clamped value and return what was stored.
    pub fn set(&mut self, param: ControlParam, value: f64) -> f64 {
        let value = param.clamp(value);
        match param {
            ControlParam::Bpm => self.bpm = value,
            ControlParam::Filter => self.filter = value,
            ControlParam::Reverb => self.reverb = value,
            ControlParam::Volume => self.volume = value,
        }
        value
    }

    /// Copy with every field clamped into range.
    pub fn clamped(mut self) -> Self {
        for param in ControlParam::ALL {
            self.set(param, self.get(param));
        }
        self
    }
}

/// A partial control update: only the `Some` fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlUpdate {
    pub bpm: Option<f64>,
    pub filter: Option<f64>,
    pub reverb: Option<f64>,
    pub volume: Option<f64>,
}

impl ControlUpdate {
    pub fn with(mut self, param: ControlParam, value: f64) -> Self {
        let slot = match param {
            ControlParam::Bpm => &mut self.bpm,
            ControlParam::Filter => &mut self.filter,
            ControlParam::Reverb => &mut self.reverb,
            ControlParam::Volume => &mut self.volume,
        };
        *slot = Some(value);
        self
    }

    /// The present `(param, value)` pairs in a fixed order.
    pub fn entries(&self) -> impl Iterator<Item = (ControlParam, f64)> + '_ {
        ControlParam::ALL.into_iter().filter_map(move |param| {
            let value = match param {
                ControlParam::Bpm => self.bpm,
                ControlParam::Filter => self.filter,
                ControlParam::Reverb => self.reverb,
                ControlParam::Volume => self.volume,
            };
            value.map(|v| (param, v))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

impl From<DjControls> for ControlUpdate {
    fn from(c: DjControls) -> Self {
        Self {
            bpm: Some(c.bpm),
            filter: Some(c.filter),
            reverb: Some(c.reverb),
            volume: Some(c.volume),
        }
    }
}

/// Filter percentage to low-pass cutoff: 0 → 200 Hz, 100 → 2200 Hz.
pub fn filter_to_cutoff(filter: f64) -> f64 {
    CUTOFF_MIN_HZ + ControlParam::Filter.clamp(filter) / 100.0 * CUTOFF_SPAN_HZ
}

/// Reverb percentage to wet mix 0.0–1.0.
pub fn reverb_to_wet(reverb: f64) -> f64 {
    ControlParam::Reverb.clamp(reverb) / 100.0
}

/// Volume percentage to output gain in dB: 0 → −20 dB, 100 → 0 dB.
pub fn volume_to_db(volume: f64) -> f64 {
    ControlParam::Volume.clamp(volume) / 100.0 * -VOLUME_FLOOR_DB + VOLUME_FLOOR_DB
}

pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Volume percentage to linear output gain.
pub fn volume_to_gain(volume: f64) -> f64 {
    db_to_gain(volume_to_db(volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn defaults() {
        let c = DjControls::default();
        assert_eq!((c.bpm, c.filter, c.reverb, c.volume), (120.0, 50.0, 30.0, 80.0));
    }

    #[test]
    fn set_clamps_to_range() {
        let mut c = DjControls::default();
        assert_eq!(c.set(ControlParam::Bpm, 300.0), 200.0);
        assert_eq!(c.set(ControlParam::Bpm, 10.0), 60.0);
        assert_eq!(c.set(ControlParam::Filter, -5.0), 0.0);
        assert_eq!(c.set(ControlParam::Volume, 150.0), 100.0);
        assert_eq!(c.set(ControlParam::Reverb, f64::NAN), 0.0);
        assert_eq!(c.bpm, 60.0);
    }

    #[test]
    fn volume_endpoints() {
        assert_approx_eq!(volume_to_db(0.0), -20.0);
        assert_approx_eq!(volume_to_db(100.0), 0.0);
        assert_approx_eq!(volume_to_gain(0.0), 0.1);
        assert_approx_eq!(volume_to_gain(100.0), 1.0);
    }

    #[test]
    fn volume_gain_is_monotonic() {
        let mut last = 0.0;
        for v in 0..=100 {
            let gain = volume_to_gain(v as f64);
            assert!(gain >= last, "gain dropped at volume {v}");
            last = gain;
        }
    }

    #[test]
    fn filter_mapping() {
        assert_approx_eq!(filter_to_cutoff(0.0), 200.0);
        assert_approx_eq!(filter_to_cutoff(50.0), 1200.0);
        assert_approx_eq!(filter_to_cutoff(100.0), 2200.0);
    }

    #[test]
    fn reverb_mapping() {
        assert_approx_eq!(reverb_to_wet(30.0), 0.3);
        assert_approx_eq!(reverb_to_wet(250.0), 1.0);
    }

    #[test]
    fn partial_update_entries() {
        let update = ControlUpdate::default()
            .with(ControlParam::Volume, 40.0)
            .with(ControlParam::Bpm, 90.0);
        let entries: Vec<_> = update.entries().collect();
        assert_eq!(
            entries,
            vec![(ControlParam::Bpm, 90.0), (ControlParam::Volume, 40.0)]
        );
        assert!(ControlUpdate::default().is_empty());
    }

    #[test]
    fn parse_param_names() {
        assert_eq!("BPM".parse::<ControlParam>(), Ok(ControlParam::Bpm));
        assert_eq!("cutoff".parse::<ControlParam>(), Ok(ControlParam::Filter));
        assert!("pan".parse::<ControlParam>().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let c: DjControls = serde_yaml::from_str("volume: 55\n").unwrap();
        assert_eq!(c.volume, 55.0);
        assert_eq!(c.bpm, 120.0);
    }
}
