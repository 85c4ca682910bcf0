//! Offline WAV export.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::session::Engine;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
    #[error("channel count must be at least 1")]
    NoChannels,
}

/// Write interleaved `samples` as a 16-bit PCM WAV file.
pub fn export_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) -> Result<(), ExportError> {
    if channels == 0 {
        return Err(ExportError::NoChannels);
    }
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    info!(path = %path.display(), frames = samples.len() / channels as usize, "wrote wav");
    Ok(())
}

/// Render `seconds` of `engine` output straight to a WAV file.
pub fn render_to_wav(engine: &mut Engine, seconds: f64, channels: u16, path: &Path) -> Result<(), ExportError> {
    if channels == 0 {
        return Err(ExportError::NoChannels);
    }
    let samples = engine.render_offline(seconds, channels as usize);
    export_wav(path, &samples, engine.sample_rate(), channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::style::{Style, StyleSet};

    #[test]
    fn writes_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        export_wav(&path, &[0.0, 0.5, -0.5, 2.0], 8000, 2).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8000);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0, 16383, -16383, i16::MAX]);
    }

    #[test]
    fn zero_channels_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        assert!(matches!(
            export_wav(&path, &[0.0], 8000, 0),
            Err(ExportError::NoChannels)
        ));
    }

    #[test]
    fn renders_session_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.wav");
        let config = EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(22050, &config);
        engine.start(&StyleSet::single(Style::Lofi));
        render_to_wav(&mut engine, 1.0, 2, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 22050);
        assert_eq!(reader.spec().channels, 2);
    }
}
