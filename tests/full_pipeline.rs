//! Full pipeline integration tests — style selection → scheduler → voices → effects → samples.
//!
//! Everything renders offline; no audio hardware is involved.

use vibe_oracle::audio::{export_wav, render_to_wav};
use vibe_oracle::config::EngineConfig;
use vibe_oracle::control::ControlParam;
use vibe_oracle::scheduler::{Arrangement, Section};
use vibe_oracle::session::Engine;
use vibe_oracle::style::{MixRecipe, Style, StyleSet, MIX_RECIPES};

const SAMPLE_RATE: u32 = 22050;
const SEED: u64 = 42;

/// Skips the sparse intro so every layer gets to play.
fn engine() -> Engine {
    let config = EngineConfig {
        seed: Some(SEED),
        arrangement: Arrangement::new(vec![Section::Verse, Section::Build, Section::Drop]).unwrap(),
        ..EngineConfig::default()
    };
    Engine::new(SAMPLE_RATE, &config)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

// =============================================================================
// Every style renders sound that stays under the limiter ceiling
// =============================================================================

#[test]
fn every_style_is_audible_and_bounded() {
    for style in Style::ALL {
        let mut e = engine();
        e.start(&StyleSet::single(style));
        let audio = e.render_offline(4.0, 1);
        let p = peak(&audio);
        assert!(p > 1e-3, "{style} rendered silence");
        assert!(
            p as f64 <= e.output_ceiling() + 1e-6,
            "{style} peak {p} exceeds ceiling"
        );
        assert!(audio.iter().all(|s| s.is_finite()), "{style} produced NaN");
    }
}

#[test]
fn every_recipe_renders() {
    for recipe in &MIX_RECIPES {
        let mut e = engine();
        e.start(&recipe.style_set());
        assert_eq!(e.layer_count(), 3);
        let audio = e.render_offline(2.0, 2);
        assert!(peak(&audio) > 1e-3, "{} rendered silence", recipe.id);
    }
}

// =============================================================================
// Controls reach the signal path
// =============================================================================

#[test]
fn volume_zero_is_twenty_db_down() {
    let render = |volume: f64| {
        let mut e = engine();
        e.start(&MixRecipe::find("cyber-chase").unwrap().style_set());
        e.set_control(ControlParam::Volume, volume);
        e.render_offline(0.2, 1);
        e.render_offline(1.0, 1)
    };
    let quiet = render(0.0);
    let loud = render(100.0);
    assert!(peak(&loud) > 1e-3);
    for (q, l) in quiet.iter().zip(&loud) {
        assert!((q - l * 0.1).abs() < 1e-5);
    }
}

#[test]
fn lower_volume_is_quieter() {
    let render = |volume: f64| {
        let mut e = engine();
        e.start(&StyleSet::single(Style::Ambient));
        e.set_control(ControlParam::Volume, volume);
        rms(&e.render_offline(3.0, 1))
    };
    assert!(render(30.0) < render(80.0));
}

#[test]
fn stop_silences_voices_after_tails() {
    let mut e = engine();
    e.start(&StyleSet::single(Style::Cyberpunk));
    e.render_offline(2.0, 1);
    e.stop();
    // Reverb and delay tails ring out, then nothing is left.
    e.render_offline(20.0, 1);
    let audio = e.render_offline(0.5, 1);
    assert!(peak(&audio) < 1e-4);
}

// =============================================================================
// Waveform tap sees the output
// =============================================================================

#[test]
fn waveform_tap_tracks_output() {
    let mut e = engine();
    let tap = e.waveform_tap();
    e.start(&StyleSet::single(Style::Lofi));
    let audio = e.render_offline(2.0, 1);
    let snapshot = tap.snapshot();
    let tail = &audio[audio.len() - snapshot.len()..];
    // Volume 80 maps to a gain below one, so the pre-volume tap is at least as loud.
    assert!(peak(&snapshot) + 1e-6 >= peak(tail));
}

// =============================================================================
// WAV export
// =============================================================================

#[test]
fn render_to_wav_writes_expected_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chase.wav");
    let mut e = engine();
    e.start(&MixRecipe::find("cyber_chase").unwrap().style_set());
    render_to_wav(&mut e, 2.0, 2, &path).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.duration(), SAMPLE_RATE * 2);
    let samples: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
    assert!(samples.iter().any(|&s| s != 0));
}

#[test]
fn export_wav_mono() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono.wav");
    let mut e = engine();
    e.start(&StyleSet::single(Style::DeepHouse));
    let audio = e.render_offline(0.5, 1);
    export_wav(&path, &audio, SAMPLE_RATE, 1).unwrap();
    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.duration() as usize, audio.len());
}
