//! Audio engine — owns the cpal output stream and feeds it from a session [`Engine`].
//!
//! The main thread sends [`EngineCommand`]s through a lock-free ring buffer.
//! The audio thread drains them at the top of every callback, then renders.
//! Status, notifications and the waveform tap are read without touching the
//! audio thread.

pub mod callback;
pub mod command;
pub mod export;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapProd, HeapRb,
};
use thiserror::Error;
use tracing::{info, warn};

pub use command::EngineCommand;
pub use export::{export_wav, render_to_wav, ExportError};

use crate::config::EngineConfig;
use crate::control::{ControlParam, ControlUpdate, SessionTarget};
use crate::effects::WaveformTap;
use crate::emotion::Emotion;
use crate::scheduler::{subscription, NotificationReceiver};
use crate::session::{Engine, EngineStatus};
use crate::style::StyleSet;

use callback::AudioCallback;

/// Ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,
    #[error("device config error: {0}")]
    DeviceConfig(String),
    #[error("stream build error: {0}")]
    StreamBuild(String),
    #[error("stream play error: {0}")]
    StreamPlay(String),
    /// The audio thread is not draining commands fast enough.
    #[error("audio command ring buffer is full")]
    BufferFull,
}

/// Live playback. Created on the main thread; the session engine itself
/// runs inside the cpal callback.
pub struct AudioEngine {
    stream: cpal::Stream,
    producer: HeapProd<EngineCommand>,
    status: EngineStatus,
    tap: WaveformTap,
    sample_rate: u32,
    channels: u16,
}

impl AudioEngine {
    /// Open the default output device. Sample rate and channel count come
    /// from `config` when set, otherwise from the device.
    pub fn new(config: &EngineConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let default = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_rate = config.sample_rate.unwrap_or(default.sample_rate().0);
        let channels = config.channels.unwrap_or(default.channels());

        Self::build_with_device(&device, config, sample_rate, channels)
    }

    /// Open the default output device with an explicit sample rate and channel count.
    pub fn with_config(config: &EngineConfig, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        Self::build_with_device(&device, config, sample_rate, channels)
    }

    fn build_with_device(
        device: &cpal::Device,
        config: &EngineConfig,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AudioError> {
        let rb = HeapRb::<EngineCommand>::new(RING_BUFFER_CAPACITY);
        let (producer, consumer) = rb.split();

        let engine = Engine::new(sample_rate, config);
        let status = engine.status();
        let tap = engine.waveform_tap();
        let mut audio_callback = AudioCallback::new(consumer, engine, channels);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            warn!(error = %err, "audio stream error");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    audio_callback.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        info!(sample_rate, channels, "audio stream started");

        Ok(Self {
            stream,
            producer,
            status,
            tap,
            sample_rate,
            channels,
        })
    }

    fn send(&mut self, cmd: EngineCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(cmd)
            .map_err(|_| AudioError::BufferFull)
    }

    /// Start a session. A running session is replaced.
    pub fn start_session(&mut self, styles: StyleSet) -> Result<(), AudioError> {
        info!(%styles, "starting session");
        self.send(EngineCommand::Start(styles))
    }

    pub fn stop_session(&mut self) -> Result<(), AudioError> {
        info!("stopping session");
        self.send(EngineCommand::Stop)
    }

    pub fn set_emotion(&mut self, emotion: Option<Emotion>) -> Result<(), AudioError> {
        info!(?emotion, "emotion");
        self.send(EngineCommand::SetEmotion(emotion))
    }

    /// Set one control. Clamping happens on the audio thread.
    pub fn set_control(&mut self, param: ControlParam, value: f64) -> Result<(), AudioError> {
        self.send(EngineCommand::SetControl(param, value))
    }

    pub fn update_controls(&mut self, update: ControlUpdate) -> Result<(), AudioError> {
        self.send(EngineCommand::UpdateControls(update))
    }

    /// Subscribe to section and chord notifications.
    pub fn subscribe(&mut self) -> Result<NotificationReceiver, AudioError> {
        let (producer, receiver) = subscription();
        self.send(EngineCommand::Subscribe(producer))?;
        Ok(receiver)
    }

    /// Snapshot handle on the engine state.
    pub fn status(&self) -> EngineStatus {
        self.status.clone()
    }

    /// Recent output samples for visualisation.
    pub fn waveform_tap(&self) -> WaveformTap {
        self.tap.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Pause the output stream. The session clock stops with it.
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }

    /// Resume the output stream.
    pub fn play(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }
}

impl SessionTarget for AudioEngine {
    type Error = AudioError;

    fn start_session(&mut self, styles: StyleSet) -> Result<(), AudioError> {
        AudioEngine::start_session(self, styles)
    }

    fn stop_session(&mut self) -> Result<(), AudioError> {
        AudioEngine::stop_session(self)
    }

    fn apply_emotion(&mut self, emotion: Option<Emotion>) -> Result<(), AudioError> {
        self.set_emotion(emotion)
    }

    fn apply_control(&mut self, param: ControlParam, value: f64) -> Result<(), AudioError> {
        self.set_control(param, value)
    }
}
