//! Session controller — the owned engine that turns a style selection into sound.
//!
//! An [`Engine`] holds everything a session needs: layers, transport,
//! scheduler, control ramps and the effects bus. It is single-threaded and
//! allocation-free while rendering, so it can live inside an audio callback.
//! Other threads observe it through [`EngineStatus`], notification
//! subscriptions and the waveform tap.

pub mod status;

pub use status::EngineStatus;

use std::convert::Infallible;

use ringbuf::HeapProd;

use crate::config::EngineConfig;
use crate::control::{
    filter_to_cutoff, reverb_to_wet, volume_to_gain, ControlParam, ControlUpdate, DjControls, Ramp,
    SessionTarget,
};
use crate::effects::{BusInput, BusParams, EffectsBus, WaveformTap};
use crate::emotion::{Emotion, EmotionModulator, EMOTION_RAMP_SECS};
use crate::instrument::{build_layer, Layer};
use crate::scheduler::{
    random, Notification, NotificationReceiver, Notifier, PerformerLayer, RandomSource, Scheduler, Section,
    TickOutput, Transport, TransportState,
};
use crate::style::StyleSet;
use crate::theory::{ChordLabel, Progression};

/// Scheduling lookahead: notes start this long after their tick so that
/// negative humanization offsets still land in the future.
pub const LOOKAHEAD_SECS: f64 = 0.01;

/// Room reserved for the notes of one tick.
const TICK_NOTE_CAPACITY: usize = 64;

pub struct Engine {
    sample_rate: u32,
    layers: Vec<Layer>,
    performers: Vec<PerformerLayer>,
    transport: Transport,
    scheduler: Scheduler,
    tick_out: TickOutput,
    notifier: Notifier,
    emotion: EmotionModulator,
    controls: DjControls,
    base_tempo: Option<f64>,
    tempo: Ramp,
    filter_base: Ramp,
    reverb_wet: Ramp,
    gain: Ramp,
    effects: EffectsBus,
    status: EngineStatus,
}

impl Engine {
    /// Build an idle engine. Randomness is seeded from `config.seed` when set.
    pub fn new(sample_rate: u32, config: &EngineConfig) -> Self {
        let random = match config.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_entropy(),
        };
        Self::with_random(sample_rate, config, random)
    }

    /// Build an idle engine drawing from `random`.
    pub fn with_random(sample_rate: u32, config: &EngineConfig, random: Box<dyn RandomSource>) -> Self {
        let sample_rate = sample_rate.max(1);
        let controls = config.controls.clamped();
        let status = EngineStatus::new(controls);
        status.set_emotion(config.emotion);
        let filter_base = filter_to_cutoff(controls.filter);
        Self {
            sample_rate,
            layers: Vec::with_capacity(crate::style::MAX_STYLES),
            performers: Vec::with_capacity(crate::style::MAX_STYLES),
            transport: Transport::new(sample_rate),
            scheduler: Scheduler::new(config.structure(), random),
            tick_out: TickOutput::with_capacity(TICK_NOTE_CAPACITY),
            notifier: Notifier::new(),
            emotion: EmotionModulator::new(config.emotion),
            controls,
            base_tempo: None,
            tempo: Ramp::new(controls.bpm),
            filter_base: Ramp::new(filter_base),
            reverb_wet: Ramp::new(reverb_to_wet(controls.reverb)),
            gain: Ramp::new(volume_to_gain(controls.volume)),
            effects: EffectsBus::new(sample_rate, filter_base),
            status,
        }
    }

    /// Start a session. Any running session is stopped first.
    pub fn start(&mut self, styles: &StyleSet) {
        self.stop();

        for style in styles.iter() {
            let layer = build_layer(style, self.sample_rate);
            self.performers.push(PerformerLayer {
                style,
                slots: layer.slots(),
            });
            self.layers.push(layer);
        }

        let primary = styles.primary();
        self.scheduler.start(Progression::for_style(primary));

        let base = primary.base_tempo();
        self.base_tempo = Some(base);
        let tempo = self.emotion.session_tempo(base);
        self.controls.bpm = tempo;
        self.tempo.set_immediate(tempo);

        self.transport.reset();
        self.transport.play();

        self.status.set_controls(&self.controls);
        self.status.set_layer_count(self.layers.len());
        self.status.set_section(self.scheduler.state().section);
        self.status.set_tick(0);
        self.status.set_playing(true);
    }

    /// Stop the session, release and drop every layer, and rewind. Effect
    /// tails keep ringing. No-op when idle.
    pub fn stop(&mut self) {
        if !self.transport.is_playing() {
            return;
        }
        self.transport.stop();
        self.transport.reset();
        for mut layer in self.layers.drain(..) {
            layer.release();
        }
        self.performers.clear();
        self.scheduler.stop();
        self.base_tempo = None;

        let first = self.scheduler.state().section;
        self.notifier.notify(Notification::SectionChanged(first));
        self.status.set_section(first);
        self.status.set_layer_count(0);
        self.status.set_tick(0);
        self.status.set_playing(false);
    }

    /// Select or clear the emotion. While playing, a selected emotion ramps
    /// the tempo to its target over one second; clearing keeps the tempo.
    pub fn set_emotion(&mut self, emotion: Option<Emotion>) {
        let base = self.base_tempo.filter(|_| self.transport.is_playing());
        if let Some(target) = self.emotion.apply(emotion, base) {
            self.tempo.ramp_to(target, EMOTION_RAMP_SECS, self.sample_rate);
            self.controls.bpm = target;
            self.status.set_controls(&self.controls);
        }
        self.status.set_emotion(emotion);
    }

    /// Set one DJ control. Returns the value after clamping.
    pub fn set_control(&mut self, param: ControlParam, value: f64) -> f64 {
        let value = self.controls.set(param, value);
        let secs = param.ramp_secs();
        let sr = self.sample_rate;
        match param {
            ControlParam::Bpm => self.tempo.ramp_to(value, secs, sr),
            ControlParam::Filter => self.filter_base.ramp_to(filter_to_cutoff(value), secs, sr),
            ControlParam::Reverb => self.reverb_wet.ramp_to(reverb_to_wet(value), secs, sr),
            ControlParam::Volume => self.gain.ramp_to(volume_to_gain(value), secs, sr),
        }
        self.status.set_controls(&self.controls);
        value
    }

    /// Apply every control present in `update`.
    pub fn update_controls(&mut self, update: ControlUpdate) {
        for (param, value) in update.entries() {
            self.set_control(param, value);
        }
    }

    pub fn controls(&self) -> DjControls {
        self.controls
    }

    pub fn current_emotion(&self) -> Option<Emotion> {
        self.emotion.current()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn section(&self) -> Section {
        self.scheduler.state().section
    }

    pub fn transport_state(&self) -> TransportState {
        self.scheduler.state()
    }

    pub fn current_chord(&self) -> Option<ChordLabel> {
        self.scheduler.current_chord()
    }

    /// Tempo the transport is running at right now (mid-ramp values included).
    pub fn tempo(&self) -> f64 {
        self.tempo.current()
    }

    /// Base tempo of the running session's primary style.
    pub fn base_tempo(&self) -> Option<f64> {
        self.base_tempo
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// A new independent notification subscription.
    pub fn subscribe(&mut self) -> NotificationReceiver {
        self.notifier.subscribe()
    }

    /// Register a subscription created on another thread.
    pub fn attach_subscriber(&mut self, producer: HeapProd<Notification>) {
        self.notifier.attach(producer);
    }

    pub fn waveform_tap(&self) -> WaveformTap {
        self.effects.tap()
    }

    pub fn status(&self) -> EngineStatus {
        self.status.clone()
    }

    /// Linear ceiling of the master limiter.
    pub fn output_ceiling(&self) -> f64 {
        self.effects.limiter_ceiling()
    }

    fn run_tick(&mut self, tick: u64, bpm: f64) {
        let band = self.emotion.velocity_band();
        self.scheduler
            .tick(tick, &self.performers, band, &mut self.tick_out);

        if let Some(section) = self.tick_out.section_changed {
            self.notifier.notify(Notification::SectionChanged(section));
            self.status.set_section(section);
        }
        if let Some(label) = self.tick_out.chord_changed {
            self.notifier.notify(Notification::ChordChanged(label));
        }
        self.status.set_tick(tick);

        let sr = self.sample_rate as f64;
        for note in &self.tick_out.notes {
            let delay = ((LOOKAHEAD_SECS + note.offset_secs).max(0.0) * sr).round() as u32;
            if let Some(layer) = self.layers.get_mut(note.layer) {
                layer.trigger(note.slot, note.pitch, note.velocity, note.length.secs(bpm), delay);
            }
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f64 {
        let bpm = self.tempo.next_sample();
        let params = BusParams {
            bpm,
            reverb_wet: self.reverb_wet.next_sample(),
            filter_base: self.filter_base.next_sample(),
        };
        let gain = self.gain.next_sample();

        if let Some(tick) = self.transport.advance_sample(bpm) {
            self.run_tick(tick, bpm);
        }

        let mut bus = BusInput::default();
        for layer in &mut self.layers {
            layer.render(bpm, &mut bus);
        }
        self.effects.process(bus, params) * gain
    }

    /// Render interleaved audio; every channel carries the same signal.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in output.chunks_mut(channels) {
            let sample = self.next_sample() as f32;
            frame.fill(sample);
        }
    }

    /// Render `seconds` of interleaved audio into a new buffer.
    pub fn render_offline(&mut self, seconds: f64, channels: usize) -> Vec<f32> {
        let channels = channels.max(1);
        let frames = (seconds.max(0.0) * self.sample_rate as f64).round() as usize;
        let mut buffer = vec![0.0f32; frames * channels];
        self.render(&mut buffer, channels);
        buffer
    }
}

impl SessionTarget for Engine {
    type Error = Infallible;

    fn start_session(&mut self, styles: StyleSet) -> Result<(), Infallible> {
        self.start(&styles);
        Ok(())
    }

    fn stop_session(&mut self) -> Result<(), Infallible> {
        self.stop();
        Ok(())
    }

    fn apply_emotion(&mut self, emotion: Option<Emotion>) -> Result<(), Infallible> {
        self.set_emotion(emotion);
        Ok(())
    }

    fn apply_control(&mut self, param: ControlParam, value: f64) -> Result<(), Infallible> {
        self.set_control(param, value);
        Ok(())
    }
}
