//! Audio callback — runs on the cpal audio thread.
//!
//! Drains commands from the ring buffer into the [`Engine`] and renders
//! the next block.

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use super::command::EngineCommand;
use crate::session::Engine;

/// State that lives on the audio thread. Accessed only from the cpal callback.
pub struct AudioCallback {
    consumer: HeapCons<EngineCommand>,
    engine: Engine,
    channels: u16,
}

impl AudioCallback {
    pub fn new(consumer: HeapCons<EngineCommand>, engine: Engine, channels: u16) -> Self {
        Self {
            consumer,
            engine,
            channels: channels.max(1),
        }
    }

    /// Called by cpal for each block. Fills `output` with interleaved frames.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.consumer.try_pop() {
            self.apply(cmd);
        }
        self.engine.render(output, self.channels as usize);
    }

    fn apply(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Start(styles) => self.engine.start(&styles),
            EngineCommand::Stop => self.engine.stop(),
            EngineCommand::SetEmotion(emotion) => self.engine.set_emotion(emotion),
            EngineCommand::SetControl(param, value) => {
                self.engine.set_control(param, value);
            }
            EngineCommand::UpdateControls(update) => self.engine.update_controls(update),
            EngineCommand::Subscribe(producer) => self.engine.attach_subscriber(producer),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::control::ControlParam;
    use crate::scheduler::{subscription, Notification, Section};
    use crate::style::{Style, StyleSet};
    use ringbuf::{
        traits::{Producer, Split},
        HeapProd, HeapRb,
    };

    fn setup() -> (HeapProd<EngineCommand>, AudioCallback) {
        let rb = HeapRb::<EngineCommand>::new(16);
        let (prod, cons) = rb.split();
        let config = EngineConfig {
            seed: Some(5),
            ..EngineConfig::default()
        };
        let engine = Engine::new(44100, &config);
        (prod, AudioCallback::new(cons, engine, 2))
    }

    #[test]
    fn silence_when_idle() {
        let (_prod, mut callback) = setup();
        let mut output = vec![999.0f32; 64];
        callback.process(&mut output);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn start_command_begins_session() {
        let (mut prod, mut callback) = setup();
        prod.try_push(EngineCommand::Start(StyleSet::single(Style::Ambient))).unwrap();

        let mut output = vec![0.0f32; 44100 * 2];
        callback.process(&mut output);

        assert!(callback.engine().is_playing());
        assert!(output.iter().any(|&s| s != 0.0));
        assert!(output.chunks(2).all(|f| f[0] == f[1]));
    }

    #[test]
    fn commands_apply_in_order() {
        let (mut prod, mut callback) = setup();
        prod.try_push(EngineCommand::Start(StyleSet::single(Style::Lofi))).unwrap();
        prod.try_push(EngineCommand::SetControl(ControlParam::Reverb, 150.0)).unwrap();
        prod.try_push(EngineCommand::Stop).unwrap();

        let mut output = vec![0.0f32; 32];
        callback.process(&mut output);

        assert!(!callback.engine().is_playing());
        assert_eq!(callback.engine().controls().reverb, 100.0);
    }

    #[test]
    fn subscribe_command_attaches_receiver() {
        let (mut prod, mut callback) = setup();
        let (producer, mut rx) = subscription();
        prod.try_push(EngineCommand::Subscribe(producer)).unwrap();
        prod.try_push(EngineCommand::Start(StyleSet::single(Style::Cyberpunk))).unwrap();

        let mut output = vec![0.0f32; 8];
        callback.process(&mut output);

        assert_eq!(rx.try_recv(), Some(Notification::SectionChanged(Section::Intro)));
        assert!(matches!(rx.try_recv(), Some(Notification::ChordChanged(_))));
    }
}
