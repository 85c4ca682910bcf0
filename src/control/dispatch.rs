//! Control dispatch — resolves [`ControlEvent`]s against a session target.
//!
//! Toggle and resume depend on whether a session is playing. The
//! [`Controller`] keeps that state itself, updated by every start and stop it
//! sends, so a batch of events resolves in order even when the target applies
//! them later (the live engine drains its command queue on the audio thread).

use crate::emotion::Emotion;
use crate::style::StyleSet;

use super::{ControlEvent, ControlParam};

/// Something a controller can drive: the offline engine or the live one.
pub trait SessionTarget {
    type Error;

    fn start_session(&mut self, styles: StyleSet) -> Result<(), Self::Error>;
    fn stop_session(&mut self) -> Result<(), Self::Error>;
    fn apply_emotion(&mut self, emotion: Option<Emotion>) -> Result<(), Self::Error>;
    fn apply_control(&mut self, param: ControlParam, value: f64) -> Result<(), Self::Error>;
}

/// Play state and last session, as seen by whoever sends the commands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controller {
    playing: bool,
    last: Option<StyleSet>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Styles of the most recently started session.
    pub fn last_session(&self) -> Option<StyleSet> {
        self.last
    }

    /// Apply one event. State only changes when the target accepts the command.
    pub fn dispatch<T: SessionTarget>(&mut self, target: &mut T, event: ControlEvent) -> Result<(), T::Error> {
        match event {
            ControlEvent::Start(styles) => self.start(target, styles),
            ControlEvent::Stop => self.stop(target),
            ControlEvent::Toggle if self.playing => self.stop(target),
            ControlEvent::Toggle | ControlEvent::Resume => match self.last {
                Some(styles) if !self.playing => self.start(target, styles),
                _ => Ok(()),
            },
            ControlEvent::SetEmotion(emotion) => target.apply_emotion(emotion),
            ControlEvent::SetControl(param, value) => target.apply_control(param, value),
        }
    }

    fn start<T: SessionTarget>(&mut self, target: &mut T, styles: StyleSet) -> Result<(), T::Error> {
        target.start_session(styles)?;
        self.last = Some(styles);
        self.playing = true;
        Ok(())
    }

    fn stop<T: SessionTarget>(&mut self, target: &mut T) -> Result<(), T::Error> {
        target.stop_session()?;
        self.playing = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Start(StyleSet),
        Stop,
        Emotion(Option<Emotion>),
        Control(ControlParam, f64),
    }

    /// Records commands without applying them, like a queue not yet drained.
    #[derive(Default)]
    struct Queue {
        sent: Vec<Sent>,
        full: bool,
    }

    impl SessionTarget for Queue {
        type Error = &'static str;

        fn start_session(&mut self, styles: StyleSet) -> Result<(), Self::Error> {
            self.push(Sent::Start(styles))
        }

        fn stop_session(&mut self) -> Result<(), Self::Error> {
            self.push(Sent::Stop)
        }

        fn apply_emotion(&mut self, emotion: Option<Emotion>) -> Result<(), Self::Error> {
            self.push(Sent::Emotion(emotion))
        }

        fn apply_control(&mut self, param: ControlParam, value: f64) -> Result<(), Self::Error> {
            self.push(Sent::Control(param, value))
        }
    }

    impl Queue {
        fn push(&mut self, sent: Sent) -> Result<(), &'static str> {
            if self.full {
                return Err("full");
            }
            self.sent.push(sent);
            Ok(())
        }
    }

    fn lofi() -> StyleSet {
        StyleSet::new(&[Style::Lofi, Style::Acid]).unwrap()
    }

    fn run(controller: &mut Controller, queue: &mut Queue, events: Vec<ControlEvent>) {
        for event in events {
            controller.dispatch(queue, event).unwrap();
        }
    }

    #[test]
    fn toggle_in_the_same_batch_as_start_stops() {
        let mut controller = Controller::new();
        let mut queue = Queue::default();
        run(
            &mut controller,
            &mut queue,
            vec![
                ControlEvent::Start(lofi()),
                ControlEvent::SetEmotion(Some(Emotion::Sad)),
                ControlEvent::SetControl(ControlParam::Filter, 250.0),
                ControlEvent::Toggle,
            ],
        );
        assert_eq!(
            queue.sent,
            vec![
                Sent::Start(lofi()),
                Sent::Emotion(Some(Emotion::Sad)),
                Sent::Control(ControlParam::Filter, 250.0),
                Sent::Stop,
            ]
        );
        assert!(!controller.is_playing());
    }

    #[test]
    fn repeated_toggles_alternate() {
        let mut controller = Controller::new();
        let mut queue = Queue::default();
        run(
            &mut controller,
            &mut queue,
            vec![
                ControlEvent::Start(lofi()),
                ControlEvent::Toggle,
                ControlEvent::Toggle,
                ControlEvent::Toggle,
            ],
        );
        assert_eq!(
            queue.sent,
            vec![Sent::Start(lofi()), Sent::Stop, Sent::Start(lofi()), Sent::Stop]
        );
    }

    #[test]
    fn resume_only_restarts_an_idle_session() {
        let mut controller = Controller::new();
        let mut queue = Queue::default();
        run(
            &mut controller,
            &mut queue,
            vec![
                ControlEvent::Resume,
                ControlEvent::Toggle,
                ControlEvent::Start(lofi()),
                ControlEvent::Resume,
                ControlEvent::Stop,
                ControlEvent::Resume,
            ],
        );
        assert_eq!(
            queue.sent,
            vec![Sent::Start(lofi()), Sent::Stop, Sent::Start(lofi())]
        );
        assert_eq!(controller.last_session(), Some(lofi()));
        assert!(controller.is_playing());
    }

    #[test]
    fn rejected_command_leaves_state_alone() {
        let mut controller = Controller::new();
        let mut queue = Queue::default();
        controller.dispatch(&mut queue, ControlEvent::Start(lofi())).unwrap();

        queue.full = true;
        assert_eq!(controller.dispatch(&mut queue, ControlEvent::Toggle), Err("full"));
        assert!(controller.is_playing());

        queue.full = false;
        controller.dispatch(&mut queue, ControlEvent::Toggle).unwrap();
        assert!(!controller.is_playing());
    }
}
