//! Control ingress — mpsc bridge from OSC and other controller threads.

use std::sync::mpsc;

use crate::emotion::Emotion;
use crate::style::StyleSet;

use super::ControlParam;

/// A request from an external controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Start a session with the given styles.
    Start(StyleSet),
    /// Stop the current session.
    Stop,
    /// Start the last session if idle, stop it if playing.
    Toggle,
    /// Start the last session if idle; ignored while playing.
    Resume,
    /// Select an emotion, or clear it with `None`.
    SetEmotion(Option<Emotion>),
    /// Set one DJ control, in user units.
    SetControl(ControlParam, f64),
}

/// Sender half. Clone it for listener threads.
pub type ControlSender = mpsc::Sender<ControlEvent>;

/// Receiver half, held by whoever owns the engine handle.
pub struct ControlReceiver {
    rx: mpsc::Receiver<ControlEvent>,
}

impl ControlReceiver {
    /// Non-blocking poll for the next event.
    pub fn poll(&self) -> Option<ControlEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<ControlEvent> {
        self.rx.try_iter().collect()
    }
}

pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, ControlReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn events_arrive_in_order() {
        let (tx, rx) = control_channel();
        tx.send(ControlEvent::SetControl(ControlParam::Bpm, 140.0))
            .unwrap();
        tx.send(ControlEvent::SetEmotion(Some(Emotion::Calm))).unwrap();
        tx.send(ControlEvent::Stop).unwrap();

        assert_eq!(
            rx.poll(),
            Some(ControlEvent::SetControl(ControlParam::Bpm, 140.0))
        );
        assert_eq!(rx.poll(), Some(ControlEvent::SetEmotion(Some(Emotion::Calm))));
        assert_eq!(rx.poll(), Some(ControlEvent::Stop));
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn drain_collects_all() {
        let (tx, rx) = control_channel();
        tx.send(ControlEvent::Start(StyleSet::single(Style::Lofi)))
            .unwrap();
        tx.send(ControlEvent::Toggle).unwrap();
        assert_eq!(rx.drain().len(), 2);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn sender_clones_share_receiver() {
        let (tx, rx) = control_channel();
        let tx2 = tx.clone();
        std::thread::spawn(move || tx2.send(ControlEvent::Stop).unwrap())
            .join()
            .unwrap();
        assert_eq!(rx.poll(), Some(ControlEvent::Stop));
    }
}
