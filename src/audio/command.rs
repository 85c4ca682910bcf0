//! Commands sent from the main thread to the audio thread via ring buffer.

use ringbuf::HeapProd;

use crate::control::{ControlParam, ControlUpdate};
use crate::emotion::Emotion;
use crate::scheduler::Notification;
use crate::style::StyleSet;

pub enum EngineCommand {
    /// Start (or restart) a session with these styles.
    Start(StyleSet),
    Stop,
    SetEmotion(Option<Emotion>),
    SetControl(ControlParam, f64),
    UpdateControls(ControlUpdate),
    /// Register a notification subscriber created off the audio thread.
    Subscribe(HeapProd<Notification>),
}

impl std::fmt::Debug for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineCommand::Start(styles) => f.debug_tuple("Start").field(styles).finish(),
            EngineCommand::Stop => f.write_str("Stop"),
            EngineCommand::SetEmotion(e) => f.debug_tuple("SetEmotion").field(e).finish(),
            EngineCommand::SetControl(p, v) => f.debug_tuple("SetControl").field(p).field(v).finish(),
            EngineCommand::UpdateControls(u) => f.debug_tuple("UpdateControls").field(u).finish(),
            EngineCommand::Subscribe(_) => f.write_str("Subscribe(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;
    use ringbuf::{
        traits::{Consumer, Producer, Split},
        HeapRb,
    };

    #[test]
    fn ordering_preserved() {
        let rb = HeapRb::<EngineCommand>::new(16);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(EngineCommand::Start(StyleSet::single(Style::Lofi))).unwrap();
        prod.try_push(EngineCommand::SetControl(ControlParam::Filter, 20.0)).unwrap();
        prod.try_push(EngineCommand::Stop).unwrap();

        match cons.try_pop().unwrap() {
            EngineCommand::Start(styles) => assert_eq!(styles.primary(), Style::Lofi),
            other => panic!("expected Start, got {other:?}"),
        }
        assert!(matches!(
            cons.try_pop().unwrap(),
            EngineCommand::SetControl(ControlParam::Filter, v) if v == 20.0
        ));
        assert!(matches!(cons.try_pop().unwrap(), EngineCommand::Stop));
        assert!(cons.try_pop().is_none());
    }

    #[test]
    fn debug_hides_producer() {
        let (producer, _rx) = crate::scheduler::subscription();
        assert_eq!(format!("{:?}", EngineCommand::Subscribe(producer)), "Subscribe(..)");
        assert_eq!(
            format!("{:?}", EngineCommand::SetEmotion(Some(Emotion::Calm))),
            "SetEmotion(Some(Calm))"
        );
    }
}
