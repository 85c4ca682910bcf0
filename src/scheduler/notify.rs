//! Structure notifications delivered to subscribers through lock-free queues.
//!
//! The engine holds one ring-buffer producer per subscriber and pushes without
//! blocking. A full subscriber queue drops the newest notification rather
//! than stalling the audio thread.

use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use super::section::Section;
use crate::theory::ChordLabel;

/// Notifications buffered per subscriber.
pub const SUBSCRIBER_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    SectionChanged(Section),
    ChordChanged(ChordLabel),
}

/// Receiving end of a subscription. Safe to move to another thread.
pub struct NotificationReceiver {
    consumer: HeapCons<Notification>,
}

impl NotificationReceiver {
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.consumer.try_pop()
    }

    /// Everything received so far, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::iter::from_fn(|| self.consumer.try_pop()).collect()
    }
}

impl std::fmt::Debug for NotificationReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationReceiver").finish_non_exhaustive()
    }
}

/// Create a connected producer/receiver pair.
pub fn subscription() -> (HeapProd<Notification>, NotificationReceiver) {
    let (producer, consumer) = HeapRb::<Notification>::new(SUBSCRIBER_CAPACITY).split();
    (producer, NotificationReceiver { consumer })
}

/// Fan-out to every registered subscriber.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<HeapProd<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiver.
    pub fn subscribe(&mut self) -> NotificationReceiver {
        let (producer, receiver) = subscription();
        self.subscribers.push(producer);
        receiver
    }

    /// Register an externally created producer.
    pub fn attach(&mut self, producer: HeapProd<Notification>) {
        self.subscribers.push(producer);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn notify(&mut self, notification: Notification) {
        for subscriber in &mut self.subscribers {
            let _ = subscriber.try_push(notification);
        }
    }
}
