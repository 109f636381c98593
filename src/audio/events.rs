//! Cross-thread delivery of audio events.
//!
//! The audio service invokes notification callbacks on its own worker
//! threads. Callbacks never touch controller state; they push an
//! [`AudioEvent`] into a single-consumer queue and wake the owning thread,
//! which drains the queue and applies events one at a time.

use super::device::AudioEvent;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

type WakeFn = dyn Fn() + Send + Sync;

/// Producer side of the audio event queue.
#[derive(Clone)]
pub struct AudioEventSender {
    sender: Sender<AudioEvent>,
    wake: Arc<WakeFn>,
}

impl AudioEventSender {
    /// Queue an event and wake the consumer.
    ///
    /// Returns false if the consumer has gone away (process shutting down).
    pub fn send(&self, event: AudioEvent) -> bool {
        if self.sender.send(event).is_err() {
            return false;
        }
        (self.wake)();
        true
    }
}

impl fmt::Debug for AudioEventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEventSender").finish_non_exhaustive()
    }
}

/// Creates an event queue. `wake` runs after every successful send.
pub fn event_channel<W>(wake: W) -> (AudioEventSender, Receiver<AudioEvent>)
where
    W: Fn() + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::channel();
    (
        AudioEventSender {
            sender,
            wake: Arc::new(wake),
        },
        receiver,
    )
}
