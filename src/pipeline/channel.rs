//! Bounded triple channel between one parser (producer) and one emitter (consumer).

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::time::Duration;
use thiserror::Error;

use crate::Triple;

/// The emitter has gone away; no further triples will be read.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("triple channel closed by the consumer")]
pub struct ChannelClosed;

/// Result of one [`TripleReceiver::poll`].
#[derive(Debug, PartialEq)]
pub enum Polled {
    Item(Triple),
    /// Nothing arrived within the timeout; the producer is still alive.
    Empty,
    /// The producer closed the channel and every triple has been received.
    Finished,
}

/// Create a channel holding at most `capacity` triples in flight.
pub fn triple_channel(capacity: usize) -> (TripleSender, TripleReceiver) {
    let (tx, rx) = bounded::<Triple>(capacity);
    (
        TripleSender { tx: Some(tx) },
        TripleReceiver { rx, finished: false },
    )
}

/// Producer half. Closing is idempotent and also happens on drop, so every exit path closes.
#[derive(Debug)]
pub struct TripleSender {
    tx: Option<Sender<Triple>>,
}

impl TripleSender {
    /// Push one triple, blocking while the channel is full.
    pub fn push(&self, triple: Triple) -> Result<(), ChannelClosed> {
        match &self.tx {
            Some(tx) => tx.send(triple).map_err(|_| ChannelClosed),
            None => Err(ChannelClosed),
        }
    }

    /// Signal end of stream. Later calls do nothing.
    pub fn close(&mut self) {
        self.tx.take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

impl Drop for TripleSender {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct TripleReceiver {
    rx: Receiver<Triple>,
    finished: bool,
}

impl TripleReceiver {
    /// Wait up to `timeout` for the next triple. Once [`Polled::Finished`] has been
    /// returned, every later call returns it immediately.
    pub fn poll(&mut self, timeout: Duration) -> Polled {
        if self.finished {
            return Polled::Finished;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(triple) => Polled::Item(triple),
            Err(RecvTimeoutError::Timeout) => Polled::Empty,
            Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                Polled::Finished
            }
        }
    }

    /// True once the producer has closed and the channel is drained.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
