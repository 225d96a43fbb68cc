//! Alert feed
//!
//! Producers (the simulated generator today, worker devices later) publish
//! raise requests onto a bounded queue; the alert log drains it. The queue
//! keeps producers from growing memory without limit when nobody consumes.

use crate::types::{Result, SafetyError, Timestamp, WorkerRef};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

pub mod simulator;

pub use simulator::RandomAlertSource;

/// A request to raise a new emergency alert
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseRequest {
    pub worker: WorkerRef,
    pub location: String,
    /// When the producer observed the emergency
    pub observed_at: Timestamp,
}

/// Create a bounded feed with room for `capacity` pending requests
pub fn channel(capacity: usize) -> (FeedSender, FeedReceiver) {
    let (sender, receiver) = bounded(capacity);
    (
        FeedSender { sender, capacity },
        FeedReceiver { receiver },
    )
}

/// Producer half of the feed
#[derive(Debug, Clone)]
pub struct FeedSender {
    sender: Sender<RaiseRequest>,
    capacity: usize,
}

impl FeedSender {
    /// Queue a request without blocking
    ///
    /// Fails with `FeedFull` when the consumer is behind and `FeedClosed`
    /// when the receiver has been dropped.
    pub fn publish(&self, request: RaiseRequest) -> Result<()> {
        match self.sender.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                log::warn!(
                    "Alert feed full, dropping request from {} at {}",
                    dropped.worker,
                    dropped.location
                );
                Err(SafetyError::FeedFull(self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => Err(SafetyError::FeedClosed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer half of the feed
#[derive(Debug)]
pub struct FeedReceiver {
    receiver: Receiver<RaiseRequest>,
}

impl FeedReceiver {
    /// Take every request queued so far, oldest first
    pub fn drain(&self) -> Vec<RaiseRequest> {
        self.receiver.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
