//! Session events for observability.
//!
//! The engine emits an event for every lifecycle change so hosts can log,
//! persist or stream session progress.

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::operation::AbortReason;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
  SessionMounted {
    session_id: Uuid,
    page: String,
    depth: usize,
  },
  StepMounted {
    session_id: Uuid,
    step: usize,
    kind: &'static str,
  },
  /// A fetch step's condition rejected its response.
  SessionHalted { session_id: Uuid, step: usize },
  SessionCompleted { session_id: Uuid },
  /// Closed by the user before completing.
  SessionClosed { session_id: Uuid },
  OperationAborted {
    session_id: Uuid,
    reason: AbortReason,
  },
  OperationDispatched {
    session_id: Uuid,
    page: String,
    target: &'static str,
  },
}

/// Receives session events.
pub trait SessionObserver: Send + Sync {
  fn notify(&self, event: SessionEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
  fn notify(&self, _event: SessionEvent) {}
}

/// Forwards events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
  sender: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
  pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self { sender }, receiver)
  }
}

impl SessionObserver for ChannelObserver {
  fn notify(&self, event: SessionEvent) {
    // A dropped receiver just means nobody is listening.
    let _ = self.sender.send(event);
  }
}
