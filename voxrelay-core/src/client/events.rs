use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

use super::state::ClientState;
use crate::catalog::{LanguageCode, VoiceDescriptor};

/// `ClientEvent` is the output of the client actor. Front-ends render these
/// and never mutate client state directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data")]
pub enum ClientEvent {
    StateChanged(ClientState),
    /// Display-only countdown in tenths of a second; `None` hides it
    Countdown {
        remaining_secs: Option<f32>,
    },
    VoicesChanged {
        language: LanguageCode,
        voices: Vec<VoiceDescriptor>,
        selected: String,
    },
    PhoneticChanged {
        text: Option<String>,
        visible: bool,
    },
    FetchStarted {
        text: String,
        language: LanguageCode,
        voice: String,
    },
    AudioReady {
        bytes: usize,
    },
    PlaybackStarted,
    PlaybackFinished,
    PlaybackFailed(String),
    Error(String),
}

#[derive(Clone)]
pub struct EventSender {
    pub event_tx: mpsc::UnboundedSender<ClientEvent>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { event_tx }, event_rx)
    }

    /// Front-ends may go away at any time; events are best effort
    pub fn send(&self, event: ClientEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn state(&self, state: ClientState) {
        self.send(ClientEvent::StateChanged(state));
    }

    pub fn countdown(&self, remaining: Option<Duration>) {
        let remaining_secs = remaining.map(|r| (r.as_millis() as f32 / 100.0).round() / 10.0);
        self.send(ClientEvent::Countdown { remaining_secs });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ClientEvent::Error(message.into()));
    }
}
