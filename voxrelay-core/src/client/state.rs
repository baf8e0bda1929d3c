use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the debounced client. Exactly one of these holds at a time;
/// the stored audio lives next to it and is only present after a successful
/// fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientState {
    /// Nothing to synthesize (empty text)
    #[default]
    Idle,
    /// Input changed recently, waiting for the quiescence window to pass
    CountingDown,
    /// Countdown expired and a request is outstanding (or queued behind one)
    Fetching,
    /// The latest request succeeded and its audio can be played
    Ready,
    /// The latest request failed, no audio is available
    Error,
}

impl ClientState {
    pub fn can_play(self) -> bool {
        self != ClientState::Fetching
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClientState::Idle => "idle",
            ClientState::CountingDown => "waiting for input to settle",
            ClientState::Fetching => "preparing audio",
            ClientState::Ready => "ready",
            ClientState::Error => "audio error",
        };
        f.write_str(label)
    }
}
