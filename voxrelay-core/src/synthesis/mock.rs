use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::error::SynthesisError;
use super::provider::SpeechSynthesizer;
use super::types::SpeechRequest;

/// Mock behavior for the mock synthesizer
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return the given bytes as audio
    Success { audio: Vec<u8> },
    /// Fail as if the vendor answered with a non-success status
    UpstreamError { status: u16, body: String },
    /// Fail as if the vendor could not be reached
    TransportError,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self::Success {
            audio: b"ID3mock-mpeg-audio".to_vec(),
        }
    }
}

/// Mock speech vendor for testing. Clones share behavior and captured
/// requests.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    behavior: Arc<Mutex<MockBehavior>>,
    captured_requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockSynthesizer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<SpeechRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<SpeechRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SynthesisError> {
        self.captured_requests.lock().unwrap().push(request.clone());

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockBehavior::Success { audio } => Ok(audio),
            MockBehavior::UpstreamError { status, body } => {
                Err(SynthesisError::Upstream { status, body })
            }
            MockBehavior::TransportError => Err(SynthesisError::Transport(anyhow::anyhow!(
                "mock connection refused"
            ))),
        }
    }
}
