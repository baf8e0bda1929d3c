use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fetcher::{FetchError, FetchRequest, SynthesisFetcher};
use crate::phonetic::{PinyinTransliterator, Transliterator};
use crate::synthesis::SynthesisResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockFetchBehavior {
    /// Return the request text as audio bytes, annotated for Mandarin
    #[default]
    Success,
    /// Answer with a non-success status
    Status(u16),
    /// Fail before any response arrives
    TransportError,
}

/// In-process stand-in for the gateway. Clones share behavior and recorded
/// requests.
#[derive(Clone, Default)]
pub struct MockFetcher {
    behavior: Arc<Mutex<MockFetchBehavior>>,
    latency: Arc<Mutex<Duration>>,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl MockFetcher {
    pub fn new(behavior: MockFetchBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            ..Self::default()
        }
    }

    pub fn set_behavior(&self, behavior: MockFetchBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Delay every response by `latency` to keep requests in flight
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SynthesisFetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<SynthesisResult, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockFetchBehavior::Success => {
                let phonetic = request
                    .language
                    .is_mandarin()
                    .then(|| PinyinTransliterator.transliterate(&request.text));
                Ok(SynthesisResult::new(request.text.as_bytes().to_vec(), phonetic))
            }
            MockFetchBehavior::Status(status) => Err(FetchError::Status {
                status,
                body: r#"{"error":"Internal Server Error"}"#.to_string(),
            }),
            MockFetchBehavior::TransportError => Err(FetchError::Transport(anyhow::anyhow!(
                "mock connection reset"
            ))),
        }
    }
}
