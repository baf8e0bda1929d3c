use async_trait::async_trait;

use super::error::SynthesisError;
use super::types::SpeechRequest;

/// A speech vendor that turns an SSML request into encoded audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Synthesize the request, returning the vendor's audio bytes unchanged
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SynthesisError>;
}
