use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::LanguageCode;
use crate::gateway::{decode_phonetic, PHONETIC_HEADER};
use crate::synthesis::SynthesisResult;

/// Snapshot of the client input sent to the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchRequest {
    pub text: String,
    pub language: LanguageCode,
    pub voice: String,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to fetch audio: {0}")]
    Transport(anyhow::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport(anyhow::anyhow!(source))
    }
}

/// Where the client gets synthesized audio from
#[async_trait]
pub trait SynthesisFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<SynthesisResult, FetchError>;
}

/// Fetches audio from a running voxrelay gateway
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
}

impl HttpFetcher {
    pub fn new(gateway_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/text-to-speech", gateway_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SynthesisFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<SynthesisResult, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let phonetic = response
            .headers()
            .get(PHONETIC_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_phonetic);

        let audio = response.bytes().await?.to_vec();
        debug!(bytes = audio.len(), has_phonetic = phonetic.is_some(), "Fetched audio");

        Ok(SynthesisResult::new(audio, phonetic))
    }
}
