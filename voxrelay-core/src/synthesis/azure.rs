//! Azure Cognitive Services text-to-speech implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::error::SynthesisError;
use super::provider::SpeechSynthesizer;
use super::types::SpeechRequest;

pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-16khz-128kbitrate-mono-mp3";

#[derive(Debug, Clone)]
pub struct AzureSpeechConfig {
    pub subscription_key: String,
    pub region: String,
    pub output_format: String,
    /// Overrides the regional endpoint derived from `region`
    pub endpoint: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl AzureSpeechConfig {
    pub fn new(subscription_key: String, region: String) -> Self {
        Self {
            subscription_key,
            region,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            endpoint: None,
            request_timeout: None,
        }
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            ),
        }
    }
}

pub struct AzureSpeech {
    config: AzureSpeechConfig,
    client: Client,
}

impl AzureSpeech {
    pub fn new(config: AzureSpeechConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeech {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SynthesisError> {
        let url = self.config.endpoint_url();
        debug!(%url, voice = %request.voice, language = %request.language, "Sending synthesis request");

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.config.output_format)
            .body(request.ssml.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            error!(status = status.as_u16(), %body, "Azure speech API error");
            return Err(SynthesisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?.to_vec();
        debug!(bytes = bytes.len(), "Received synthesized audio");
        Ok(bytes)
    }
}
