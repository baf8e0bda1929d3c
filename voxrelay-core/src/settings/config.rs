use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::{LanguageCode, LanguageEntry, VoiceCatalog, DEFAULT_FALLBACK_VOICE};
use crate::client::ClientConfig;
use crate::markup::MarkupMode;
use crate::synthesis::azure::{AzureSpeechConfig, DEFAULT_OUTPUT_FORMAT};

pub const SPEECH_KEY_ENV: &str = "AZURE_SPEECH_KEY";
pub const SPEECH_REGION_ENV: &str = "AZURE_SPEECH_REGION";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address the gateway listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechSettings {
    /// Vendor region, e.g. "japaneast". `AZURE_SPEECH_REGION` takes precedence.
    #[serde(default)]
    pub region: String,

    /// Subscription key. `AZURE_SPEECH_KEY` takes precedence.
    #[serde(default)]
    pub subscription_key: String,

    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Full synthesis URL, replacing the one derived from the region
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Escape reserved markup characters in user text. Disable to let callers
    /// embed their own SSML tags.
    #[serde(default = "default_true")]
    pub escape_markup: bool,

    /// Upper bound for one vendor call; unset leaves the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            region: String::new(),
            subscription_key: String::new(),
            output_format: default_output_format(),
            endpoint: None,
            escape_markup: true,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_quiescence_ms")]
    pub quiescence_ms: u64,

    #[serde(default = "default_countdown_step_ms")]
    pub countdown_step_ms: u64,

    /// Language selected at startup
    #[serde(default = "default_language")]
    pub language: String,

    /// Voice selected at startup; the language default when unset
    #[serde(default)]
    pub voice: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            quiescence_ms: default_quiescence_ms(),
            countdown_step_ms: default_countdown_step_ms(),
            language: default_language(),
            voice: None,
        }
    }
}

/// voxrelay settings, shared by the gateway server and the CLI client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Language assumed when a request does not name one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Voice used for languages missing from the catalog
    #[serde(default = "default_fallback_voice")]
    pub fallback_voice: String,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub speech: SpeechSettings,

    #[serde(default)]
    pub client: ClientSettings,

    /// Replaces the built-in voice catalog when non-empty
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_quiescence_ms() -> u64 {
    3000
}

fn default_countdown_step_ms() -> u64 {
    100
}

fn default_language() -> String {
    "ja-JP".to_string()
}

fn default_fallback_voice() -> String {
    DEFAULT_FALLBACK_VOICE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            fallback_voice: default_fallback_voice(),
            server: ServerSettings::default(),
            speech: SpeechSettings::default(),
            client: ClientSettings::default(),
            languages: Vec::new(),
        }
    }
}

impl Settings {
    /// Build the voice catalog described by these settings
    pub fn catalog(&self) -> Result<VoiceCatalog> {
        if self.languages.is_empty() {
            let builtin = VoiceCatalog::default();
            return VoiceCatalog::new(builtin.languages().to_vec(), self.fallback_voice.clone());
        }
        VoiceCatalog::new(self.languages.clone(), self.fallback_voice.clone())
    }

    pub fn markup_mode(&self) -> MarkupMode {
        MarkupMode::from_escape_flag(self.speech.escape_markup)
    }

    /// Vendor configuration using the process environment for secrets
    pub fn speech_config(&self) -> Result<AzureSpeechConfig> {
        self.speech_config_with(|name| std::env::var(name).ok())
    }

    /// Vendor configuration with secrets looked up through `env`. Environment
    /// values win over the settings file; both missing is an error.
    pub fn speech_config_with<F>(&self, env: F) -> Result<AzureSpeechConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, configured: &str| {
            env(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| configured.to_string())
        };

        let subscription_key = pick(SPEECH_KEY_ENV, &self.speech.subscription_key);
        let region = pick(SPEECH_REGION_ENV, &self.speech.region);

        if subscription_key.trim().is_empty() {
            bail!("Speech subscription key is not configured; set {SPEECH_KEY_ENV} or speech.subscription_key");
        }
        if region.trim().is_empty() && self.speech.endpoint.is_none() {
            bail!("Speech region is not configured; set {SPEECH_REGION_ENV} or speech.region");
        }

        let mut config = AzureSpeechConfig::new(subscription_key, region);
        config.output_format = self.speech.output_format.clone();
        config.endpoint = self.speech.endpoint.clone();
        config.request_timeout = self.speech.request_timeout_secs.map(Duration::from_secs);
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            quiescence: Duration::from_millis(self.client.quiescence_ms),
            countdown_step: Duration::from_millis(self.client.countdown_step_ms),
            text: String::new(),
            language: LanguageCode::new(self.client.language.clone()),
            voice: self.client.voice.clone(),
        }
    }
}
