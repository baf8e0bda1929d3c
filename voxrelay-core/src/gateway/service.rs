use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use super::error::GatewayError;
use crate::catalog::{LanguageCode, VoiceCatalog};
use crate::markup::{build_ssml, MarkupMode};
use crate::phonetic::{PinyinTransliterator, Transliterator};
use crate::synthesis::{SpeechRequest, SpeechSynthesizer, SynthesisError, SynthesisResult};

/// Inbound request body. Every field is optional on the wire so that a missing
/// `text` is reported as a validation failure rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

impl GatewayRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>, voice: Option<String>) -> Self {
        Self {
            text: Some(text.into()),
            language: Some(language.into()),
            voice,
        }
    }
}

/// Validates requests, resolves voices against the catalog and forwards them
/// to the speech vendor.
pub struct SynthesisGateway {
    catalog: Arc<VoiceCatalog>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transliterator: Arc<dyn Transliterator>,
    default_language: LanguageCode,
    markup_mode: MarkupMode,
}

impl SynthesisGateway {
    pub fn new(catalog: Arc<VoiceCatalog>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        let default_language = catalog
            .languages()
            .first()
            .map(|entry| entry.code.clone())
            .unwrap_or_else(|| LanguageCode::new("ja-JP"));

        Self {
            catalog,
            synthesizer,
            transliterator: Arc::new(PinyinTransliterator),
            default_language,
            markup_mode: MarkupMode::default(),
        }
    }

    pub fn with_default_language(mut self, language: LanguageCode) -> Self {
        self.default_language = language;
        self
    }

    pub fn with_markup_mode(mut self, mode: MarkupMode) -> Self {
        self.markup_mode = mode;
        self
    }

    pub fn with_transliterator(mut self, transliterator: Arc<dyn Transliterator>) -> Self {
        self.transliterator = transliterator;
        self
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Resolve and validate a raw request without calling the vendor
    pub fn prepare(
        &self,
        request: &GatewayRequest,
    ) -> Result<(SpeechRequest, Option<String>), GatewayError> {
        let text = match request.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(GatewayError::Validation("Text is required".to_string())),
        };

        let language = match request.language.as_deref() {
            Some(language) if !language.trim().is_empty() => {
                self.catalog.normalize_language(language)
            }
            _ => self.default_language.clone(),
        };

        let voice = self
            .catalog
            .resolve_voice(&language, request.voice.as_deref());

        let phonetic = language
            .is_mandarin()
            .then(|| self.transliterator.transliterate(text));

        let ssml = build_ssml(&language, &voice, text, self.markup_mode)
            .map_err(|e| GatewayError::Synthesis(SynthesisError::Markup(e)))?;

        let speech = SpeechRequest {
            language,
            voice,
            text: text.to_string(),
            ssml,
        };
        Ok((speech, phonetic))
    }

    pub async fn synthesize(
        &self,
        request: GatewayRequest,
    ) -> Result<SynthesisResult, GatewayError> {
        let (speech, phonetic) = self.prepare(&request)?;

        info!(
            language = %speech.language,
            voice = %speech.voice,
            chars = speech.text.chars().count(),
            provider = self.synthesizer.name(),
            "Synthesizing speech"
        );

        let audio = self
            .synthesizer
            .synthesize(&speech)
            .await
            .inspect_err(|e| error!(error = %e, "Speech synthesis failed"))?;

        Ok(SynthesisResult::new(audio, phonetic))
    }
}
