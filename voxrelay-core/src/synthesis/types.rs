use serde::{Deserialize, Serialize};

use crate::catalog::LanguageCode;

pub const AUDIO_MPEG: &str = "audio/mpeg";

/// A fully resolved request as handed to a speech vendor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub language: LanguageCode,
    pub voice: String,
    pub text: String,
    /// SSML document built from the fields above
    pub ssml: String,
}

/// Audio returned for one synthesis call plus the optional phonetic
/// annotation. Held only until the next request supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SynthesisResult {
    #[serde(skip)]
    pub audio: Vec<u8>,
    pub phonetic: Option<String>,
}

impl SynthesisResult {
    pub fn new(audio: Vec<u8>, phonetic: Option<String>) -> Self {
        Self { audio, phonetic }
    }
}
