//! Voice catalog: which voices each supported language offers and how a
//! requested voice is resolved against it.

pub mod types;

pub use types::{Gender, LanguageCode, LanguageEntry, VoiceDescriptor};

use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Voice used when the requested language is not in the catalog at all
pub const DEFAULT_FALLBACK_VOICE: &str = "ja-JP-NanamiNeural";

/// Immutable language -> voices table. Built once at startup (from the
/// built-in table or from settings) and shared behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceCatalog {
    languages: Vec<LanguageEntry>,
    fallback_voice: String,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self {
            languages: builtin_languages(),
            fallback_voice: DEFAULT_FALLBACK_VOICE.to_string(),
        }
    }
}

impl VoiceCatalog {
    /// Build a catalog from explicit entries. Every language must offer at
    /// least one voice and codes must be unique.
    pub fn new(languages: Vec<LanguageEntry>, fallback_voice: impl Into<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &languages {
            if entry.voices.is_empty() {
                bail!("language {} has no voices", entry.code);
            }
            if !seen.insert(entry.code.clone()) {
                bail!("language {} is listed twice", entry.code);
            }
        }

        Ok(Self {
            languages,
            fallback_voice: fallback_voice.into(),
        })
    }

    pub fn languages(&self) -> &[LanguageEntry] {
        &self.languages
    }

    pub fn fallback_voice(&self) -> &str {
        &self.fallback_voice
    }

    pub fn language(&self, code: &LanguageCode) -> Option<&LanguageEntry> {
        self.languages.iter().find(|entry| &entry.code == code)
    }

    /// Voices offered for `code`, empty when the language is unknown
    pub fn voices(&self, code: &LanguageCode) -> &[VoiceDescriptor] {
        self.language(code)
            .map(|entry| entry.voices.as_slice())
            .unwrap_or_default()
    }

    pub fn default_voice(&self, code: &LanguageCode) -> Option<&VoiceDescriptor> {
        self.voices(code).first()
    }

    pub fn contains_voice(&self, code: &LanguageCode, voice_id: &str) -> bool {
        self.voices(code).iter().any(|voice| voice.id == voice_id)
    }

    /// Pick the vendor voice name for a request: the requested voice if the
    /// language offers it, else the language default, else the fallback voice.
    pub fn resolve_voice(&self, code: &LanguageCode, requested: Option<&str>) -> String {
        if let Some(voice_id) = requested {
            if self.contains_voice(code, voice_id) {
                return voice_id.to_string();
            }
        }

        self.default_voice(code)
            .map(|voice| voice.id.clone())
            .unwrap_or_else(|| self.fallback_voice.clone())
    }

    /// Map a code or a friendly alias ("chinese") to the catalog code.
    /// Unknown input is returned as-is.
    pub fn normalize_language(&self, input: &str) -> LanguageCode {
        let input = input.trim();
        self.languages
            .iter()
            .find(|entry| {
                entry.code.as_str().eq_ignore_ascii_case(input)
                    || entry
                        .aliases
                        .iter()
                        .any(|alias| alias.eq_ignore_ascii_case(input))
            })
            .map(|entry| entry.code.clone())
            .unwrap_or_else(|| LanguageCode::new(input))
    }
}

fn builtin_languages() -> Vec<LanguageEntry> {
    use Gender::{Female, Male};

    vec![
        LanguageEntry {
            code: LanguageCode::new("ja-JP"),
            name: "日本語".to_string(),
            aliases: vec!["japanese".to_string()],
            sample_text: "こんにちは、Azure Speech APIです！".to_string(),
            voices: vec![
                VoiceDescriptor::new("ja-JP-NanamiNeural", Female, "七海（女性）"),
                VoiceDescriptor::new("ja-JP-KeitaNeural", Male, "圭太（男性）"),
                VoiceDescriptor::new("ja-JP-AoiNeural", Female, "葵（女性）"),
                VoiceDescriptor::new("ja-JP-DaichiNeural", Male, "大地（男性）"),
                VoiceDescriptor::new("ja-JP-MayuNeural", Female, "まゆ（女性）"),
                VoiceDescriptor::new("ja-JP-ShioriNeural", Female, "志織（女性）"),
            ],
        },
        LanguageEntry {
            code: LanguageCode::new("en-US"),
            name: "English".to_string(),
            aliases: vec!["english".to_string()],
            sample_text: "Hello, this is Azure Speech API!".to_string(),
            voices: vec![
                VoiceDescriptor::new("en-US-JennyNeural", Female, "Jenny (女性)"),
                VoiceDescriptor::new("en-US-GuyNeural", Male, "Guy (男性)"),
                VoiceDescriptor::new("en-US-AriaNeural", Female, "Aria (女性)"),
                VoiceDescriptor::new("en-US-DavisNeural", Male, "Davis (男性)"),
                VoiceDescriptor::new("en-US-AmberNeural", Female, "Amber (女性)"),
                VoiceDescriptor::new("en-US-AndrewNeural", Male, "Andrew (男性)"),
            ],
        },
        LanguageEntry {
            code: LanguageCode::new(LanguageCode::MANDARIN),
            name: "中文（简体）".to_string(),
            aliases: vec!["chinese".to_string()],
            sample_text: "你好，这是Azure语音API！".to_string(),
            voices: vec![
                VoiceDescriptor::new("zh-CN-XiaoxiaoNeural", Female, "晓晓 (女性)"),
                VoiceDescriptor::new("zh-CN-YunjianNeural", Male, "云健 (男性)"),
                VoiceDescriptor::new("zh-CN-XiaoyiNeural", Female, "晓伊 (女性)"),
                VoiceDescriptor::new("zh-CN-YunyangNeural", Male, "云扬 (男性)"),
                VoiceDescriptor::new("zh-CN-XiaochenNeural", Female, "晓辰 (女性)"),
                VoiceDescriptor::new("zh-CN-YunxiNeural", Male, "云希 (男性)"),
            ],
        },
        LanguageEntry {
            code: LanguageCode::new("fr-FR"),
            name: "Français".to_string(),
            aliases: vec!["french".to_string()],
            sample_text: "Bonjour, c'est l'API Azure Speech !".to_string(),
            voices: vec![
                VoiceDescriptor::new("fr-FR-DeniseNeural", Female, "Denise (女性)"),
                VoiceDescriptor::new("fr-FR-HenriNeural", Male, "Henri (男性)"),
                VoiceDescriptor::new("fr-FR-EloiseNeural", Female, "Eloise (女性)"),
                VoiceDescriptor::new("fr-FR-JacquelineNeural", Female, "Jacqueline (女性)"),
                VoiceDescriptor::new("fr-FR-JeromeNeural", Male, "Jerome (男性)"),
                VoiceDescriptor::new("fr-FR-YvesNeural", Male, "Yves (男性)"),
            ],
        },
    ]
}
