use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A vendor voice name plus the metadata shown in voice pickers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceDescriptor {
    pub id: String,
    pub gender: Gender,
    pub display: String,
}

impl VoiceDescriptor {
    pub fn new(id: &str, gender: Gender, display: &str) -> Self {
        Self {
            id: id.to_string(),
            gender,
            display: display.to_string(),
        }
    }
}

/// BCP-47 language code used as the catalog key and as `xml:lang` in the
/// synthesis markup. Codes outside the catalog are carried through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub const MANDARIN: &'static str = "zh-CN";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_mandarin(&self) -> bool {
        self.0 == Self::MANDARIN
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// One row of the catalog: a language and the voices offered for it, in
/// preference order (the first voice is the language default).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: LanguageCode,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub sample_text: String,
    pub voices: Vec<VoiceDescriptor>,
}
