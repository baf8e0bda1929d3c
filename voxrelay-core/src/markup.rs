//! SSML document sent to the speech vendor.

use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::catalog::LanguageCode;

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

/// How user text is embedded in the `<voice>` element. Attributes are always
/// escaped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkupMode {
    /// Reserved characters in the text are escaped
    #[default]
    Escaped,
    /// Text is written as-is, so callers may pass their own SSML tags
    Verbatim,
}

impl MarkupMode {
    pub fn from_escape_flag(escape: bool) -> Self {
        if escape {
            Self::Escaped
        } else {
            Self::Verbatim
        }
    }
}

pub fn build_ssml(
    language: &LanguageCode,
    voice: &str,
    text: &str,
    mode: MarkupMode,
) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let speak = BytesStart::new("speak").with_attributes([
        ("version", "1.0"),
        ("xmlns", SSML_NAMESPACE),
        ("xml:lang", language.as_str()),
    ]);
    writer.write_event(Event::Start(speak))?;

    let voice_start = BytesStart::new("voice").with_attributes([("name", voice)]);
    writer.write_event(Event::Start(voice_start))?;

    let content = match mode {
        MarkupMode::Escaped => BytesText::new(text),
        MarkupMode::Verbatim => BytesText::from_escaped(text),
    };
    writer.write_event(Event::Text(content))?;

    writer.write_event(Event::End(BytesEnd::new("voice")))?;
    writer.write_event(Event::End(BytesEnd::new("speak")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}
