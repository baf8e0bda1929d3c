//! `X-Pinyin` response header encoding.
//!
//! The value uses the same unreserved set as JavaScript's
//! `encodeURIComponent`, so browser front-ends can decode it with
//! `decodeURIComponent`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PHONETIC_HEADER: &str = "X-Pinyin";

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_phonetic(phonetic: Option<&str>) -> String {
    match phonetic {
        Some(text) => utf8_percent_encode(text, COMPONENT).to_string(),
        None => String::new(),
    }
}

/// Decode a header value; an empty value means no annotation
pub fn decode_phonetic(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}
