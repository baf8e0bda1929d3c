//! Phonetic annotation for Mandarin text.

use pinyin::ToPinyin;

/// Converts raw text into a display-only phonetic rendering
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> String;
}

/// Tone-marked pinyin using the first reading of every character. Runs of
/// characters without a reading (latin words, punctuation) are kept as one
/// segment; whitespace only separates segments.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinTransliterator;

impl Transliterator for PinyinTransliterator {
    fn transliterate(&self, text: &str) -> String {
        let mut segments: Vec<String> = Vec::new();
        let mut passthrough = String::new();

        for ch in text.chars() {
            match ch.to_pinyin() {
                Some(reading) => {
                    flush(&mut passthrough, &mut segments);
                    segments.push(reading.with_tone().to_string());
                }
                None if ch.is_whitespace() => flush(&mut passthrough, &mut segments),
                None => passthrough.push(ch),
            }
        }
        flush(&mut passthrough, &mut segments);

        segments.join(" ")
    }
}

fn flush(passthrough: &mut String, segments: &mut Vec<String>) {
    if !passthrough.is_empty() {
        segments.push(std::mem::take(passthrough));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_marked_syllables() {
        assert_eq!(PinyinTransliterator.transliterate("你好"), "nǐ hǎo");
    }

    #[test]
    fn test_mixed_script_keeps_non_han_runs() {
        let out = PinyinTransliterator.transliterate("这是Azure语音API！");
        assert_eq!(out, "zhè shì Azure yǔ yīn API！");
    }

    #[test]
    fn test_whitespace_only_separates() {
        assert_eq!(PinyinTransliterator.transliterate("  你 好  "), "nǐ hǎo");
        assert_eq!(PinyinTransliterator.transliterate("   "), "");
    }

    #[test]
    fn test_latin_text_passes_through() {
        assert_eq!(PinyinTransliterator.transliterate("hello world"), "hello world");
    }
}
