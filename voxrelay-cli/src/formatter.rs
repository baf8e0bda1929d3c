use voxrelay_core::catalog::{LanguageEntry, VoiceDescriptor};
use voxrelay_core::client::ClientState;

/// ANSI output for the interactive prompt
pub struct Formatter;

impl Formatter {
    pub fn print_system(&self, msg: &str) {
        println!("\x1b[33m[System]\x1b[0m {msg}");
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("\x1b[31m[Error]\x1b[0m {msg}");
    }

    pub fn print_status(&self, state: ClientState) {
        let color = match state {
            ClientState::Ready => "32",
            ClientState::Error => "31",
            _ => "90",
        };
        println!("\x1b[{color}m[{state}]\x1b[0m");
    }

    pub fn print_countdown(&self, seconds: u32) {
        println!("\x1b[90m  fetching audio in {seconds}s\x1b[0m");
    }

    pub fn print_phonetic(&self, phonetic: &str) {
        println!("\x1b[36m[Pinyin]\x1b[0m {phonetic}");
    }

    pub fn print_languages(&self, languages: &[LanguageEntry], current: &str) {
        for entry in languages {
            let marker = if entry.code.as_str() == current { "*" } else { " " };
            let aliases = entry.aliases.join(", ");
            println!(" {marker} {:<7} {} \x1b[90m{aliases}\x1b[0m", entry.code, entry.name);
        }
    }

    pub fn print_voices(&self, voices: &[VoiceDescriptor], selected: &str) {
        if voices.is_empty() {
            self.print_system("No voices listed for this language, the fallback voice is used");
            return;
        }
        for voice in voices {
            let marker = if voice.id == selected { "*" } else { " " };
            println!(" {marker} {:<24} {}", voice.id, voice.display);
        }
    }

    pub fn prompt(&self) -> String {
        "\x1b[35m>\x1b[0m ".to_string()
    }
}
