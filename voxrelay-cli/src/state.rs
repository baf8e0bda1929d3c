use voxrelay_core::catalog::LanguageCode;

/// What the prompt currently shows, mirrored from client events
#[derive(Debug, Clone)]
pub struct State {
    pub language: LanguageCode,
    pub voice: String,
    pub playing: bool,
    /// Last whole second of the countdown that was printed
    pub countdown_shown: Option<u32>,
}

impl State {
    pub fn new(language: LanguageCode, voice: String) -> Self {
        Self {
            language,
            voice,
            playing: false,
            countdown_shown: None,
        }
    }

    /// Returns the whole seconds to print when the countdown crosses into a
    /// new second
    pub fn countdown_tick(&mut self, remaining_secs: Option<f32>) -> Option<u32> {
        let Some(remaining) = remaining_secs else {
            self.countdown_shown = None;
            return None;
        };

        let whole = remaining.ceil() as u32;
        if whole == 0 || self.countdown_shown == Some(whole) {
            return None;
        }
        self.countdown_shown = Some(whole);
        Some(whole)
    }
}
