use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use voxrelay_core::catalog::VoiceCatalog;
use voxrelay_core::client::{ClientActor, ClientEvent, HttpFetcher};
use voxrelay_core::playback::rodio::RodioOutput;
use voxrelay_core::settings::SettingsManager;

use crate::commands::{parse_command, Command, LocalCommandResult, HELP};
use crate::formatter::Formatter;
use crate::state::State;

/// Command line overrides applied on top of the settings file
#[derive(Debug, Default)]
pub struct LaunchOptions {
    pub settings_path: Option<PathBuf>,
    pub gateway_url: Option<String>,
    pub language: Option<String>,
    pub voice: Option<String>,
    pub text: Option<String>,
}

pub struct InteractiveApp {
    client: ClientActor,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    settings: SettingsManager,
    catalog: Arc<VoiceCatalog>,
    formatter: Formatter,
    state: State,
}

impl InteractiveApp {
    pub fn new(options: LaunchOptions) -> Result<Self> {
        let settings = match options.settings_path {
            Some(path) => SettingsManager::from_path(path)?,
            None => SettingsManager::new()?,
        };
        let current = settings.settings();

        let catalog = Arc::new(current.catalog().context("Invalid voice catalog in settings")?);
        let gateway_url = options
            .gateway_url
            .unwrap_or_else(|| current.client.gateway_url.clone());
        let fetcher = HttpFetcher::new(&gateway_url)?;
        info!(endpoint = fetcher.endpoint(), "Using gateway");

        let mut config = current.client_config();
        if let Some(language) = options.language {
            config.language = catalog.normalize_language(&language);
            config.voice = None;
        }
        if options.voice.is_some() {
            config.voice = options.voice;
        }
        config.text = options.text.unwrap_or_default();

        let language = catalog.normalize_language(config.language.as_str());
        let voice = catalog.resolve_voice(&language, config.voice.as_deref());

        let (client, event_rx) = ClientActor::launch(
            config,
            catalog.clone(),
            Arc::new(fetcher),
            Box::new(RodioOutput),
        );

        let formatter = Formatter;
        formatter.print_system(&format!(
            "Gateway {gateway_url}. Type text to hear it, /help for commands, /quit to exit"
        ));

        Ok(Self {
            client,
            event_rx,
            settings,
            catalog,
            formatter,
            state: State::new(language, voice),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut line_rx = spawn_reader(self.formatter.prompt());

        loop {
            tokio::select! {
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_command(&line) {
                        LocalCommandResult::Command(Command::Quit) => break,
                        LocalCommandResult::Command(command) => self.handle_command(command)?,
                        LocalCommandResult::Invalid { msg } => self.formatter.print_error(&msg),
                    }
                }
                event = self.event_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.format_event(event);
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Text(text) => self.client.set_text(text)?,
            Command::Language(input) => {
                let language = self.catalog.normalize_language(&input);
                if self.catalog.language(&language).is_none() {
                    self.formatter.print_system(&format!(
                        "{language} is not in the catalog, the fallback voice will be used"
                    ));
                }
                self.client.set_language(input)?;
                if let Some(entry) = self.catalog.language(&language) {
                    if language != self.state.language && !entry.sample_text.is_empty() {
                        self.formatter
                            .print_system(&format!("Sample text: {}", entry.sample_text));
                        self.client.set_text(entry.sample_text.clone())?;
                    }
                }
            }
            Command::Voice(voice) => self.client.set_voice(voice)?,
            Command::Languages => self
                .formatter
                .print_languages(self.catalog.languages(), self.state.language.as_str()),
            Command::Voices => self.formatter.print_voices(
                self.catalog.voices(&self.state.language),
                &self.state.voice,
            ),
            Command::Play if self.state.playing => self.formatter.print_system("Already playing"),
            Command::Play => self.client.play()?,
            Command::Refresh => self.client.refresh()?,
            Command::Save => self.save_selection(),
            Command::Help => self.formatter.print_system(HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    fn save_selection(&self) {
        let language = self.state.language.to_string();
        let voice = self.state.voice.clone();
        self.settings.update_setting(|settings| {
            settings.client.language = language;
            settings.client.voice = Some(voice);
        });

        match self.settings.save() {
            Ok(()) => self.formatter.print_system(&format!(
                "Saved {} / {} to {}",
                self.state.language,
                self.state.voice,
                self.settings.path().display()
            )),
            Err(e) => {
                warn!(error = ?e, "Failed to save settings");
                self.formatter
                    .print_error(&format!("Failed to save settings: {e:?}"));
            }
        }
    }

    fn format_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::StateChanged(state) => self.formatter.print_status(state),
            ClientEvent::Countdown { remaining_secs } => {
                if let Some(seconds) = self.state.countdown_tick(remaining_secs) {
                    self.formatter.print_countdown(seconds);
                }
            }
            ClientEvent::VoicesChanged {
                language, selected, ..
            } => {
                if language != self.state.language || selected != self.state.voice {
                    self.formatter
                        .print_system(&format!("Language {language}, voice {selected}"));
                }
                self.state.language = language;
                self.state.voice = selected;
            }
            ClientEvent::PhoneticChanged { text, visible } => {
                if let (true, Some(text)) = (visible, text) {
                    self.formatter.print_phonetic(&text);
                }
            }
            ClientEvent::FetchStarted { .. } => {}
            ClientEvent::AudioReady { bytes } => self
                .formatter
                .print_system(&format!("Audio ready ({bytes} bytes), /play to listen")),
            ClientEvent::PlaybackStarted => {
                self.state.playing = true;
                self.formatter.print_system("Playing");
            }
            ClientEvent::PlaybackFinished => {
                self.state.playing = false;
                self.formatter.print_system("Playback finished");
            }
            ClientEvent::PlaybackFailed(e) => {
                self.state.playing = false;
                self.formatter.print_error(&format!("Playback failed: {e}"));
            }
            ClientEvent::Error(e) => self.formatter.print_error(&e),
        }
    }
}

/// rustyline blocks, so it runs on its own thread and hands lines over a
/// channel. The channel closes on EOF.
fn spawn_reader(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!(error = ?e, "Failed to start line editor");
                return;
            }
        };

        loop {
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(_) => break,
            };

            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(&line);
            }
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    line_rx
}
