use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use super::events::{ClientEvent, EventSender};
use super::fetcher::{FetchError, FetchRequest, SynthesisFetcher};
use super::state::ClientState;
use crate::catalog::{LanguageCode, VoiceCatalog};
use crate::playback::{AudioOutput, PlaybackController};
use crate::synthesis::SynthesisResult;

const MIN_COUNTDOWN_STEP: Duration = Duration::from_millis(10);

/// Timing and initial selection for a client actor
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long input must stay unchanged before a fetch is issued
    pub quiescence: Duration,
    /// Granularity of the displayed countdown
    pub countdown_step: Duration,
    pub text: String,
    pub language: LanguageCode,
    pub voice: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            quiescence: Duration::from_secs(3),
            countdown_step: Duration::from_millis(100),
            text: String::new(),
            language: LanguageCode::new("ja-JP"),
            voice: None,
        }
    }
}

/// Input messages for the `ClientActor`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientActorMessage {
    SetText(String),
    /// Language code or alias ("chinese")
    SetLanguage(String),
    SetVoice(String),
    /// Play the most recently fetched audio
    Play,
    /// Restart the countdown for the current input
    Refresh,
}

/// Completions reported back to the actor by the tasks it spawns
enum Internal {
    CountdownExpired {
        generation: u64,
    },
    FetchCompleted {
        generation: u64,
        result: Result<SynthesisResult, FetchError>,
    },
}

/// Handle to the debounced synthesis client.
///
/// Like the other actors in this crate the interface is a pair of channels:
/// `ClientActorMessage`s go in through this handle and `ClientEvent`s come out
/// of the receiver returned by `launch`. The actor runs on the current
/// `LocalSet`.
pub struct ClientActor {
    pub tx: mpsc::UnboundedSender<ClientActorMessage>,
}

impl ClientActor {
    pub fn launch(
        config: ClientConfig,
        catalog: Arc<VoiceCatalog>,
        fetcher: Arc<dyn SynthesisFetcher>,
        output: Box<dyn AudioOutput>,
    ) -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = EventSender::new();
        let (playback, playback_rx) = PlaybackController::new(output);

        let language = catalog.normalize_language(config.language.as_str());
        let voice = catalog.resolve_voice(&language, config.voice.as_deref());

        let state = ActorState {
            quiescence: config.quiescence,
            countdown_step: config.countdown_step.max(MIN_COUNTDOWN_STEP),
            catalog,
            fetcher,
            playback,
            events,
            internal_tx,
            text: config.text,
            language,
            voice,
            phonetic: None,
            state: ClientState::Idle,
            generation: 0,
            countdown: None,
            in_flight: None,
            latest: None,
        };

        tokio::task::spawn_local(run_actor(state, rx, internal_rx, playback_rx));

        (ClientActor { tx }, event_rx)
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        self.tx.send(ClientActorMessage::SetText(text.into()))?;
        Ok(())
    }

    pub fn set_language(&self, language: impl Into<String>) -> Result<()> {
        self.tx
            .send(ClientActorMessage::SetLanguage(language.into()))?;
        Ok(())
    }

    pub fn set_voice(&self, voice: impl Into<String>) -> Result<()> {
        self.tx.send(ClientActorMessage::SetVoice(voice.into()))?;
        Ok(())
    }

    pub fn play(&self) -> Result<()> {
        self.tx.send(ClientActorMessage::Play)?;
        Ok(())
    }

    pub fn refresh(&self) -> Result<()> {
        self.tx.send(ClientActorMessage::Refresh)?;
        Ok(())
    }
}

struct ActorState {
    quiescence: Duration,
    countdown_step: Duration,
    catalog: Arc<VoiceCatalog>,
    fetcher: Arc<dyn SynthesisFetcher>,
    playback: PlaybackController,
    events: EventSender,
    internal_tx: mpsc::UnboundedSender<Internal>,

    text: String,
    language: LanguageCode,
    voice: String,
    phonetic: Option<String>,

    state: ClientState,
    /// Bumped on every input change; tasks carry the generation they were
    /// started for and are ignored once it moves on.
    generation: u64,
    countdown: Option<JoinHandle<()>>,
    /// Generation of the single outstanding fetch
    in_flight: Option<u64>,
    latest: Option<SynthesisResult>,
}

async fn run_actor(
    mut state: ActorState,
    mut rx: mpsc::UnboundedReceiver<ClientActorMessage>,
    mut internal_rx: mpsc::UnboundedReceiver<Internal>,
    mut playback_rx: mpsc::UnboundedReceiver<u64>,
) {
    info!("ClientActor started");

    state.announce_voices();
    state.announce_phonetic();
    state.input_changed();

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    break;
                };
                state.handle_message(message);
            }
            Some(internal) = internal_rx.recv() => state.handle_internal(internal),
            Some(id) = playback_rx.recv() => {
                if state.playback.finish(id) {
                    state.events.send(ClientEvent::PlaybackFinished);
                }
            }
        }
    }

    state.cancel_countdown();
    state.playback.stop();
    info!("ClientActor stopped");
}

impl ActorState {
    fn handle_message(&mut self, message: ClientActorMessage) {
        match message {
            ClientActorMessage::SetText(text) => {
                if text != self.text {
                    self.text = text;
                    self.input_changed();
                }
            }
            ClientActorMessage::SetLanguage(language) => self.change_language(&language),
            ClientActorMessage::SetVoice(voice) => self.change_voice(voice),
            ClientActorMessage::Play => self.play(),
            ClientActorMessage::Refresh => self.input_changed(),
        }
    }

    fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::CountdownExpired { generation } => self.countdown_expired(generation),
            Internal::FetchCompleted { generation, result } => {
                self.fetch_completed(generation, result)
            }
        }
    }

    fn set_state(&mut self, state: ClientState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Client state changed");
            self.state = state;
            self.events.state(state);
        }
    }

    fn announce_voices(&self) {
        self.events.send(ClientEvent::VoicesChanged {
            language: self.language.clone(),
            voices: self.catalog.voices(&self.language).to_vec(),
            selected: self.voice.clone(),
        });
    }

    fn announce_phonetic(&self) {
        self.events.send(ClientEvent::PhoneticChanged {
            text: self.phonetic.clone(),
            visible: self.language.is_mandarin(),
        });
    }

    fn change_language(&mut self, input: &str) {
        let language = self.catalog.normalize_language(input);
        if language == self.language {
            return;
        }

        info!(%language, "Language changed");
        self.voice = self
            .catalog
            .default_voice(&language)
            .map(|voice| voice.id.clone())
            .unwrap_or_default();
        self.language = language;
        if !self.language.is_mandarin() {
            self.phonetic = None;
        }

        self.announce_voices();
        self.announce_phonetic();
        self.input_changed();
    }

    fn change_voice(&mut self, voice: String) {
        if voice == self.voice {
            return;
        }
        if !self.catalog.contains_voice(&self.language, &voice) {
            warn!(%voice, language = %self.language, "Ignoring voice not offered for language");
            self.events.error(format!(
                "Voice {voice} is not available for {}",
                self.language
            ));
            return;
        }

        self.voice = voice;
        self.announce_voices();
        self.input_changed();
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
        }
    }

    /// Re-arm the quiescence timer for the current input, replacing any
    /// pending one
    fn input_changed(&mut self) {
        self.generation += 1;
        let had_countdown = self.countdown.is_some();
        self.cancel_countdown();

        if self.text.trim().is_empty() {
            if had_countdown {
                self.events.countdown(None);
            }
            self.set_state(ClientState::Idle);
            return;
        }

        let generation = self.generation;
        let window = self.quiescence;
        let step = self.countdown_step;
        let events = self.events.clone();
        let internal_tx = self.internal_tx.clone();

        self.countdown = Some(tokio::task::spawn_local(async move {
            let deadline = Instant::now() + window;
            let mut ticker = tokio::time::interval_at(Instant::now() + step, step);

            events.countdown(Some(window));
            loop {
                tokio::select! {
                    biased;
                    _ = sleep_until(deadline) => break,
                    _ = ticker.tick() => {
                        events.countdown(Some(deadline.saturating_duration_since(Instant::now())));
                    }
                }
            }
            events.countdown(None);

            let _ = internal_tx.send(Internal::CountdownExpired { generation });
        }));

        self.set_state(ClientState::CountingDown);
    }

    fn countdown_expired(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Ignoring stale countdown");
            return;
        }
        self.countdown = None;
        self.set_state(ClientState::Fetching);

        if let Some(outstanding) = self.in_flight {
            // Issued from fetch_completed once the outstanding request returns
            debug!(outstanding, generation, "Fetch already in flight, deferring");
            return;
        }
        self.start_fetch();
    }

    fn start_fetch(&mut self) {
        let request = FetchRequest {
            text: self.text.clone(),
            language: self.language.clone(),
            voice: self.voice.clone(),
        };
        let generation = self.generation;
        self.in_flight = Some(generation);

        info!(generation, language = %request.language, voice = %request.voice, "Fetching audio");
        self.events.send(ClientEvent::FetchStarted {
            text: request.text.clone(),
            language: request.language.clone(),
            voice: request.voice.clone(),
        });

        let fetcher = self.fetcher.clone();
        let internal_tx = self.internal_tx.clone();
        tokio::task::spawn_local(async move {
            let result = fetcher.fetch(&request).await;
            let _ = internal_tx.send(Internal::FetchCompleted { generation, result });
        });
    }

    fn fetch_completed(&mut self, generation: u64, result: Result<SynthesisResult, FetchError>) {
        self.in_flight = None;

        if generation != self.generation {
            debug!(generation, current = self.generation, "Discarding stale fetch result");
            if self.state == ClientState::Fetching {
                self.start_fetch();
            }
            return;
        }

        match result {
            Ok(result) => {
                if self.language.is_mandarin() && result.phonetic.is_some() {
                    self.phonetic = result.phonetic.clone();
                    self.announce_phonetic();
                }
                self.events.send(ClientEvent::AudioReady {
                    bytes: result.audio.len(),
                });
                self.latest = Some(result);
                self.set_state(ClientState::Ready);
            }
            Err(e) => {
                warn!(error = %e, "Fetching audio failed");
                self.latest = None;
                self.events.error(e.to_string());
                self.set_state(ClientState::Error);
            }
        }
    }

    fn play(&mut self) {
        if self.playback.is_playing() {
            debug!("Already playing");
            return;
        }
        if !self.state.can_play() {
            self.events.error("Audio is still being prepared");
            return;
        }
        let Some(latest) = &self.latest else {
            self.events.error("No audio available");
            return;
        };

        match self.playback.play(&latest.audio) {
            Ok(_) => self.events.send(ClientEvent::PlaybackStarted),
            Err(e) => self.events.send(ClientEvent::PlaybackFailed(e.to_string())),
        }
    }
}
