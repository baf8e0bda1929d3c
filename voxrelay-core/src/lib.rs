pub mod catalog;
pub mod client;
pub mod gateway;
pub mod markup;
pub mod phonetic;
pub mod playback;
pub mod settings;
pub mod synthesis;

pub use catalog::{LanguageCode, VoiceCatalog};
pub use client::{ClientActor, ClientActorMessage, ClientEvent, ClientState};
pub use gateway::{GatewayRequest, SynthesisGateway};
pub use settings::{Settings, SettingsManager};
pub use synthesis::{AzureSpeech, SpeechSynthesizer};
