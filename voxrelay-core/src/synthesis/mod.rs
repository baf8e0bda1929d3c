pub mod azure;
pub mod error;
pub mod mock;
pub mod provider;
pub mod types;

pub use azure::{AzureSpeech, AzureSpeechConfig};
pub use error::SynthesisError;
pub use provider::SpeechSynthesizer;
pub use types::{SpeechRequest, SynthesisResult, AUDIO_MPEG};
