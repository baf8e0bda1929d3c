pub mod config;
pub mod manager;

#[cfg(test)]
mod tests;

pub use config::{ClientSettings, ServerSettings, Settings, SpeechSettings};
pub use manager::SettingsManager;
