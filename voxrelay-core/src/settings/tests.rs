use crate::settings::config::{SPEECH_KEY_ENV, SPEECH_REGION_ENV};
use crate::settings::manager::SettingsManager;
use crate::settings::Settings;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("nested").join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert!(settings_path.exists());
    assert_eq!(manager.settings(), Settings::default());
}

#[test]
fn test_corrupt_file_is_backed_up() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "this is = = not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert_eq!(manager.settings(), Settings::default());
    assert!(temp_dir.path().join("settings.toml.backup").exists());
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &settings_path,
        r#"
[speech]
region = "japaneast"
escape_markup = false

[client]
quiescence_ms = 500
"#,
    )
    .unwrap();

    let settings = SettingsManager::from_path(settings_path).unwrap().settings();

    assert_eq!(settings.speech.region, "japaneast");
    assert!(!settings.speech.escape_markup);
    assert_eq!(settings.speech.output_format, "audio-16khz-128kbitrate-mono-mp3");
    assert_eq!(settings.client.quiescence_ms, 500);
    assert_eq!(settings.client.countdown_step_ms, 100);
    assert_eq!(settings.server.bind, "127.0.0.1:3000");

    let client = settings.client_config();
    assert_eq!(client.quiescence, Duration::from_millis(500));
}

#[test]
fn test_save_round_trips_selection() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    manager.update_setting(|settings| {
        settings.client.language = "zh-CN".to_string();
        settings.client.voice = Some("zh-CN-YunxiNeural".to_string());
    });
    manager.save().unwrap();

    let reloaded = SettingsManager::from_path(settings_path).unwrap().settings();
    assert_eq!(reloaded.client.language, "zh-CN");
    assert_eq!(reloaded.client.voice.as_deref(), Some("zh-CN-YunxiNeural"));
}

#[test]
fn test_custom_catalog_replaces_builtin() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &settings_path,
        r#"
fallback_voice = "de-DE-KatjaNeural"

[[languages]]
code = "de-DE"
name = "Deutsch"
aliases = ["german"]
voices = [
    { id = "de-DE-KatjaNeural", gender = "female", display = "Katja" },
    { id = "de-DE-ConradNeural", gender = "male", display = "Conrad" },
]
"#,
    )
    .unwrap();

    let settings = SettingsManager::from_path(settings_path).unwrap().settings();
    let catalog = settings.catalog().unwrap();

    assert_eq!(catalog.languages().len(), 1);
    assert_eq!(catalog.fallback_voice(), "de-DE-KatjaNeural");
    assert_eq!(catalog.normalize_language("german").as_str(), "de-DE");
    assert_eq!(catalog.resolve_voice(&"ja-JP".into(), None), "de-DE-KatjaNeural");
}

#[test]
fn test_speech_config_prefers_environment() {
    let mut settings = Settings::default();
    settings.speech.subscription_key = "from-file".to_string();
    settings.speech.region = "westus".to_string();
    settings.speech.request_timeout_secs = Some(15);

    let config = settings
        .speech_config_with(env_from(&[
            (SPEECH_KEY_ENV, "from-env"),
            (SPEECH_REGION_ENV, "japaneast"),
        ]))
        .unwrap();

    assert_eq!(config.subscription_key, "from-env");
    assert_eq!(config.region, "japaneast");
    assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));

    let config = settings.speech_config_with(env_from(&[])).unwrap();
    assert_eq!(config.subscription_key, "from-file");
    assert_eq!(config.region, "westus");
}

#[test]
fn test_speech_config_requires_secrets() {
    let settings = Settings::default();

    let err = settings.speech_config_with(env_from(&[])).unwrap_err();
    assert!(err.to_string().contains(SPEECH_KEY_ENV));

    let err = settings
        .speech_config_with(env_from(&[(SPEECH_KEY_ENV, "key")]))
        .unwrap_err();
    assert!(err.to_string().contains(SPEECH_REGION_ENV));
}

#[test]
fn test_endpoint_override_does_not_need_region() {
    let mut settings = Settings::default();
    settings.speech.endpoint = Some("http://127.0.0.1:9999/tts".to_string());

    let config = settings
        .speech_config_with(env_from(&[(SPEECH_KEY_ENV, "key")]))
        .unwrap();
    assert_eq!(config.endpoint_url(), "http://127.0.0.1:9999/tts");
}
