use std::time::Duration;
use tokio::time::Instant;
use voxrelay_core::{
    catalog::LanguageCode,
    client::{actor::ClientConfig, events::ClientEvent, mock::MockFetchBehavior, state::ClientState},
    playback::mock::MockOutput,
};

mod fixture;

use fixture::{fetch_count, CLIP_DURATION};

fn config_with_text(text: &str) -> ClientConfig {
    ClientConfig {
        text: text.to_string(),
        ..ClientConfig::default()
    }
}

fn is_fetch_started(event: &ClientEvent) -> bool {
    matches!(event, ClientEvent::FetchStarted { .. })
}

#[test]
fn test_rapid_edits_issue_one_fetch() {
    fixture::run(|mut fixture| async move {
        fixture.actor.set_text("h").unwrap();
        let mut events = fixture.advance(Duration::from_secs(1)).await;
        fixture.actor.set_text("he").unwrap();
        events.extend(fixture.advance(Duration::from_millis(2900)).await);
        fixture.actor.set_text("hello").unwrap();

        let last_edit = Instant::now();
        events.extend(fixture.wait_for(is_fetch_started).await);
        assert!(last_edit.elapsed() >= Duration::from_secs(3));

        events.extend(fixture.wait_for_state(ClientState::Ready).await);

        assert_eq!(fetch_count(&events), 1);
        assert_eq!(fixture.fetcher.call_count(), 1);
        assert_eq!(fixture.fetcher.requests()[0].text, "hello");
        assert!(events.contains(&ClientEvent::AudioReady { bytes: 5 }));
    });
}

#[test]
fn test_countdown_is_displayed_until_expiry() {
    fixture::run_with_config(config_with_text("hi"), |mut fixture| async move {
        let events = fixture.wait_for(is_fetch_started).await;

        let countdown: Vec<Option<f32>> = events
            .iter()
            .filter_map(|event| match event {
                ClientEvent::Countdown { remaining_secs } => Some(*remaining_secs),
                _ => None,
            })
            .collect();

        assert_eq!(countdown.first(), Some(&Some(3.0)));
        assert_eq!(countdown.last(), Some(&None));

        let shown: Vec<f32> = countdown.iter().flatten().copied().collect();
        assert!(shown.len() > 10, "expected sub-step updates, got {shown:?}");
        assert!(shown.windows(2).all(|pair| pair[1] <= pair[0]));
    });
}

#[test]
fn test_empty_text_returns_to_idle() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.actor.set_text("   ").unwrap();

        let events = fixture.wait_for_state(ClientState::Idle).await;
        assert!(events.contains(&ClientEvent::Countdown {
            remaining_secs: None
        }));

        let events = fixture.advance(Duration::from_secs(10)).await;
        assert_eq!(fetch_count(&events), 0);
        assert_eq!(fixture.fetcher.call_count(), 0);
    });
}

#[test]
fn test_fetch_failure_clears_audio() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.wait_for_state(ClientState::Ready).await;

        fixture.fetcher.set_behavior(MockFetchBehavior::Status(500));
        fixture.actor.set_text("hello again").unwrap();

        let events = fixture.wait_for_state(ClientState::Error).await;
        assert!(events
            .iter()
            .any(|e| matches!(e, ClientEvent::Error(message) if message.contains("500"))));

        // The audio from the earlier success must not be playable any more
        fixture.actor.play().unwrap();
        let events = fixture.wait_for(|e| matches!(e, ClientEvent::Error(_))).await;
        assert_eq!(
            events.last(),
            Some(&ClientEvent::Error("No audio available".to_string()))
        );
        assert_eq!(fixture.output.started(), 0);
    });
}

#[test]
fn test_refresh_after_error_fetches_again() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.fetcher.set_behavior(MockFetchBehavior::TransportError);
        fixture.wait_for_state(ClientState::Error).await;

        fixture.fetcher.set_behavior(MockFetchBehavior::Success);
        fixture.actor.refresh().unwrap();

        fixture.wait_for_state(ClientState::Ready).await;
        assert_eq!(fixture.fetcher.call_count(), 2);
    });
}

#[test]
fn test_input_during_fetch_is_deferred() {
    fixture::run_with_config(config_with_text("first"), |mut fixture| async move {
        fixture.fetcher.set_latency(Duration::from_secs(5));

        fixture.wait_for(is_fetch_started).await;
        fixture.advance(Duration::from_secs(1)).await;
        fixture.actor.set_text("second take").unwrap();

        // Countdown for the new text expires while the first request is
        // still outstanding
        let events = fixture.advance(Duration::from_millis(3500)).await;
        assert!(events.contains(&ClientEvent::StateChanged(ClientState::Fetching)));
        assert_eq!(fetch_count(&events), 0);
        assert_eq!(fixture.fetcher.call_count(), 1);

        let events = fixture.wait_for_state(ClientState::Ready).await;
        assert_eq!(fetch_count(&events), 1);

        let ready: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                ClientEvent::AudioReady { bytes } => Some(*bytes),
                _ => None,
            })
            .collect();
        assert_eq!(ready, vec!["second take".len()]);

        let texts: Vec<String> = fixture
            .fetcher
            .requests()
            .into_iter()
            .map(|request| request.text)
            .collect();
        assert_eq!(texts, vec!["first", "second take"]);
    });
}

#[test]
fn test_play_is_refused_while_fetching() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.fetcher.set_latency(Duration::from_secs(5));
        fixture.wait_for(is_fetch_started).await;

        fixture.actor.play().unwrap();
        let events = fixture.wait_for(|e| matches!(e, ClientEvent::Error(_))).await;
        assert_eq!(
            events.last(),
            Some(&ClientEvent::Error(
                "Audio is still being prepared".to_string()
            ))
        );
        assert_eq!(fixture.output.started(), 0);
    });
}

#[test]
fn test_playback_runs_to_completion() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.wait_for_state(ClientState::Ready).await;

        fixture.actor.play().unwrap();
        fixture
            .wait_for(|e| *e == ClientEvent::PlaybackStarted)
            .await;
        assert_eq!(fixture.output.started(), 1);

        let started = Instant::now();
        fixture
            .wait_for(|e| *e == ClientEvent::PlaybackFinished)
            .await;
        assert!(started.elapsed() >= CLIP_DURATION);
        assert_eq!(fixture.output.released(), 1);

        // Stored audio stays playable after a clip ends
        fixture.actor.play().unwrap();
        fixture
            .wait_for(|e| *e == ClientEvent::PlaybackStarted)
            .await;
        assert_eq!(fixture.output.started(), 2);
    });
}

#[test]
fn test_playback_failure_is_reported_and_retryable() {
    let config = config_with_text("hello");
    fixture::run_with_output(config, MockOutput::failing(), |mut fixture| async move {
        fixture.wait_for_state(ClientState::Ready).await;

        for _ in 0..2 {
            fixture.actor.play().unwrap();
            let events = fixture
                .wait_for(|e| matches!(e, ClientEvent::PlaybackFailed(_)))
                .await;
            assert!(!events.contains(&ClientEvent::PlaybackStarted));
            assert!(matches!(
                events.last(),
                Some(ClientEvent::PlaybackFailed(message)) if message.contains("no output device")
            ));
        }

        assert_eq!(fixture.output.started(), 0);
        assert_eq!(fixture.output.released(), 0);
    });
}

#[test]
fn test_teardown_releases_playback() {
    fixture::run_with_config(config_with_text("hello"), |mut fixture| async move {
        fixture.wait_for_state(ClientState::Ready).await;
        fixture.actor.play().unwrap();
        fixture
            .wait_for(|e| *e == ClientEvent::PlaybackStarted)
            .await;

        drop(fixture.actor);
        while fixture.event_rx.recv().await.is_some() {}

        assert_eq!(fixture.output.started(), 1);
        assert_eq!(fixture.output.released(), 1);
    });
}

#[test]
fn test_language_change_resets_voice_and_phonetic() {
    fixture::run_with_config(config_with_text("你好"), |mut fixture| async move {
        fixture.actor.set_language("chinese").unwrap();

        let events = fixture.wait_for_state(ClientState::Ready).await;
        assert!(events.contains(&ClientEvent::PhoneticChanged {
            text: None,
            visible: true
        }));
        assert!(events.contains(&ClientEvent::PhoneticChanged {
            text: Some("nǐ hǎo".to_string()),
            visible: true
        }));
        let selected = events.iter().rev().find_map(|event| match event {
            ClientEvent::VoicesChanged {
                language, selected, ..
            } => Some((language.clone(), selected.clone())),
            _ => None,
        });
        assert_eq!(
            selected,
            Some((
                LanguageCode::new("zh-CN"),
                "zh-CN-XiaoxiaoNeural".to_string()
            ))
        );

        let requests = fixture.fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].language.as_str(), "zh-CN");
        assert_eq!(requests[0].voice, "zh-CN-XiaoxiaoNeural");

        fixture.actor.set_voice("zh-CN-YunxiNeural").unwrap();
        fixture.wait_for_state(ClientState::Ready).await;
        assert_eq!(
            fixture.fetcher.requests().last().map(|r| r.voice.clone()),
            Some("zh-CN-YunxiNeural".to_string())
        );

        fixture.actor.set_language("fr-FR").unwrap();
        let events = fixture
            .wait_for(|e| matches!(e, ClientEvent::PhoneticChanged { .. }))
            .await;
        assert!(events.iter().any(|event| matches!(
            event,
            ClientEvent::VoicesChanged { selected, .. } if selected == "fr-FR-DeniseNeural"
        )));
        assert_eq!(
            events.last(),
            Some(&ClientEvent::PhoneticChanged {
                text: None,
                visible: false
            })
        );
    });
}

#[test]
fn test_unknown_voice_is_rejected() {
    fixture::run(|mut fixture| async move {
        fixture.actor.set_voice("fr-FR-HenriNeural").unwrap();

        let events = fixture.wait_for(|e| matches!(e, ClientEvent::Error(_))).await;
        assert_eq!(
            events.last(),
            Some(&ClientEvent::Error(
                "Voice fr-FR-HenriNeural is not available for ja-JP".to_string()
            ))
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, ClientEvent::StateChanged(ClientState::CountingDown))));
    });
}
