use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber;
use voxrelay_core::{
    catalog::VoiceCatalog,
    client::{
        actor::{ClientActor, ClientConfig},
        events::ClientEvent,
        mock::{MockFetchBehavior, MockFetcher},
        state::ClientState,
    },
    playback::mock::MockOutput,
};

/// How long every mock clip "plays" for
pub const CLIP_DURATION: Duration = Duration::from_secs(2);

pub struct Fixture {
    pub actor: ClientActor,
    pub event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    pub fetcher: MockFetcher,
    pub output: MockOutput,
}

impl Fixture {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    #[allow(dead_code)]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_output(config, MockOutput::new(CLIP_DURATION))
    }

    pub fn with_output(config: ClientConfig, output: MockOutput) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let fetcher = MockFetcher::new(MockFetchBehavior::Success);

        let (actor, event_rx) = ClientActor::launch(
            config,
            Arc::new(VoiceCatalog::default()),
            Arc::new(fetcher.clone()),
            Box::new(output.clone()),
        );

        Fixture {
            actor,
            event_rx,
            fetcher,
            output,
        }
    }

    /// Collects events until one matches `done`, which is included as the
    /// last element.
    pub async fn wait_for<F>(&mut self, done: F) -> Vec<ClientEvent>
    where
        F: Fn(&ClientEvent) -> bool,
    {
        let mut events = Vec::new();
        while let Some(event) = self.event_rx.recv().await {
            let finished = done(&event);
            events.push(event);
            if finished {
                return events;
            }
        }
        panic!("Client stopped before the expected event, got {events:?}");
    }

    #[allow(dead_code)]
    pub async fn wait_for_state(&mut self, state: ClientState) -> Vec<ClientEvent> {
        self.wait_for(|event| *event == ClientEvent::StateChanged(state))
            .await
    }

    /// Lets `duration` of (paused) time pass and returns everything emitted
    /// meanwhile
    #[allow(dead_code)]
    pub async fn advance(&mut self, duration: Duration) -> Vec<ClientEvent> {
        tokio::time::sleep(duration).await;
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[allow(dead_code)]
pub fn fetch_count(events: &[ClientEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ClientEvent::FetchStarted { .. }))
        .count()
}

#[allow(dead_code)]
pub fn run<F, Fut>(test_fn: F)
where
    F: FnOnce(Fixture) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    run_with_config(ClientConfig::default(), test_fn)
}

#[allow(dead_code)]
pub fn run_with_config<F, Fut>(config: ClientConfig, test_fn: F)
where
    F: FnOnce(Fixture) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    run_with_output(config, MockOutput::new(CLIP_DURATION), test_fn)
}

pub fn run_with_output<F, Fut>(config: ClientConfig, output: MockOutput, test_fn: F)
where
    F: FnOnce(Fixture) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    use tokio::time::timeout;

    // Paused clock: timers fire as soon as every task is idle
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("Failed to create tokio runtime");

    let local = tokio::task::LocalSet::new();

    runtime.block_on(local.run_until(async {
        let fixture = Fixture::with_output(config, output);
        let test_future = test_fn(fixture);
        timeout(Duration::from_secs(120), test_future)
            .await
            .expect("Test timed out after 120 seconds");
    }));
}
