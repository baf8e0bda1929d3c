//! Playback of fetched audio.
//!
//! A playback handle owns the output resources for one clip; dropping it
//! stops playback and releases them (RAII). The controller keeps at most one
//! handle alive, so starting a new clip releases the previous one.

pub mod mock;
#[cfg(feature = "playback")]
pub mod rodio;

use anyhow::Result;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Something that can play encoded audio
pub trait AudioOutput {
    fn start(&self, audio: &[u8]) -> Result<Box<dyn ActivePlayback>>;
}

/// A clip currently being played by an `AudioOutput`
pub trait ActivePlayback {
    fn is_finished(&self) -> bool;
}

/// Audio playback handle - dropping stops playback
pub struct PlaybackHandle {
    inner: Box<dyn ActivePlayback>,
}

impl PlaybackHandle {
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

struct ActiveClip {
    id: u64,
    _handle: Rc<PlaybackHandle>,
    watcher: JoinHandle<()>,
}

impl Drop for ActiveClip {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Plays one clip at a time and reports natural completion on the channel
/// returned from `new`. Must be used from within a `LocalSet`.
pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    finished_tx: mpsc::UnboundedSender<u64>,
    current: Option<ActiveClip>,
    next_id: u64,
}

impl PlaybackController {
    pub fn new(output: Box<dyn AudioOutput>) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let controller = Self {
            output,
            finished_tx,
            current: None,
            next_id: 0,
        };
        (controller, finished_rx)
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Start playing `audio`, releasing any clip that is still active.
    /// Returns the id that will be reported once playback completes.
    pub fn play(&mut self, audio: &[u8]) -> Result<u64> {
        self.stop();

        let inner = self.output.start(audio).inspect_err(|e| {
            warn!(error = ?e, "Failed to start playback");
        })?;

        self.next_id += 1;
        let id = self.next_id;
        let handle = Rc::new(PlaybackHandle { inner });
        let watcher = tokio::task::spawn_local(watch(
            id,
            Rc::downgrade(&handle),
            self.finished_tx.clone(),
        ));

        debug!(id, bytes = audio.len(), "Playback started");
        self.current = Some(ActiveClip {
            id,
            _handle: handle,
            watcher,
        });
        Ok(id)
    }

    /// Handle a completion report. Returns false for clips that were already
    /// superseded.
    pub fn finish(&mut self, id: u64) -> bool {
        match &self.current {
            Some(clip) if clip.id == id => {
                self.current = None;
                debug!(id, "Playback finished");
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        if let Some(clip) = self.current.take() {
            debug!(id = clip.id, "Releasing playback");
        }
    }
}

async fn watch(id: u64, handle: Weak<PlaybackHandle>, finished_tx: mpsc::UnboundedSender<u64>) {
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        let Some(handle) = handle.upgrade() else {
            return;
        };
        if handle.is_finished() {
            let _ = finished_tx.send(id);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockOutput;
    use super::*;

    fn run_local<F: std::future::Future<Output = ()>>(test: F) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();
        let local = tokio::task::LocalSet::new();
        runtime.block_on(local.run_until(test));
    }

    #[test]
    fn test_reports_natural_completion() {
        run_local(async {
            let output = MockOutput::new(Duration::from_secs(2));
            let (mut controller, mut finished_rx) = PlaybackController::new(Box::new(output));

            let id = controller.play(b"clip").unwrap();
            assert!(controller.is_playing());

            let finished = finished_rx.recv().await.unwrap();
            assert_eq!(finished, id);
            assert!(controller.finish(finished));
            assert!(!controller.is_playing());
        });
    }

    #[test]
    fn test_new_clip_releases_previous() {
        run_local(async {
            let output = MockOutput::new(Duration::from_secs(10));
            let (mut controller, _finished_rx) =
                PlaybackController::new(Box::new(output.clone()));

            let first = controller.play(b"one").unwrap();
            let second = controller.play(b"two").unwrap();

            assert_ne!(first, second);
            assert_eq!(output.started(), 2);
            assert_eq!(output.released(), 1);
            assert!(!controller.finish(first), "superseded clip must be ignored");

            controller.stop();
            assert_eq!(output.released(), 2);
        });
    }

    #[test]
    fn test_start_failure_leaves_controller_idle() {
        run_local(async {
            let output = MockOutput::failing();
            let (mut controller, _finished_rx) = PlaybackController::new(Box::new(output));

            assert!(controller.play(b"clip").is_err());
            assert!(!controller.is_playing());
        });
    }
}
