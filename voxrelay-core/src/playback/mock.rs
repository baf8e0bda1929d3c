use anyhow::{bail, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::{ActivePlayback, AudioOutput};

/// Output that "plays" every clip for a fixed duration of tokio time and
/// counts how many clips were started and released.
#[derive(Clone)]
pub struct MockOutput {
    duration: Duration,
    fail: bool,
    started: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MockOutput {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fail: false,
            started: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Output whose device can never be opened
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl AudioOutput for MockOutput {
    fn start(&self, audio: &[u8]) -> Result<Box<dyn ActivePlayback>> {
        if self.fail {
            bail!("no output device available");
        }
        if audio.is_empty() {
            bail!("nothing to play");
        }

        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPlayback {
            ends_at: Instant::now() + self.duration,
            released: self.released.clone(),
        }))
    }
}

struct MockPlayback {
    ends_at: Instant,
    released: Arc<AtomicUsize>,
}

impl ActivePlayback for MockPlayback {
    fn is_finished(&self) -> bool {
        Instant::now() >= self.ends_at
    }
}

impl Drop for MockPlayback {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
