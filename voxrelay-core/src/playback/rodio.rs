//! Speaker output using rodio. Decodes the MPEG clips returned by the
//! gateway.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;

use super::{ActivePlayback, AudioOutput};

#[derive(Debug, Default, Clone, Copy)]
pub struct RodioOutput;

impl AudioOutput for RodioOutput {
    fn start(&self, audio: &[u8]) -> Result<Box<dyn ActivePlayback>> {
        let (stream, stream_handle) =
            OutputStream::try_default().context("no output device available")?;
        let sink = Sink::try_new(&stream_handle).context("failed to create playback sink")?;
        let source = Decoder::new(Cursor::new(audio.to_vec())).context("failed to decode audio")?;
        sink.append(source);

        Ok(Box::new(RodioPlayback {
            sink,
            _stream: stream,
        }))
    }
}

// The sink must be dropped before the stream it plays on
struct RodioPlayback {
    sink: Sink,
    _stream: OutputStream,
}

impl ActivePlayback for RodioPlayback {
    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
