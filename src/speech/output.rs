//! Audio output seam.
//!
//! The player owns a boxed [`AudioOutput`]; production uses rodio, tests use
//! a scripted fake. A started playback is represented by a handle (held by
//! the player, owns the device resources) and a waiter (shared with the
//! completion-monitor thread).

use crate::error::SpeechError;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::sync::Arc;

/// Blocking view of one playback, safe to hand to the monitor thread.
pub trait PlaybackWaiter: Send + Sync {
    /// Block until the source drains or the playback is stopped.
    fn wait_until_end(&self);
}

/// One active playback. Dropping or stopping the handle releases the output
/// device.
pub trait PlaybackHandle {
    fn waiter(&self) -> Arc<dyn PlaybackWaiter>;
    fn stop(&self);
}

pub trait AudioOutput {
    fn start(
        &self,
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError>;
}

// ─── rodio implementation ───────────────────────────────────────────────────

/// Default-device output via rodio.
pub struct RodioOutput;

struct RodioHandle {
    // Keeps the cpal stream alive for the lifetime of the playback.
    _stream: OutputStream,
    sink: Arc<Sink>,
}

impl PlaybackWaiter for Sink {
    fn wait_until_end(&self) {
        self.sleep_until_end();
    }
}

impl PlaybackHandle for RodioHandle {
    fn waiter(&self) -> Arc<dyn PlaybackWaiter> {
        Arc::clone(&self.sink) as Arc<dyn PlaybackWaiter>
    }

    fn stop(&self) {
        self.sink.stop();
    }
}

impl AudioOutput for RodioOutput {
    fn start(
        &self,
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| SpeechError::Output(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| SpeechError::Output(e.to_string()))?;
        sink.append(SamplesBuffer::new(channels, sample_rate, samples));
        Ok(Box::new(RodioHandle {
            _stream: stream,
            sink: Arc::new(sink),
        }))
    }
}
