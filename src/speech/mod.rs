//! Speech pipeline: PCM decode plus single-active playback.
//!
//! Playback state machine: `Idle → Requesting → Playing → Idle`, with a
//! transition to `Idle` from any state on an explicit stop. The player is an
//! owned resource — no process-global audio state — and enforces
//! stop-before-start: acquiring a new playback always first tears down the
//! previous one.

pub mod output;
pub mod pcm;

pub use output::{AudioOutput, RodioOutput};
pub use pcm::AudioClip;

use crate::error::SpeechError;
use output::PlaybackHandle;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Requesting,
    Playing,
}

struct Shared {
    /// Bumped on every stop; the monitor thread only reports completion for
    /// the generation it was spawned for, so a late natural-completion never
    /// fires after an explicit stop superseded it.
    generation: u64,
    state: PlaybackState,
    current: Option<String>,
}

pub struct SpeechPlayer {
    out: Box<dyn AudioOutput>,
    shared: Arc<Mutex<Shared>>,
    active: Option<Box<dyn PlaybackHandle>>,
}

impl SpeechPlayer {
    pub fn new(out: Box<dyn AudioOutput>) -> Self {
        Self {
            out,
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                state: PlaybackState::Idle,
                current: None,
            })),
            active: None,
        }
    }

    /// Player backed by the default audio device.
    pub fn system() -> Self {
        Self::new(Box::new(RodioOutput))
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.lock().expect("speech state poisoned").state
    }

    /// Identifier of the currently audible affirmation, if any.
    pub fn current(&self) -> Option<String> {
        self.shared
            .lock()
            .expect("speech state poisoned")
            .current
            .clone()
    }

    /// Mark the start of an audio fetch. Stops anything already playing.
    pub fn begin_request(&mut self) {
        self.stop();
        self.shared.lock().expect("speech state poisoned").state = PlaybackState::Requesting;
    }

    /// Start playing `clip`, labelled `id`, after tearing down any prior
    /// playback. `on_complete` fires once if the source drains naturally; an
    /// early [`stop`](Self::stop) suppresses it.
    pub fn play(
        &mut self,
        id: &str,
        clip: AudioClip,
        on_complete: Box<dyn FnOnce() + Send>,
    ) -> Result<(), SpeechError> {
        self.stop();

        let handle = self
            .out
            .start(clip.samples, clip.channels, clip.sample_rate)?;
        let waiter = handle.waiter();

        let generation = {
            let mut shared = self.shared.lock().expect("speech state poisoned");
            shared.state = PlaybackState::Playing;
            shared.current = Some(id.to_string());
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        std::thread::spawn(move || {
            waiter.wait_until_end();
            let mut guard = shared.lock().expect("speech state poisoned");
            if guard.generation == generation {
                guard.state = PlaybackState::Idle;
                guard.current = None;
                drop(guard);
                on_complete();
            }
        });

        self.active = Some(handle);
        Ok(())
    }

    /// Tear down any active playback and return to `Idle`. Reachable from
    /// every state; releases the output device synchronously.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.stop();
        }
        let mut shared = self.shared.lock().expect("speech state poisoned");
        shared.generation += 1;
        shared.state = PlaybackState::Idle;
        shared.current = None;
    }
}

impl Drop for SpeechPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
