//! Orchestration of one generation cycle and of affirmation playback.
//!
//! State machine: `Idle → GeneratingText → GeneratingImage → Complete`, with
//! `Error` reachable from either generating state and a manual reset back to
//! `Idle`. One cycle in flight per controller — the exclusive borrow during
//! `manifest` is the lock.

use crate::card::{CardRenderer, RenderedCard};
use crate::error::{Result, WishError};
use crate::generation::GenerationClient;
use crate::history::HistoryStore;
use crate::manifestation::{AppState, HistoryEntry, Manifestation};
use crate::speech::{AudioClip, SpeechPlayer};
use chrono::{Local, Utc};
use rand::Rng;
use uuid::Uuid;

/// Shown on the card when the service returns an empty affirmation list.
const FALLBACK_AFFIRMATION: &str = "I manifest my reality.";

pub struct ManifestController<R: Rng> {
    client: GenerationClient,
    renderer: CardRenderer,
    history: HistoryStore,
    rng: R,
    state: AppState,
    error: Option<String>,
    result: Option<Manifestation>,
    card: Option<RenderedCard>,
    primary_affirmation: Option<String>,
}

impl<R: Rng> ManifestController<R> {
    pub fn new(
        client: GenerationClient,
        renderer: CardRenderer,
        history: HistoryStore,
        rng: R,
    ) -> Self {
        Self {
            client,
            renderer,
            history,
            rng,
            state: AppState::Idle,
            error: None,
            result: None,
            card: None,
            primary_affirmation: None,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Human-readable message for the current `Error` state, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&Manifestation> {
        self.result.as_ref()
    }

    /// The rendered card of the last completed cycle.
    pub fn last_card(&self) -> Option<&RenderedCard> {
        self.card.as_ref()
    }

    /// The affirmation chosen for the card in the last completed cycle.
    pub fn primary_affirmation(&self) -> Option<&str> {
        self.primary_affirmation.as_deref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Manual transition back to `Idle`, discarding any result or error.
    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.error = None;
        self.result = None;
        self.card = None;
        self.primary_affirmation = None;
    }

    /// Run one full generation cycle for `desire`.
    ///
    /// An empty desire is rejected before any network call. There is no
    /// partial completion: a card-rendering failure after successful text
    /// generation discards the text and lands in `Error`.
    pub async fn manifest(&mut self, desire: &str) -> Result<&Manifestation> {
        let desire = desire.trim();
        if desire.is_empty() {
            return Err(WishError::EmptyDesire);
        }

        self.state = AppState::GeneratingText;
        self.error = None;
        self.result = None;
        self.card = None;
        self.primary_affirmation = None;

        let content = match self.client.generate_content(desire).await {
            Ok(content) => content,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.state = AppState::GeneratingImage;
        let affirmation = choose_affirmation(&mut self.rng, &content.affirmations);
        let today = Local::now().date_naive();
        let card = match self.renderer.render(desire, &affirmation, Some(today)) {
            Ok(card) => card,
            Err(e) => return Err(self.fail(e.into())),
        };

        let manifestation = Manifestation {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            original_desire: desire.to_string(),
            vision_board_url: Some(card.data_uri()),
            content,
        };

        self.state = AppState::Complete;

        let entry = HistoryEntry {
            id: manifestation.id.clone(),
            desire: manifestation.original_desire.clone(),
            date: Local::now().format("%-m/%-d/%Y").to_string(),
        };
        if let Err(e) = self.history.record(entry) {
            // A failed persist must not discard a completed manifestation.
            tracing::warn!(error = %e, "could not persist history");
        }

        self.card = Some(card);
        self.primary_affirmation = Some(affirmation);
        self.result = Some(manifestation);
        Ok(self.result.as_ref().expect("result just stored"))
    }

    /// Toggle spoken playback of one affirmation.
    ///
    /// Asking for the affirmation that is already audible stops it and
    /// returns `false`. Otherwise the audio is fetched, decoded, and played
    /// (tearing down any other playback first); returns `true`.
    pub async fn speak_affirmation(
        &self,
        player: &mut SpeechPlayer,
        index: usize,
        text: &str,
        on_complete: Box<dyn FnOnce() + Send>,
    ) -> Result<bool> {
        let id = format!("affirmation-{index}");
        if player.current().as_deref() == Some(id.as_str()) {
            player.stop();
            return Ok(false);
        }

        player.begin_request();
        let payload = match self.client.generate_audio(text).await {
            Ok(payload) => payload,
            Err(e) => {
                player.stop();
                return Err(e.into());
            }
        };
        let clip = match AudioClip::from_pcm16_base64(&payload) {
            Ok(clip) => clip,
            Err(e) => {
                player.stop();
                return Err(e.into());
            }
        };
        player.play(&id, clip, on_complete)?;
        Ok(true)
    }

    fn fail(&mut self, e: WishError) -> WishError {
        self.state = AppState::Error;
        self.error = Some(e.user_message());
        e
    }
}

/// Uniform pick over the returned affirmations; fixed fallback when the
/// service sent none.
fn choose_affirmation<R: Rng>(rng: &mut R, affirmations: &[String]) -> String {
    if affirmations.is_empty() {
        return FALLBACK_AFFIRMATION.to_string();
    }
    affirmations[rng.random_range(0..affirmations.len())].clone()
}
