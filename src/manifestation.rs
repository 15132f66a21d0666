//! Core domain types: the generated content bundle, the assembled
//! manifestation record, and the app-level state machine.

use serde::{Deserialize, Serialize};

/// The four-part content set returned by the generation service.
///
/// Produced atomically by the generation client and never mutated. Target
/// cardinalities are five affirmations, three visualizations and three action
/// steps, but whatever non-empty sequences the service returns are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestationContent {
    pub affirmations: Vec<String>,
    pub scripting: String,
    pub visualizations: Vec<String>,
    pub actions: Vec<String>,
}

impl ManifestationContent {
    /// True when the service answered but carried nothing worth showing.
    pub fn is_empty(&self) -> bool {
        self.affirmations.is_empty()
            && self.scripting.trim().is_empty()
            && self.visualizations.is_empty()
            && self.actions.is_empty()
    }
}

/// One completed generation cycle: content plus derived fields.
///
/// Created once per successful cycle; the card image is attached when the
/// renderer finishes and the record is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifestation {
    pub id: String,
    /// Unix milliseconds at creation.
    pub timestamp: i64,
    pub original_desire: String,
    /// PNG data URI of the rendered card.
    pub vision_board_url: Option<String>,
    #[serde(flatten)]
    pub content: ManifestationContent,
}

/// One line of the persisted history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub desire: String,
    /// Human display date, e.g. "8/29/2026".
    pub date: String,
}

/// Controller state machine.
///
/// `Idle → GeneratingText → GeneratingImage → Complete`, with `Error`
/// reachable from either generating state and a manual reset from `Error` or
/// `Complete` back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    Idle,
    GeneratingText,
    GeneratingImage,
    Complete,
    Error,
}
