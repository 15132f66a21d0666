use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `wishtheory`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum WishError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generation client ───────────────────────────────────────────────
    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    // ── Card renderer ───────────────────────────────────────────────────
    #[error("render: {0}")]
    Render(#[from] RenderError),

    // ── Speech pipeline ─────────────────────────────────────────────────
    #[error("speech: {0}")]
    Speech(#[from] SpeechError),

    // ── History store ───────────────────────────────────────────────────
    #[error("history: {0}")]
    History(#[from] HistoryError),

    // ── Input validation ────────────────────────────────────────────────
    #[error("enter a desire to manifest")]
    EmptyDesire,

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WishError {
    /// Single human-readable line shown to the user on failure.
    ///
    /// Service-reported messages are surfaced verbatim; transport exhaustion
    /// gets the generic "try again" wording.
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(GenerationError::Service { message }) => message.clone(),
            Self::Generation(GenerationError::TransportUnavailable) => {
                "The universe is currently recalibrating. Please check your connection and try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation client errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Every ranked transport skipped; nothing was able to serve the request.
    #[error("no generation transport available")]
    TransportUnavailable,

    /// The service returned a structured error. Surfaced to the user verbatim.
    #[error("{message}")]
    Service { message: String },

    /// The fallback path needs a credential that is not configured.
    #[error("no API key found: {0}")]
    Configuration(String),

    /// The service answered but carried nothing usable.
    #[error("the service returned no usable content")]
    EmptyResponse,
}

// ─── Card renderer errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no usable font found ({0})")]
    FontUnavailable(String),

    #[error("png encode failed: {0}")]
    Encode(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Speech pipeline errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("pcm decode failed: {0}")]
    Decode(String),

    #[error("audio output unavailable: {0}")]
    Output(String),
}

// ─── History store errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, WishError>;
