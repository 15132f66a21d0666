//! Shared HTTP client for both transports.

use reqwest::Client;
use std::time::Duration;

/// Text generation is the slow call here; TTS payloads are small but the
/// service can take a while to synthesize. One generous overall timeout
/// covers both, with a short connect timeout so an unreachable proxy skips
/// to the direct path quickly.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}
