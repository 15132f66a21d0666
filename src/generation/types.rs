use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Proxy endpoint shapes ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct ManifestRequest<'a> {
    pub(super) desire: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeakRequest<'a> {
    pub(super) text: &'a str,
}

/// `{ "data": <base64 PCM> }`
#[derive(Debug, Deserialize)]
pub(super) struct SpeakResponse {
    #[serde(default)]
    pub(super) data: Option<String>,
}

/// Error body the proxy returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ProxyError {
    #[serde(default)]
    pub(super) error: Option<String>,
}

// ── Gemini generateContent shapes ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct GenerateContentRequest {
    pub(super) contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub(super) generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) role: Option<String>,
    pub(super) parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub(super) inline_data: Option<InlineData>,
}

impl Part {
    pub(super) fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct InlineData {
    #[serde(rename = "mimeType", default)]
    pub(super) mime_type: Option<String>,
    pub(super) data: String,
}

#[derive(Debug, Default, Serialize)]
pub(super) struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub(super) response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub(super) response_schema: Option<Value>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    pub(super) response_modalities: Option<Vec<String>>,
    #[serde(rename = "speechConfig", skip_serializing_if = "Option::is_none")]
    pub(super) speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeechConfig {
    #[serde(rename = "voiceConfig")]
    pub(super) voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct VoiceConfig {
    #[serde(rename = "prebuiltVoiceConfig")]
    pub(super) prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct PrebuiltVoiceConfig {
    #[serde(rename = "voiceName")]
    pub(super) voice_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponse {
    pub(super) candidates: Option<Vec<Candidate>>,
    pub(super) error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Candidate {
    pub(super) content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContent {
    #[serde(default)]
    pub(super) parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiError {
    pub(super) message: String,
}
