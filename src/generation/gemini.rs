//! Direct Gemini transport — the fallback path when no proxy endpoint is
//! deployed or reachable. Needs a locally configured API key.

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use crate::config::Config;
use crate::error::GenerationError;
use crate::manifestation::ManifestationContent;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub(super) struct DirectGemini {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    text_model: String,
    tts_model: String,
    voice: String,
}

impl DirectGemini {
    pub(super) fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            text_model: config.text_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.api_key.as_deref().ok_or_else(|| {
            GenerationError::Configuration(
                "set GEMINI_API_KEY or add api_key to ~/.wishtheory/config.toml \
                 (get one at https://aistudio.google.com/app/apikey)"
                    .into(),
            )
        })
    }

    fn url(&self, model: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        Ok(format!(
            "{}/v1beta/models/{model}:generateContent?key={api_key}",
            self.api_base
        ))
    }

    async fn call(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.url(model)?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Service {
                message: format!("Gemini request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GenerateContentResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or_else(
                    || format!("Gemini API error ({status}): {body}"),
                    |e| e.message,
                );
            return Err(GenerationError::Service { message });
        }

        let result: GenerateContentResponse =
            response.json().await.map_err(|e| GenerationError::Service {
                message: format!("Gemini response did not parse: {e}"),
            })?;

        if let Some(err) = result.error {
            return Err(GenerationError::Service { message: err.message });
        }

        Ok(result)
    }

    /// Structured manifestation content via a response-schema constrained call.
    pub(super) async fn generate_content(
        &self,
        desire: &str,
    ) -> Result<ManifestationContent, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part::text(manifest_prompt(desire))],
            }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(manifest_schema()),
                ..GenerationConfig::default()
            },
        };

        let result = self.call(&self.text_model, &request).await?;
        let text = joined_text(&result);
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        serde_json::from_str(&text).map_err(|e| GenerationError::Service {
            message: format!("unexpected content from service: {e}"),
        })
    }

    /// Spoken audio for one affirmation; returns the base64 PCM payload.
    pub(super) async fn generate_audio(&self, text: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(format!("Repeat after me. {text}"))],
            }],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["AUDIO".into()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                ..GenerationConfig::default()
            },
        };

        let result = self.call(&self.tts_model, &request).await?;
        first_inline_data(&result).ok_or(GenerationError::EmptyResponse)
    }
}

fn manifest_prompt(desire: &str) -> String {
    format!(
        "The user desires to manifest: \"{desire}\". \
         Act as a spiritual manifestation coach. \
         Create a personalized manifestation plan containing: \
         1. 5 powerful, unique, and creative present-tense 'I am' affirmations. \
         2. A 'scripting' journal entry (approx 80-100 words) written in the \
         present tense as if the desire has already manifested. \
         3. 3 vivid visualization scenes. \
         4. 3 practical action steps."
    )
}

/// Response schema the service is constrained to: exactly the four content
/// fields, all required.
fn manifest_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "affirmations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "scripting": { "type": "STRING" },
            "visualizations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "actions": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["affirmations", "scripting", "visualizations", "actions"]
    })
}

fn joined_text(result: &GenerateContentResponse) -> String {
    let mut out = String::new();
    if let Some(candidate) = result.candidates.as_ref().and_then(|c| c.first()) {
        for part in &candidate.content.parts {
            if let Some(text) = &part.text {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
    }
    out
}

fn first_inline_data(result: &GenerateContentResponse) -> Option<String> {
    result
        .candidates
        .as_ref()?
        .first()?
        .content
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .map(|inline| inline.data.clone())
        .filter(|data| !data.is_empty())
}
