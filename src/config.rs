use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory (history, saved cards) - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Gemini API key for the direct fallback path. Env vars override.
    pub api_key: Option<String>,
    /// Base URL of a deployed proxy, e.g. "https://wishtheory.example.com".
    /// The client POSTs `{endpoint}/api/manifest` and `{endpoint}/api/speak`
    /// before falling back to the direct API.
    pub endpoint: Option<String>,
    /// Override for the Gemini API base URL (regional endpoints, test
    /// doubles). Defaults to the public endpoint.
    #[serde(default)]
    pub api_base: Option<String>,

    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub fonts: FontConfig,
}

/// Where to look for the card typefaces. Explicit paths win; otherwise the
/// renderer scans well-known system font directories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default)]
    pub serif: Option<PathBuf>,
    #[serde(default)]
    pub sans: Option<PathBuf>,
}

fn default_text_model() -> String {
    "gemini-3-flash-preview".into()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".into()
}

fn default_voice() -> String {
    "Kore".into()
}

fn default_history_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let wishtheory_dir = home.join(".wishtheory");

        Self {
            workspace_dir: wishtheory_dir.join("workspace"),
            config_path: wishtheory_dir.join("config.toml"),
            api_key: None,
            endpoint: None,
            api_base: None,
            text_model: default_text_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            history_limit: default_history_limit(),
            fonts: FontConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let wishtheory_dir = home.join(".wishtheory");
        let config_path = wishtheory_dir.join("config.toml");

        if !wishtheory_dir.exists() {
            fs::create_dir_all(&wishtheory_dir)
                .context("Failed to create .wishtheory directory")?;
            fs::create_dir_all(wishtheory_dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path.clone_from(&config_path);
            config.workspace_dir = wishtheory_dir.join("workspace");
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                workspace_dir: wishtheory_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API key: GEMINI_API_KEY or GOOGLE_API_KEY (same precedence the
        // Gemini SDKs use)
        if let Ok(key) =
            std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        // Proxy endpoint: WISHTHEORY_ENDPOINT
        if let Ok(endpoint) = std::env::var("WISHTHEORY_ENDPOINT") {
            if !endpoint.is_empty() {
                self.endpoint = Some(endpoint);
            }
        }

        // Workspace directory: WISHTHEORY_WORKSPACE
        if let Ok(workspace) = std::env::var("WISHTHEORY_WORKSPACE") {
            if !workspace.is_empty() {
                self.workspace_dir = PathBuf::from(workspace);
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "endpoint must be an http(s) URL, got {endpoint}"
                )));
            }
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Validation(
                "history_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Proxy base with any trailing slash removed, if one is configured.
    pub fn endpoint_base(&self) -> Option<String> {
        self.endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/').to_string())
    }

    pub fn history_path(&self) -> PathBuf {
        self.workspace_dir.join("history.json")
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
