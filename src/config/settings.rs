//! Configuration settings for Postbot.

use crate::gemini::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub vertex: VertexSettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
    pub generation: GenerationSettings,
    pub prompts: PromptSettings,
}

/// Vertex AI model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexSettings {
    /// Cloud project identifier (env: PROJECT_ID).
    pub project_id: String,
    /// Region identifier (env: LOCATION).
    pub location: String,
    /// Model version used by every flow.
    pub model: String,
    /// Override for the API base URL (defaults to the regional endpoint).
    pub base_url: Option<String>,
    /// OAuth access token (env: VERTEX_ACCESS_TOKEN). Never written to disk.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VertexSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us-central1".to_string(),
            model: "gemini-1.5-pro-001".to_string(),
            base_url: None,
            access_token: None,
            timeout_secs: 300,
        }
    }
}

/// Video search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search endpoint URL.
    pub endpoint: String,
    /// Value of the `x-rapidapi-host` header.
    pub host: String,
    /// RapidAPI key (env: KEY). Never written to disk.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://tiktok-api15.p.rapidapi.com/index/Tiktok/searchVideoListByKeywords"
                .to_string(),
            host: "tiktok-api15.p.rapidapi.com".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Wall-clock ceiling per request in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_secs: 300,
        }
    }
}

/// Sampling knobs for one flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl SamplingSettings {
    /// Generation config for a request, or `None` to use model defaults.
    pub fn to_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none() && self.top_p.is_none() && self.max_output_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        })
    }
}

/// Per-flow sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub videos: SamplingSettings,
    pub reservation: SamplingSettings,
    pub food_types: SamplingSettings,
    pub labels: SamplingSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            videos: SamplingSettings {
                temperature: Some(0.0),
                ..Default::default()
            },
            reservation: SamplingSettings {
                temperature: Some(0.3),
                top_p: Some(0.0),
                max_output_tokens: Some(8192),
            },
            food_types: SamplingSettings::default(),
            labels: SamplingSettings::default(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let mut settings = Self::read_file(&Self::resolve_path(path))?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Settings stored in `path` alone, without environment overrides.
    pub fn read_file(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// `path` if given, the default configuration file otherwise.
    pub fn resolve_path(path: Option<&PathBuf>) -> PathBuf {
        path.cloned().unwrap_or_else(Self::default_config_path)
    }

    /// Apply PROJECT_ID, LOCATION, KEY and VERTEX_ACCESS_TOKEN overrides.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(project) = lookup("PROJECT_ID") {
            self.vertex.project_id = project;
        }
        if let Some(location) = lookup("LOCATION") {
            self.vertex.location = location;
        }
        if let Some(token) = lookup("VERTEX_ACCESS_TOKEN") {
            self.vertex.access_token = Some(token);
        }
        if let Some(key) = lookup("KEY") {
            self.search.api_key = Some(key);
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PostbotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("postbot")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded custom prompts directory, if configured.
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts.custom_dir.as_deref().map(Self::expand_path)
    }
}
