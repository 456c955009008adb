//! LLM provider settings

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Credentials and endpoint for script generation. Persisted under its own
/// storage key, separate from the script list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
        }
    }
}

impl LlmSettings {
    /// Check the settings are usable: non-empty key, http(s) base URL.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key must not be empty".to_string());
        }
        match self.api_base.parse::<reqwest::Url>() {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => return Err(format!("API base must be http(s), got {}", url.scheme())),
            Err(e) => return Err(format!("API base is not a valid URL: {}", e)),
        }
        if self.model.trim().is_empty() {
            return Err("model name must not be empty".to_string());
        }
        Ok(())
    }
}
