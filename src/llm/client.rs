//! Chat-completions client for script generation

use super::prompts::build_prompt;
use crate::models::{LlmSettings, PageContext};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid LLM settings: {0}")]
    InvalidSettings(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

pub struct LlmClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        settings.validate().map_err(LlmError::InvalidSettings)?;
        let http = reqwest::Client::builder()
            .user_agent("all-my-web")
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { http, settings })
    }

    /// Generate a script body from a natural-language requirement, plus the
    /// page the user had open when available. Returns the script text with
    /// any surrounding code fence stripped.
    pub async fn generate_script(
        &self,
        requirement: &str,
        page: Option<&PageContext>,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(requirement, page),
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "failed to generate script".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        Ok(strip_code_fence(content.trim()).to_string())
    }
}

/// Remove a surrounding ``` / ```javascript fence, if present. Content
/// outside a fence is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let after_open = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    match after_open.rfind("```") {
        Some(idx) => after_open[..idx].trim_end_matches('\n'),
        None => after_open.trim_end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_javascript_fence() {
        let fenced = "```javascript\nconsole.log('hi');\n```";
        assert_eq!(strip_code_fence(fenced), "console.log('hi');");
    }

    #[test]
    fn test_strip_bare_fence() {
        let fenced = "```\nconst x = 1;\n```";
        assert_eq!(strip_code_fence(fenced), "const x = 1;");
    }

    #[test]
    fn test_unfenced_passes_through() {
        assert_eq!(strip_code_fence("console.log('hi');"), "console.log('hi');");
    }

    #[test]
    fn test_unterminated_fence_drops_opener_only() {
        let fenced = "```javascript\nconsole.log('hi');";
        assert_eq!(strip_code_fence(fenced), "console.log('hi');");
    }

    #[test]
    fn test_client_rejects_invalid_settings() {
        let result = LlmClient::new(LlmSettings::default());
        assert!(matches!(result, Err(LlmError::InvalidSettings(_))));
    }
}
