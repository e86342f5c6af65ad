//! Client for OpenAI-compatible chat completion APIs.

use crate::config::GenerationConfig;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is not configured: OPENAI_API_KEY is unset")]
    NotConfigured,

    #[error("text generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text generation API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("text generation API returned no content")]
    EmptyCompletion,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw text the model produced for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

pub struct OpenAiClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        Ok(Self {
            http: HttpClient::builder().build()?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Body of a rejected completion request, or a note saying why it could not be read.
fn error_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read completion error body");
            format!("<unreadable response body: {err}>")
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            tracing::warn!(%status, model = %self.model, "completion request rejected");
            return Err(GenerationError::Api { status, body });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> OpenAiClient {
        OpenAiClient::new(&GenerationConfig {
            api_key: api_key.map(String::from),
            model: "gpt-4o-mini".into(),
            base_url: "http://127.0.0.1:9/v1/".into(),
        })
        .unwrap()
    }

    #[test]
    fn request_carries_bounded_sampling_settings() {
        let client = client(Some("sk-test"));
        let body = serde_json::to_value(client.request("Write about Rust")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "Write about Rust" }],
                "max_tokens": 1000,
                "temperature": 0.7,
            })
        );
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        assert_eq!(client(None).base_url, "http://127.0.0.1:9/v1");
    }

    #[actix_web::test]
    async fn missing_key_fails_without_calling_out() {
        let err = client(None).complete("anything").await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }

    #[test]
    fn unreadable_error_body_is_reported() {
        assert_eq!(error_body::<String>(Ok("quota exceeded".into())), "quota exceeded");
        assert_eq!(
            error_body(Err("connection reset")),
            "<unreadable response body: connection reset>"
        );
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("{}"));
    }
}
