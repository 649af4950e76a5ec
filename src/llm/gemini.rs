use crate::llm::client::{LLMClient, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PROMPT_PREAMBLE: &str = "Translate the following natural language command into a safe shell command. \
Only output the shell command and nothing else.";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Google Gemini `generateContent` client
///
/// One request per instruction, bounded by a timeout, never retried.
pub struct GeminiClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, LLMError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
        })
    }

    /// Point the client at another endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Wrap the instruction with the directive to answer with a bare command
    pub fn build_prompt(instruction: &str) -> String {
        format!("{}\n\n{}", PROMPT_PREAMBLE, instruction)
    }

    async fn call_api(&self, prompt: String) -> Result<String, LLMError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        // The key travels in a header so it never shows up in URLs or in
        // reqwest error messages.
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_response(&body)
    }

    /// Take the text of the first part of the first candidate
    fn parse_response(body: &str) -> Result<String, LLMError> {
        let api_response: GenerateContentResponse = serde_json::from_str(body)?;

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No candidates in response".to_string()))?;

        let part = candidate
            .content
            .parts
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No parts in content".to_string()))?;

        if part.text.trim().is_empty() {
            return Err(LLMError::InvalidResponse("Empty text in response".to_string()));
        }

        Ok(part.text)
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, instruction: &str) -> Result<String, LLMError> {
        tracing::debug!(model = %self.model, "requesting command from Gemini");
        self.call_api(Self::build_prompt(instruction)).await
    }
}
