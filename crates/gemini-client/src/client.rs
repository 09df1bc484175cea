use std::time::Duration;

use tracing::{debug, error};

use crate::error::GeminiError;
use crate::types::{ChatTurn, Content, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the generative-language `generateContent` endpoint.
///
/// Requests are single-shot: the caller decides whether a failure is worth
/// retrying, the client never does it silently.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint, used by tests to target a
    /// local mock server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single prompt and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.send(vec![Content::text("user", prompt)]).await
    }

    /// Send a chat exchange, forwarding the turns in the order given.
    pub async fn chat(&self, turns: &[ChatTurn]) -> Result<String, GeminiError> {
        let contents: Vec<Content> = turns
            .iter()
            .map(|turn| Content::text(turn.role.wire_name(), turn.content.clone()))
            .collect();
        self.send(contents).await
    }

    async fn send(&self, contents: Vec<Content>) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, turns = contents.len(), "calling generative-language API");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "generative-language API error: {message}");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = resp.json().await?;
        body.first_text().ok_or(GeminiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TurnRole;

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generate_posts_prompt_and_returns_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "say hi" }] }]
            })))
            .with_status(200)
            .with_body(candidate_body("hi there"))
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("test-key", server.url());
        let text = client.generate("say hi").await.unwrap();
        assert_eq!(text, "hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_maps_assistant_turns_to_model_role() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "plan my week" }] },
                    { "role": "model", "parts": [{ "text": "sure, what goals?" }] },
                    { "role": "user", "parts": [{ "text": "ship the blog" }] }
                ]
            })))
            .with_status(200)
            .with_body(candidate_body("here is a plan"))
            .create_async()
            .await;

        let turns = vec![
            ChatTurn {
                role: TurnRole::User,
                content: "plan my week".to_string(),
            },
            ChatTurn {
                role: TurnRole::Assistant,
                content: "sure, what goals?".to_string(),
            },
            ChatTurn {
                role: TurnRole::User,
                content: "ship the blog".to_string(),
            },
        ];
        let client = GeminiClient::with_base_url("test-key", server.url());
        let text = client.chat(&turns).await.unwrap();
        assert_eq!(text, "here is a plan");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_errors_surface_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("test-key", server.url());
        match client.generate("anything").await {
            Err(GeminiError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert!(message.contains("quota"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_candidates_map_to_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("test-key", server.url());
        assert!(matches!(
            client.generate("anything").await,
            Err(GeminiError::EmptyResponse)
        ));
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let client = GeminiClient::with_base_url("k", "http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }
}
