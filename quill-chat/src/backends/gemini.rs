//! Google Gemini backend.
//!
//! Gemini's generateContent API has no system role, so the system prompt and
//! user turn are flattened into one prompt string with `System:` / `User:`
//! labels before sending.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BackendError, CompletionBackend, Result};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Chat completion through the Gemini generateContent API.
pub struct GeminiBackend {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    fn flatten_prompt(system_prompt: &str, context: &str, question: &str) -> String {
        format!(
            "System: {system_prompt}\n\nUser: Context:\n{context}\n\nQuestion: {question}\n\n"
        )
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &str,
        question: &str,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BackendError::MissingCredentials {
                backend: "gemini",
                variable: "GOOGLE_API_KEY",
            })?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::flatten_prompt(system_prompt, context, question),
                }],
            }],
        };

        let url = format!(
            "{GEMINI_BASE_URL}/{}:generateContent?key={api_key}",
            self.model
        );
        tracing::debug!(backend = "gemini", model = %self.model, "sending completion request");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| BackendError::MalformedResponse("no candidates in response".to_string()))
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_flattening() {
        let prompt = GeminiBackend::flatten_prompt("be helpful", "some context", "why?");
        assert_eq!(
            prompt,
            "System: be helpful\n\nUser: Context:\nsome context\n\nQuestion: why?\n\n"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let backend = GeminiBackend::new(None, "gemini-2.0-flash".to_string());
        let err = backend.complete("system", "context", "question").await;
        assert!(matches!(
            err,
            Err(BackendError::MissingCredentials {
                backend: "gemini",
                variable: "GOOGLE_API_KEY",
            })
        ));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "the answer"}]}}]
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "the answer");
    }
}
