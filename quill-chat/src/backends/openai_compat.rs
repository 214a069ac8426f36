//! OpenAI-compatible chat completion backends.
//!
//! One implementation covers three services that share the wire format:
//! OpenAI itself, GitHub Models (Azure-hosted, token auth), and a local
//! LM Studio server (no auth). They differ only in base URL and the shape
//! of the Authorization header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BackendError, CompletionBackend, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GITHUB_MODELS_BASE_URL: &str = "https://models.inference.ai.azure.com";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// How the service expects its credential, if any.
#[derive(Debug, Clone)]
enum Auth {
    /// `Authorization: Bearer <key>`, key required
    Bearer(Option<String>),
    /// `Authorization: token <token>`, token required
    Token(Option<String>),
    /// Local server, no credential
    None,
}

/// A backend for any service speaking the OpenAI chat completions protocol.
pub struct OpenAiCompatBackend {
    name: &'static str,
    credential_variable: &'static str,
    base_url: String,
    auth: Auth,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    /// The hosted OpenAI API.
    pub fn openai(api_key: Option<String>, model: String) -> Self {
        Self {
            name: "openai",
            credential_variable: "OPENAI_API_KEY",
            base_url: OPENAI_BASE_URL.to_string(),
            auth: Auth::Bearer(api_key),
            model,
            client: reqwest::Client::new(),
        }
    }

    /// GitHub Models, which serves OpenAI-compatible completions with
    /// `token` style authorization.
    pub fn github(token: Option<String>, model: String) -> Self {
        Self {
            name: "github",
            credential_variable: "GITHUB_TOKEN",
            base_url: GITHUB_MODELS_BASE_URL.to_string(),
            auth: Auth::Token(token),
            model,
            client: reqwest::Client::new(),
        }
    }

    /// A local LM Studio server. `endpoint` includes the `/v1` prefix.
    pub fn lm_studio(endpoint: String, model: String) -> Self {
        Self {
            name: "lm-studio",
            credential_variable: "LM_STUDIO_ENDPOINT",
            base_url: endpoint,
            auth: Auth::None,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// The Authorization header value, or an error when the credential the
    /// service requires is not configured.
    fn authorization(&self) -> Result<Option<String>> {
        match &self.auth {
            Auth::Bearer(Some(key)) => Ok(Some(format!("Bearer {key}"))),
            Auth::Token(Some(token)) => Ok(Some(format!("token {token}"))),
            Auth::None => Ok(None),
            Auth::Bearer(None) | Auth::Token(None) => Err(BackendError::MissingCredentials {
                backend: self.name,
                variable: self.credential_variable,
            }),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &str,
        question: &str,
    ) -> Result<String> {
        let authorization = self.authorization()?;

        let user_content = format!("Context:\n{context}\n\nQuestion: {question}");
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: &user_content,
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(backend = self.name, model = %self.model, "sending completion request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::MalformedResponse("no choices in completion".to_string()))
    }

    fn backend_name(&self) -> &str {
        self.name
    }
}
