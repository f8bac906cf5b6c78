use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{AppError, BackendError};
use crate::prompt::Prompt;

/// Sends a prompt to a generative model and hands back its completion untouched.
pub trait Summarizer {
    fn summarize(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// The first choice's content, verbatim.
    pub fn into_content(self) -> Result<String, BackendError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| BackendError::MalformedResponse("No content in response".to_string()))
    }
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint (Groq by default).
pub struct ChatCompletionsClient {
    client: Client,
    config: LlmConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_completion_request(
        &self,
        api_key: &str,
        content: &str,
    ) -> Result<CompletionResponse, BackendError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                BackendError::RateLimited { message }
            } else {
                BackendError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        resp.json::<CompletionResponse>().await.map_err(|e| {
            if e.is_decode() {
                BackendError::MalformedResponse(e.to_string())
            } else {
                self.map_request_error(e)
            }
        })
    }

    fn map_request_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.config.timeout)
        } else {
            BackendError::Request(err)
        }
    }
}

impl Summarizer for ChatCompletionsClient {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, prompt_chars = prompt.as_str().len()))]
    async fn summarize(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(BackendError::MissingCredential)?;

        let response = self
            .send_completion_request(api_key, prompt.as_str())
            .await?;

        response.into_content()
    }
}
