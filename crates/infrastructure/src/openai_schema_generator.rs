use async_trait::async_trait;
use formwright_application::{GeneratedSchemaEdit, SchemaGenerationPrompt, SchemaGenerator};
use formwright_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sampling temperature for schema edits; low to keep replies structured.
const GENERATION_TEMPERATURE: f32 = 0.2;

/// Schema generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAiSchemaGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    enabled: bool,
}

impl OpenAiSchemaGenerator {
    /// Creates a new generator.
    ///
    /// A blank `api_key` leaves the generator unavailable.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            enabled,
        }
    }

    /// Returns the chat completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, prompt: &'a SchemaGenerationPrompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: self.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt.system_prompt.as_str(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user_prompt.as_str(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: GENERATION_TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_reply(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::Generation("AI response contained no choices".to_owned()))
}

#[async_trait]
impl SchemaGenerator for OpenAiSchemaGenerator {
    fn is_available(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }

    async fn generate(&self, prompt: SchemaGenerationPrompt) -> AppResult<GeneratedSchemaEdit> {
        let Some(api_key) = self.api_key.as_deref().filter(|_| self.enabled) else {
            return Err(AppError::Unavailable(
                "AI assistance is not configured; contact your administrator".to_owned(),
            ));
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(&prompt))
            .send()
            .await
            .map_err(|error| {
                warn!(error = %error, "AI provider request failed");
                AppError::Generation(format!("AI provider request failed: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            warn!(status = %status, "AI provider returned an error status");
            return Err(AppError::Generation(format!(
                "AI provider returned status {status}: {body}"
            )));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| {
                AppError::Generation(format!("AI provider response was malformed: {error}"))
            })?;

        GeneratedSchemaEdit::from_model_reply(&first_reply(completion)?)
    }
}
