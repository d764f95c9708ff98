//! OpenRouter API client
//!
//! Issues the two outbound calls of the CLI:
//! - `POST {base_url}/chat/completions` (streamed or buffered)
//! - `GET {base_url}/models`
//!
//! Every call is single-attempt. A non-success status becomes
//! [`CliError::Api`] carrying the status and response body.

use crate::cli::config::{ApiCredentials, Config};
use crate::errors::{CliError, Result};
use crate::types::{ChatMessage, ChatRequest, ModelListing};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;

/// OpenRouter HTTP client
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    chat_url: String,
    models_url: String,
}

impl OpenRouterClient {
    /// Create client from configuration and resolved credentials
    pub fn new(config: &Config, credentials: &ApiCredentials) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .default_headers(Self::headers(config, credentials)?)
            .build()
            .map_err(CliError::Http)?;

        Ok(Self {
            client,
            chat_url: config.endpoint("chat/completions"),
            models_url: config.endpoint("models"),
        })
    }

    /// Fixed header set sent with every request
    fn headers(config: &Config, credentials: &ApiCredentials) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&credentials.authorization()).map_err(|_| {
            CliError::Config("API key contains characters not allowed in a header".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let extra = [
            ("http-referer", &config.api.referer),
            ("x-title", &config.api.title),
        ];
        for (name, value) in extra {
            let value = HeaderValue::from_str(value)
                .map_err(|_| CliError::Config(format!("Invalid value for header {}", name)))?;
            headers.insert(HeaderName::from_static(name), value);
        }

        Ok(headers)
    }

    /// Send a chat completion request and return the checked response
    pub async fn send_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<Response> {
        let request = ChatRequest {
            model,
            messages,
            stream,
        };

        tracing::debug!(url = %self.chat_url, model, stream, "sending chat request");
        let response = self.client.post(&self.chat_url).json(&request).send().await?;

        Self::check_status(response).await
    }

    /// Chat completion with the body exposed as a single-pass byte stream
    pub async fn chat_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<impl Stream<Item = Result<Bytes>>> {
        let response = self.send_chat(model, messages, true).await?;

        Ok(response.bytes_stream().map(|chunk| chunk.map_err(CliError::Http)))
    }

    /// Chat completion with the whole body buffered and parsed
    pub async fn chat_complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionMessage> {
        let response = self.send_chat(model, messages, false).await?;
        let body: CompletionResponse = serde_json::from_slice(&response.bytes().await?)?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| CliError::UnexpectedResponse("response has no choices".to_string()))
    }

    /// List available models, fresh from the API every call
    pub async fn list_models(&self) -> Result<ModelListing> {
        tracing::debug!(url = %self.models_url, "listing models");
        let response = self.client.get(&self.models_url).send().await?;
        let response = Self::check_status(response).await?;

        let body: serde_json::Value = serde_json::from_slice(&response.bytes().await?)?;
        let listing = ModelListing::from_body(body);
        tracing::debug!(count = listing.len(), "models listed");

        Ok(listing)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(CliError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Buffered chat completion response
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

/// `choices[0].message` of a buffered response
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CompletionMessage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub reasoning: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
