use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// API version header required by the messages endpoint.
const API_VERSION: &str = "2023-06-01";

/// Capability interface over the text-generation collaborator.
///
/// Pure function from instruction plus content to reply text; the dispatcher
/// owns the prompt wording and output cap. Tests substitute canned fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        content: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    block_type: Option<String>,
    text: Option<String>,
}

/// HTTP client for the Anthropic messages API.
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GenerationClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(
        &self,
        system: &str,
        content: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        };

        let url = format!("{}/v1/messages", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(GenerationError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        // The first returned candidate is taken verbatim as the reply body
        completion
            .content
            .into_iter()
            .find_map(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyCompletion)
    }
}
