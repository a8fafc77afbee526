//! Completion provider clients

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{resolve_api_key, DeepseekConfig, EternalAiConfig};
use crate::error::{Result, SentinelError};

/// Longest upstream error body kept in an error message
pub const MAX_ERROR_BODY: usize = 200;

/// A user question, optionally about a specific contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    message: String,
    contract_address: Option<String>,
}

impl Query {
    pub fn new(message: impl Into<String>, contract_address: Option<String>) -> Self {
        Self {
            message: message.into(),
            contract_address: contract_address.filter(|a| !a.trim().is_empty()),
        }
    }

    pub fn contract_address(&self) -> Option<&str> {
        self.contract_address.as_deref()
    }

    /// Prompt sent to both providers
    pub fn prompt(&self) -> String {
        match &self.contract_address {
            Some(address) => format!(
                "{} \nAnalyze this contract address: {}",
                self.message, address
            ),
            None => format!("{} ", self.message),
        }
    }
}

/// One completion call. Unset sampling fields fall back to the provider's config.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Generic completion provider trait
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion. Returns `Cancelled` as soon as `cancel` fires.
    async fn complete(&self, request: &CompletionRequest, cancel: &CancellationToken)
        -> Result<String>;

    fn name(&self) -> &str;
}

/// EternalAI completions provider
pub struct EternalAiProvider {
    client: Client,
    config: EternalAiConfig,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EternalAiRequest<'a> {
    chain_id: &'a str,
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct EternalAiResponse {
    choices: Vec<EternalAiChoice>,
}

#[derive(Deserialize)]
struct EternalAiChoice {
    text: String,
}

impl EternalAiProvider {
    pub fn new(client: Client, config: EternalAiConfig) -> Self {
        let api_key = resolve_api_key(&config.api_key);
        Self {
            client,
            config,
            api_key,
        }
    }

    /// Register a monitoring agent with EternalAI and return the vendor's reply
    pub async fn create_agent(
        &self,
        mut agent: serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        agent.insert(
            "chain_id".to_string(),
            serde_json::Value::String(self.config.chain_id.clone()),
        );

        let url = format!("{}/agent/create", self.config.endpoint);
        let (_, body) = post_json(&self.client, &url, self.key()?, &agent).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SentinelError::MissingApiKey("EternalAI".to_string()))
    }

    async fn request(&self, request: &CompletionRequest) -> Result<String> {
        let body = EternalAiRequest {
            chain_id: &self.config.chain_id,
            model: &self.config.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
        };

        let url = format!("{}/completions", self.config.endpoint);
        let (status, text) = post_json(&self.client, &url, self.key()?, &body).await?;
        parse_eternal_ai(status, &text)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for EternalAiProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        tokio::select! {
            _ = cancel.cancelled() => Err(SentinelError::Cancelled),
            result = self.request(request) => result,
        }
    }

    fn name(&self) -> &str {
        "EternalAI"
    }
}

/// Deepseek provider (OpenAI-compatible chat completions)
pub struct DeepseekProvider {
    client: Client,
    config: DeepseekConfig,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct DeepseekRequest<'a> {
    model: &'a str,
    messages: Vec<DeepseekMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Serialize)]
struct DeepseekMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct DeepseekResponse {
    choices: Vec<DeepseekChoice>,
}

#[derive(Deserialize)]
struct DeepseekChoice {
    message: DeepseekMessageResponse,
}

#[derive(Deserialize)]
struct DeepseekMessageResponse {
    content: Option<String>,
}

impl DeepseekProvider {
    pub fn new(client: Client, config: DeepseekConfig) -> Self {
        let api_key = resolve_api_key(&config.api_key);
        Self {
            client,
            config,
            api_key,
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SentinelError::MissingApiKey("Deepseek".to_string()))
    }

    async fn request(&self, request: &CompletionRequest) -> Result<String> {
        let body = DeepseekRequest {
            model: &self.config.model,
            messages: vec![DeepseekMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature.unwrap_or(self.config.temperature),
            top_p: self.config.top_p,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
        };

        let url = format!("{}/chat/completions", self.config.endpoint);
        let (status, text) = post_json(&self.client, &url, self.key()?, &body).await?;
        parse_deepseek(status, &text)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for DeepseekProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        tokio::select! {
            _ = cancel.cancelled() => Err(SentinelError::Cancelled),
            result = self.request(request) => result,
        }
    }

    fn name(&self) -> &str {
        "Deepseek"
    }
}

/// POST a JSON body with bearer auth, returning the status and raw body of a
/// successful reply
async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &T,
) -> Result<(u16, String)> {
    debug!(url, "sending completion request");

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(SentinelError::Upstream {
            status: status.as_u16(),
            message: truncate_response(&text, MAX_ERROR_BODY).to_string(),
        });
    }

    Ok((status.as_u16(), text))
}

pub(crate) fn parse_eternal_ai(status: u16, body: &str) -> Result<String> {
    let response: EternalAiResponse = serde_json::from_str(body)
        .map_err(|_| SentinelError::malformed(status, "expected choices[].text"))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
        .ok_or_else(|| SentinelError::malformed(status, "no choices"))
}

pub(crate) fn parse_deepseek(status: u16, body: &str) -> Result<String> {
    let response: DeepseekResponse = serde_json::from_str(body)
        .map_err(|_| SentinelError::malformed(status, "expected choices[].message"))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| SentinelError::malformed(status, "no message content"))
}

/// Truncate a response to at most `max_len` bytes on a char boundary
pub fn truncate_response(response: &str, max_len: usize) -> &str {
    if response.len() <= max_len {
        return response;
    }
    let mut end = max_len;
    while !response.is_char_boundary(end) {
        end -= 1;
    }
    &response[..end]
}
