//! Dual-provider aggregation
//!
//! Fans a [`Query`] out to EternalAI and Deepseek at the same time, waits for
//! both to settle and merges whatever answered. The caller only sees an error
//! when neither provider produced text.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{Result, SentinelError};
use crate::llm::guard::{with_timeout, ProviderOutcome};
use crate::llm::provider::{CompletionProvider, CompletionRequest, Query};

pub const ETERNAL_AI_UNAVAILABLE: &str = "EternalAI service is currently unavailable";
pub const DEEPSEEK_UNAVAILABLE: &str = "Deepseek service is currently unavailable";

/// Per-provider outcomes of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub eternal_ai: ProviderOutcome,
    pub deepseek: ProviderOutcome,
}

/// Combined answer returned to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResponse {
    #[serde(rename = "eternalAI")]
    pub eternal_ai: String,
    pub deepseek: String,
}

impl AggregateResult {
    /// Apply the classification rule: any success is usable, the rest become
    /// placeholders. Timeouts and failures are treated alike.
    pub fn compose(self) -> Result<AggregateResponse> {
        if !self.eternal_ai.is_success() && !self.deepseek.is_success() {
            return Err(SentinelError::BothProvidersUnavailable);
        }

        Ok(AggregateResponse {
            eternal_ai: self
                .eternal_ai
                .into_text()
                .unwrap_or_else(|| ETERNAL_AI_UNAVAILABLE.to_string()),
            deepseek: self
                .deepseek
                .into_text()
                .unwrap_or_else(|| DEEPSEEK_UNAVAILABLE.to_string()),
        })
    }
}

pub struct Aggregator {
    eternal_ai: Arc<dyn CompletionProvider>,
    deepseek: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(
        eternal_ai: Arc<dyn CompletionProvider>,
        deepseek: Arc<dyn CompletionProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            eternal_ai,
            deepseek,
            timeout,
        }
    }

    /// Run both providers concurrently and collect their outcomes
    pub async fn run(&self, query: &Query) -> AggregateResult {
        let request = CompletionRequest::new(query.prompt());
        let request_token = CancellationToken::new();
        let eternal_token = request_token.child_token();
        let deepseek_token = request_token.child_token();

        let (eternal_ai, deepseek) = tokio::join!(
            with_timeout(
                self.eternal_ai.complete(&request, &eternal_token),
                self.timeout,
                &eternal_token,
            ),
            with_timeout(
                self.deepseek.complete(&request, &deepseek_token),
                self.timeout,
                &deepseek_token,
            ),
        );

        log_outcome(self.eternal_ai.name(), &eternal_ai);
        log_outcome(self.deepseek.name(), &deepseek);

        AggregateResult {
            eternal_ai,
            deepseek,
        }
    }

    /// Run both providers and compose the dashboard response
    pub async fn aggregate(&self, query: &Query) -> Result<AggregateResponse> {
        let result = self.run(query).await;
        let response = result.compose();
        if response.is_err() {
            warn!("both AI providers failed for chat query");
        }
        response
    }
}

fn log_outcome(provider: &str, outcome: &ProviderOutcome) {
    match outcome {
        ProviderOutcome::Success { text } => {
            info!(provider, chars = text.chars().count(), "provider answered");
        }
        ProviderOutcome::Failure { reason } => {
            warn!(provider, %reason, "provider failed");
        }
        ProviderOutcome::Timeout => {
            warn!(provider, "provider timed out");
        }
    }
}
