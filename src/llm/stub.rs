//! In-process stand-ins for upstream services, used by tests

use std::time::Duration;

use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SentinelError};
use crate::llm::provider::{CompletionProvider, CompletionRequest};

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Provider with a canned reply after a fixed delay
pub struct StubProvider {
    name: String,
    delay: Duration,
    reply: std::result::Result<String, u16>,
}

impl StubProvider {
    pub fn answering(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            reply: Ok(text.to_string()),
        }
    }

    pub fn failing(name: &str, status: u16) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            reply: Err(status),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        _request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        tokio::select! {
            _ = cancel.cancelled() => return Err(SentinelError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(SentinelError::Upstream {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
