//! Deadline enforcement for a single provider call

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, SentinelError};

/// Settled result of one provider attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    Success { text: String },
    Failure { reason: String },
    Timeout,
}

impl ProviderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Success { text } => Some(text),
            _ => None,
        }
    }
}

/// Wait at most `duration` for `call`.
///
/// On deadline the branch token is cancelled and the call is dropped; any
/// late result is discarded.
pub async fn with_timeout<F>(
    call: F,
    duration: Duration,
    cancel: &CancellationToken,
) -> ProviderOutcome
where
    F: Future<Output = Result<String>>,
{
    match tokio::time::timeout(duration, call).await {
        Ok(Ok(text)) => ProviderOutcome::Success { text },
        Ok(Err(e)) => ProviderOutcome::Failure {
            reason: e.to_string(),
        },
        Err(_) => {
            cancel.cancel();
            ProviderOutcome::Timeout
        }
    }
}

/// Bound a vendor call that has no outcome classification, mapping an
/// elapsed deadline to `Timeout`
pub async fn deadline<T, F>(duration: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(duration, call)
        .await
        .map_err(|_| SentinelError::Timeout)?
}
