//! Single-provider security analyses backed by EternalAI

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::error;

use super::error::{required, ApiError};
use super::AppState;
use crate::error::SentinelError;
use crate::llm::{deadline, with_timeout, CompletionRequest, ProviderOutcome};

#[derive(Debug, Clone, Copy)]
enum Analysis {
    Transaction,
    Contract,
    Address,
}

impl Analysis {
    fn prompt(self, subject: &str) -> String {
        match self {
            Self::Transaction => format!(
                "Analyze this blockchain transaction for potential security threats: {}",
                subject
            ),
            Self::Contract => format!(
                "Audit this smart contract code for security vulnerabilities: {}",
                subject
            ),
            Self::Address => format!(
                "Generate a comprehensive security report for blockchain address: {}",
                subject
            ),
        }
    }

    fn max_tokens(self) -> u32 {
        match self {
            Self::Transaction => 500,
            Self::Contract => 1000,
            Self::Address => 1500,
        }
    }

    fn temperature(self) -> f32 {
        match self {
            Self::Transaction => 0.3,
            Self::Contract => 0.2,
            Self::Address => 0.4,
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Transaction => "Failed to analyze transaction",
            Self::Contract => "Failed to audit smart contract",
            Self::Address => "Failed to generate security report",
        }
    }

    fn request(self, subject: &str) -> CompletionRequest {
        CompletionRequest::new(self.prompt(subject))
            .with_max_tokens(self.max_tokens())
            .with_temperature(self.temperature())
    }
}

async fn run(state: &AppState, analysis: Analysis, subject: &str) -> Result<String, ApiError> {
    let cancel = CancellationToken::new();
    let request = analysis.request(subject);

    let outcome = with_timeout(
        state.analyst.complete(&request, &cancel),
        state.timeout,
        &cancel,
    )
    .await;

    match outcome {
        ProviderOutcome::Success { text } => Ok(text),
        ProviderOutcome::Failure { reason } => {
            error!(%reason, "{}", analysis.failure_message());
            Err(ApiError::internal_server_error(analysis.failure_message()))
        }
        ProviderOutcome::Timeout => Err(ApiError::upstream(
            analysis.failure_message(),
            &SentinelError::Timeout,
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    transaction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionAnalysis {
    analysis: String,
}

/// `POST /api/ai/analyze-transaction`
pub async fn analyze_transaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionAnalysis>, ApiError> {
    let Json(request) = payload?;
    let transaction = required(request.transaction, "transaction")?;
    let analysis = run(&state, Analysis::Transaction, &transaction).await?;
    Ok(Json(TransactionAnalysis { analysis }))
}

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuditReport {
    audit_report: String,
}

/// `POST /api/ai/audit-contract`
pub async fn audit_contract(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, ApiError> {
    let Json(request) = payload?;
    let code = required(request.code, "code")?;
    let audit_report = run(&state, Analysis::Contract, &code).await?;
    Ok(Json(AuditReport { audit_report }))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SecurityReport {
    report: String,
}

/// `POST /api/ai/security-report`
pub async fn security_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<SecurityReport>, ApiError> {
    let Json(request) = payload?;
    let address = required(request.address, "address")?;
    let report = run(&state, Analysis::Address, &address).await?;
    Ok(Json(SecurityReport { report }))
}

/// `POST /api/ai/create-agent`
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let Value::Object(agent) = body else {
        return Err(ApiError::bad_request("agent definition must be a JSON object"));
    };

    deadline(state.timeout, state.agents.create_agent(agent))
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to create security agent", &e))
}
