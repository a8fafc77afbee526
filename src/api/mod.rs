//! HTTP surface consumed by the dashboard

mod analysis;
mod chat;
mod error;
mod wallet;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::config::Config;
use crate::error::Result;
use crate::llm::{Aggregator, CompletionProvider, DeepseekProvider, EternalAiProvider};
use crate::tee::TeeStatus;
use crate::wallet::WalletClient;

/// Shared, read-only handler state
pub struct AppState {
    /// Dual-provider chat
    pub aggregator: Aggregator,
    /// Single-provider analyses
    pub analyst: Arc<dyn CompletionProvider>,
    pub agents: Arc<EternalAiProvider>,
    pub wallet: WalletClient,
    /// Deadline for any single EternalAI or Deepseek call
    pub timeout: Duration,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::new();
        let eternal_ai = Arc::new(EternalAiProvider::new(
            client.clone(),
            config.eternal_ai.clone(),
        ));
        let deepseek = Arc::new(DeepseekProvider::new(client.clone(), config.deepseek.clone()));
        let timeout = config.chat.timeout();

        Ok(Self {
            aggregator: Aggregator::new(eternal_ai.clone(), deepseek, timeout),
            analyst: eternal_ai.clone(),
            agents: eternal_ai,
            wallet: WalletClient::new(client, config.wallet.clone())?,
            timeout,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ai/chat", post(chat::chat))
        .route("/api/ai/analyze-transaction", post(analysis::analyze_transaction))
        .route("/api/ai/audit-contract", post(analysis::audit_contract))
        .route("/api/ai/security-report", post(analysis::security_report))
        .route("/api/ai/create-agent", post(analysis::create_agent))
        .route("/api/wallet/create", post(wallet::create_wallet))
        .route("/api/wallet/transaction", post(wallet::create_transaction))
        .route(
            "/api/wallet/transaction/:wallet_address/:transaction_id",
            get(wallet::transaction_status),
        )
        .route("/api/wallet/nfts/:wallet_address", get(wallet::nfts))
        .route("/api/tee/status", get(tee_status))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

async fn tee_status() -> Json<TeeStatus> {
    Json(TeeStatus::mock())
}
