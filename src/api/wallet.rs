use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::error::{required, ApiError};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    email: Option<String>,
}

/// `POST /api/wallet/create`
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let email = required(request.email, "email")?;

    state
        .wallet
        .create_wallet(&email)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to create wallet", &e))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    address: Option<String>,
    transaction_data: Option<String>,
}

/// `POST /api/wallet/transaction`
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let address = required(request.address, "address")?;
    let data = required(request.transaction_data, "transactionData")?;

    state
        .wallet
        .create_transaction(&address, &data)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to create transaction", &e))
}

/// `GET /api/wallet/transaction/:wallet_address/:transaction_id`
pub async fn transaction_status(
    State(state): State<Arc<AppState>>,
    Path((wallet_address, transaction_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .wallet
        .transaction(&wallet_address, &transaction_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to get transaction status", &e))
}

/// `GET /api/wallet/nfts/:wallet_address`
pub async fn nfts(
    State(state): State<Arc<AppState>>,
    Path(wallet_address): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .wallet
        .nfts(&wallet_address)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to fetch NFTs", &e))
}
