use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use super::error::{required, ApiError};
use super::AppState;
use crate::llm::{AggregateResponse, Query};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    message: Option<String>,
    contract_address: Option<String>,
}

/// `POST /api/ai/chat`
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let Json(request) = payload?;
    let message = required(request.message, "message")?;
    let query = Query::new(message, request.contract_address);

    info!(contract = query.contract_address(), "chat query received");

    match state.aggregator.aggregate(&query).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!(error = %e, "error processing AI chat");
            Err(ApiError::internal_server_error("Failed to process chat request")
                .with_details(e.to_string()))
        }
    }
}
