//! TEE attestation status
//!
//! No enclave is attached yet; the status is a fixed mock stamped with the
//! current time.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeeStatus {
    pub active: bool,
    pub last_verified: String,
    pub proof: TeeProof,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeeProof {
    pub quote: String,
    pub signature: String,
    pub certificate: String,
}

impl TeeStatus {
    pub fn mock() -> Self {
        Self {
            active: true,
            last_verified: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            proof: TeeProof {
                quote: "mock_quote".to_string(),
                signature: "mock_signature".to_string(),
                certificate: "mock_certificate".to_string(),
            },
        }
    }
}
