//! API-facing response models.

use serde::{Deserialize, Serialize};

/// Soft failure: the request was valid but had no effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningResponse {
    /// Human-readable reason.
    pub warning: String,
}

/// Hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

impl ErrorResponse {
    /// Body for unknown routes.
    pub fn not_found() -> Self {
        Self {
            error: "Not Found".to_string(),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
