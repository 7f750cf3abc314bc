//! Response envelope shared by every Vendly endpoint.
//!
//! All responses carry `{message, data}`, list responses add a `pagination`
//! block. Failures always carry `data: null`.

use serde::{Deserialize, Serialize};

/// Pagination block for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub total_count: i64,
    pub per_page: i64,
    pub total_page: i64,
}

/// The platform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    /// Successful response with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }

    /// Successful list response with a pagination block.
    pub fn ok_paginated(message: impl Into<String>, data: T, pagination: Pagination) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            pagination: Some(pagination),
        }
    }

    /// Failure response; `data` is always null.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            pagination: None,
        }
    }
}
