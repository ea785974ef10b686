// src/models/response.rs

use serde::Serialize;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data`, sent by list endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            total: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// A non-error outcome that still reports `success: false`, e.g. a delete that matched nothing.
    pub fn unsuccessful(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: Some(message.into()),
            total: None,
        }
    }
}
