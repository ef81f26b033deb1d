use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::FILES_PAGE_SIZE;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub page: u32,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Zero-indexed page over a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub index: u32,
}

impl Page {
    pub fn new(index: u32) -> Self {
        Self { index }
    }

    /// Number of records to skip
    pub fn offset(&self) -> i64 {
        i64::from(self.index) * self.limit()
    }

    /// Number of records to take
    pub fn limit(&self) -> i64 {
        FILES_PAGE_SIZE
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}
