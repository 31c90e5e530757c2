//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ... }`; failures
//! are rendered by [`crate::error::AppError`] with `"success": false`.

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
