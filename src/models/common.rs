use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 统一错误体: `{ "success": false, "error": { code, message } }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiError,
}
