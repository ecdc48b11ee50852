use actix_web::{HttpResponse, ResponseError};
use crate::models::{ApiError, ApiErrorResponse};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Already spun today")]
    AlreadySpunToday,

    #[error("No winnable prizes configured")]
    NoWinnablePrizesConfigured,

    #[error("Invalid geometry input: {0}")]
    InvalidGeometryInput(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    /// 用户可预期的业务拒绝 (返回 success=false, 不视为故障)
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            AppError::AlreadySpunToday | AppError::NoWinnablePrizesConfigured
        )
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Forbidden".to_string(),
                )
            }
            AppError::AlreadySpunToday => {
                log::debug!("Spin rejected: already spun today");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "ALREADY_SPUN_TODAY",
                    self.to_string(),
                )
            }
            AppError::NoWinnablePrizesConfigured => {
                log::warn!("Spin rejected: wheel has no prizes configured");
                (
                    actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                    "NO_WINNABLE_PRIZES",
                    self.to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(ApiErrorResponse {
            success: false,
            error: ApiError {
                code: error_code.to_string(),
                message,
            },
        })
    }
}
