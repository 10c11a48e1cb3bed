//! Error types for ScholarLend server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::enums::RequestStatus;

/// Application error codes carried in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    BadValue = 5,
    Duplicate = 6,
    InvalidInterval = 7,
    PastStartDate = 8,
    QuantityExceedsStock = 9,
    OverlapExceedsStock = 10,
    InvalidTransition = 11,
    InsufficientStock = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("End date must be on or after start date")]
    InvalidInterval,

    #[error("Start date cannot be in the past")]
    PastStartDate,

    #[error("Requested quantity {requested} exceeds total stock of {total}")]
    QuantityExceedsStock { requested: i32, total: i32 },

    #[error("Only {remaining} items available for the requested period")]
    OverlapExceedsStock { remaining: i32 },

    #[error("Cannot {action} a request with status '{status}'")]
    InvalidTransition {
        action: &'static str,
        status: RequestStatus,
    },

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Remaining capacity, set for period-capacity failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i32>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut remaining = None;

        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::InvalidInterval => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidInterval, self.to_string())
            }
            AppError::PastStartDate => {
                (StatusCode::BAD_REQUEST, ErrorCode::PastStartDate, self.to_string())
            }
            AppError::QuantityExceedsStock { .. } => {
                (StatusCode::BAD_REQUEST, ErrorCode::QuantityExceedsStock, self.to_string())
            }
            AppError::OverlapExceedsStock { remaining: r } => {
                remaining = Some(*r);
                (StatusCode::CONFLICT, ErrorCode::OverlapExceedsStock, self.to_string())
            }
            AppError::InvalidTransition { .. } => {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::InvalidTransition,
                    self.to_string(),
                )
            }
            AppError::InsufficientStock { .. } => {
                (StatusCode::CONFLICT, ErrorCode::InsufficientStock, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            remaining,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
