//! Borrow request model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::equipment::EquipmentShort;
use super::enums::RequestStatus;
use super::user::UserShort;

/// Borrow request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRequest {
    pub id: i32,
    pub user_id: i32,
    pub equipment_id: i32,
    pub quantity: i32,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    /// First day of the borrow period (inclusive)
    pub borrow_from: NaiveDate,
    /// Last day of the borrow period (inclusive)
    pub borrow_to: NaiveDate,
    pub approved_by: Option<i32>,
    pub approved_date: Option<DateTime<Utc>>,
    pub issued_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    pub purpose: Option<String>,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
}

/// Borrow request with embedded user and equipment for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowRequestDetails {
    pub id: i32,
    pub quantity: i32,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub borrow_from: NaiveDate,
    pub borrow_to: NaiveDate,
    pub approved_date: Option<DateTime<Utc>>,
    pub issued_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    pub purpose: Option<String>,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
    pub user: UserShort,
    pub equipment: EquipmentShort,
    pub approved_by: Option<UserShort>,
}

/// Create borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrowRequest {
    pub equipment_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub borrow_from: NaiveDate,
    pub borrow_to: NaiveDate,
    pub purpose: Option<String>,
}

/// Approve request payload
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApproveRequest {
    pub notes: Option<String>,
}

/// Reject request payload
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
}

/// Borrow request list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BorrowRequestQuery {
    pub status: Option<RequestStatus>,
    pub user: Option<i32>,
    pub equipment: Option<i32>,
}

/// Availability check query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub quantity: i32,
    /// Request id to leave out of the committed sum (for re-validation)
    pub exclude_request: Option<i32>,
}
