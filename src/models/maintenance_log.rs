//! Maintenance log model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::enums::MaintenanceKind;

/// Maintenance log record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceLog {
    pub id: i32,
    pub equipment_id: i32,
    pub kind: MaintenanceKind,
    pub description: String,
    pub reported_by: Option<i32>,
    /// Repair/replacement cost, if known
    pub cost: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create maintenance log request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceLog {
    pub equipment_id: i32,
    pub kind: MaintenanceKind,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub cost: Option<Decimal>,
}

/// Maintenance log list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MaintenanceLogQuery {
    pub equipment: Option<i32>,
    pub kind: Option<MaintenanceKind>,
}
