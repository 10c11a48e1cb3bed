//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::enums::{EquipmentCategory, EquipmentCondition};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Equipment name
    pub name: String,
    pub description: Option<String>,
    pub category: EquipmentCategory,
    pub condition: EquipmentCondition,
    /// Total number of units owned
    pub quantity: i32,
    /// Units currently on the shelf (0 <= available <= quantity)
    pub available_quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Short equipment representation embedded in request details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentShort {
    pub id: i32,
    pub name: String,
    pub category: EquipmentCategory,
    pub quantity: i32,
    pub available_quantity: i32,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub condition: Option<EquipmentCondition>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    pub available_quantity: Option<i32>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub condition: Option<EquipmentCondition>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    pub available_quantity: Option<i32>,
}

/// Equipment list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Case-insensitive name search
    pub search: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub condition: Option<EquipmentCondition>,
    /// true: only items with available units; false: only exhausted items
    pub available: Option<bool>,
}
