//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// A labeled count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

/// Equipment stock totals
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentStats {
    /// Number of distinct equipment items
    pub items: i64,
    /// Total units across all items
    pub total_units: i64,
    /// Units currently on the shelf
    pub available_units: i64,
}

/// Request counts by lifecycle state
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RequestStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub issued: i64,
    pub returned: i64,
}

/// User counts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserStats {
    pub total: i64,
    pub by_role: Vec<StatEntry>,
}

/// Dashboard statistics response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    pub equipment: EquipmentStats,
    pub requests: RequestStats,
    pub users: UserStats,
}

/// Get dashboard statistics (staff only)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    claims.require_staff()?;
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
