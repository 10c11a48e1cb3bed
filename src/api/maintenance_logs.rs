//! Maintenance log endpoints (staff only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance_log::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogQuery},
};

use super::AuthenticatedUser;

/// List maintenance logs
#[utoipa::path(
    get,
    path = "/maintenance-logs",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceLogQuery),
    responses(
        (status = 200, description = "Maintenance log list", body = Vec<MaintenanceLog>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MaintenanceLogQuery>,
) -> AppResult<Json<Vec<MaintenanceLog>>> {
    claims.require_staff()?;
    let logs = state.services.maintenance_logs.list(&query).await?;
    Ok(Json(logs))
}

/// Get maintenance log by ID
#[utoipa::path(
    get,
    path = "/maintenance-logs/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance log ID")),
    responses(
        (status = 200, description = "Maintenance log", body = MaintenanceLog),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Log not found")
    )
)]
pub async fn get_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceLog>> {
    claims.require_staff()?;
    let log = state.services.maintenance_logs.get_by_id(id).await?;
    Ok(Json(log))
}

/// Create a maintenance log entry
#[utoipa::path(
    post,
    path = "/maintenance-logs",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceLog,
    responses(
        (status = 201, description = "Log created", body = MaintenanceLog),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenanceLog>,
) -> AppResult<(StatusCode, Json<MaintenanceLog>)> {
    claims.require_staff()?;
    let log = state
        .services
        .maintenance_logs
        .create(claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// Delete a maintenance log entry
#[utoipa::path(
    delete,
    path = "/maintenance-logs/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance log ID")),
    responses(
        (status = 204, description = "Log deleted"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Log not found")
    )
)]
pub async fn delete_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.maintenance_logs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
