//! Borrow request lifecycle endpoints
//!
//! Any authenticated user creates requests for themselves; approve,
//! reject, issue and return require staff. Students only see their own
//! requests.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow_request::{
        ApproveRequest, BorrowRequest, BorrowRequestDetails, BorrowRequestQuery,
        CreateBorrowRequest, RejectRequest,
    },
};

use super::AuthenticatedUser;

/// Create a borrow request
#[utoipa::path(
    post,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Request created as pending", body = BorrowRequest),
        (status = 400, description = "Invalid dates or quantity"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Quantity exceeds remaining capacity for the period")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRequest>)> {
    let request = state.services.requests.create(claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List borrow requests. Staff see all requests; students only their own.
#[utoipa::path(
    get,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(BorrowRequestQuery),
    responses(
        (status = 200, description = "Borrow request list", body = Vec<BorrowRequestDetails>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(mut query): Query<BorrowRequestQuery>,
) -> AppResult<Json<Vec<BorrowRequestDetails>>> {
    if !claims.is_staff() {
        query.user = Some(claims.user_id);
    }
    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// List the current user's borrow requests
#[utoipa::path(
    get,
    path = "/borrow-requests/my",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user's requests", body = Vec<BorrowRequestDetails>)
    )
)]
pub async fn my_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRequestDetails>>> {
    let requests = state.services.requests.my_requests(claims.user_id).await?;
    Ok(Json(requests))
}

/// List requests awaiting a decision (staff only)
#[utoipa::path(
    get,
    path = "/borrow-requests/pending",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending requests", body = Vec<BorrowRequestDetails>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn pending_approvals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRequestDetails>>> {
    claims.require_staff()?;
    let requests = state.services.requests.pending_approvals().await?;
    Ok(Json(requests))
}

/// Get one borrow request (owner or staff)
#[utoipa::path(
    get,
    path = "/borrow-requests/{id}",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Borrow request details", body = BorrowRequestDetails),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRequestDetails>> {
    let request = state.services.requests.get_details(id).await?;
    if !claims.is_staff() && request.user.id != claims.user_id {
        return Err(crate::error::AppError::Authorization(
            "You may only view your own requests".to_string(),
        ));
    }
    Ok(Json(request))
}

/// Approve a pending request (staff only)
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/approve",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Request approved", body = BorrowRequest),
        (status = 403, description = "Staff privileges required"),
        (status = 409, description = "Capacity consumed since creation"),
        (status = 422, description = "Request is not pending")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ApproveRequest>,
) -> AppResult<Json<BorrowRequest>> {
    claims.require_staff()?;
    let request = state.services.requests.approve(id, claims.user_id, &data).await?;
    Ok(Json(request))
}

/// Reject a pending request (staff only)
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/reject",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Request rejected", body = BorrowRequest),
        (status = 403, description = "Staff privileges required"),
        (status = 422, description = "Request is not pending")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<RejectRequest>,
) -> AppResult<Json<BorrowRequest>> {
    claims.require_staff()?;
    let request = state.services.requests.reject(id, claims.user_id, &data).await?;
    Ok(Json(request))
}

/// Hand out equipment for an approved request (staff only)
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/issue",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Equipment issued", body = BorrowRequest),
        (status = 403, description = "Staff privileges required"),
        (status = 409, description = "Not enough units on the shelf"),
        (status = 422, description = "Request is not approved")
    )
)]
pub async fn issue_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRequest>> {
    claims.require_staff()?;
    let request = state.services.requests.issue(id).await?;
    Ok(Json(request))
}

/// Take equipment back for an issued request (staff only)
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/return",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Equipment returned", body = BorrowRequest),
        (status = 403, description = "Staff privileges required"),
        (status = 422, description = "Request is not issued")
    )
)]
pub async fn return_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRequest>> {
    claims.require_staff()?;
    let request = state.services.requests.return_equipment(id).await?;
    Ok(Json(request))
}
