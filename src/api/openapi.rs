//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, borrow_requests, equipment, health, maintenance_logs, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ScholarLend API",
        version = "1.0.0",
        description = "Equipment Lending Portal REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::check_availability,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Borrow requests
        borrow_requests::create_request,
        borrow_requests::list_requests,
        borrow_requests::my_requests,
        borrow_requests::pending_approvals,
        borrow_requests::get_request,
        borrow_requests::approve_request,
        borrow_requests::reject_request,
        borrow_requests::issue_request,
        borrow_requests::return_request,
        // Maintenance
        maintenance_logs::list_logs,
        maintenance_logs::get_log,
        maintenance_logs::create_log,
        maintenance_logs::delete_log,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::AuthResponse,
            auth::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::enums::Role,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentShort,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::EquipmentQuery,
            crate::models::enums::EquipmentCategory,
            crate::models::enums::EquipmentCondition,
            // Borrow requests
            crate::models::borrow_request::BorrowRequest,
            crate::models::borrow_request::BorrowRequestDetails,
            crate::models::borrow_request::CreateBorrowRequest,
            crate::models::borrow_request::ApproveRequest,
            crate::models::borrow_request::RejectRequest,
            crate::models::borrow_request::BorrowRequestQuery,
            crate::models::borrow_request::AvailabilityQuery,
            crate::models::enums::RequestStatus,
            crate::services::availability::Availability,
            // Maintenance
            crate::models::maintenance_log::MaintenanceLog,
            crate::models::maintenance_log::CreateMaintenanceLog,
            crate::models::maintenance_log::MaintenanceLogQuery,
            crate::models::enums::MaintenanceKind,
            // Stats
            stats::StatsResponse,
            stats::EquipmentStats,
            stats::RequestStats,
            stats::UserStats,
            stats::StatEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment catalog and availability"),
        (name = "borrow-requests", description = "Borrow request lifecycle"),
        (name = "maintenance", description = "Equipment maintenance logs"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
