//! Business logic services

pub mod auth;
pub mod availability;
pub mod borrow_requests;
pub mod equipment;
pub mod maintenance_logs;
pub mod stats;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub equipment: equipment::EquipmentService,
    pub availability: availability::AvailabilityService,
    pub requests: borrow_requests::BorrowRequestsService,
    pub maintenance_logs: maintenance_logs::MaintenanceLogsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let availability = availability::AvailabilityService::new(repository.clone());
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone()),
            requests: borrow_requests::BorrowRequestsService::new(
                repository.clone(),
                availability.clone(),
            ),
            maintenance_logs: maintenance_logs::MaintenanceLogsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            availability,
        }
    }
}
