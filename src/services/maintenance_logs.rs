//! Maintenance log service

use validator::Validate;

use crate::{
    error::AppResult,
    models::maintenance_log::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceLogsService {
    repository: Repository,
}

impl MaintenanceLogsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &MaintenanceLogQuery) -> AppResult<Vec<MaintenanceLog>> {
        self.repository.maintenance_logs.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceLog> {
        self.repository.maintenance_logs.get_by_id(id).await
    }

    pub async fn create(
        &self,
        reported_by: i32,
        data: &CreateMaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        data.validate()?;
        // Reject logs against unknown equipment up front
        self.repository.equipment.get_by_id(data.equipment_id).await?;
        self.repository.maintenance_logs.create(reported_by, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.maintenance_logs.delete(id).await
    }
}
