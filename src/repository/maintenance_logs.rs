//! Maintenance logs repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::maintenance_log::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogQuery},
};

#[derive(Clone)]
pub struct MaintenanceLogsRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get maintenance log by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>("SELECT * FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance log {} not found", id)))
    }

    /// List maintenance logs, optionally filtered by equipment and kind
    pub async fn list(&self, query: &MaintenanceLogQuery) -> AppResult<Vec<MaintenanceLog>> {
        let mut conditions = vec!["1 = 1".to_string()];
        let mut idx = 0;

        if query.equipment.is_some() {
            idx += 1;
            conditions.push(format!("equipment_id = ${}", idx));
        }
        if query.kind.is_some() {
            idx += 1;
            conditions.push(format!("kind = ${}", idx));
        }
        let _ = idx;

        let sql = format!(
            "SELECT * FROM maintenance_logs WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, MaintenanceLog>(&sql);
        if let Some(equipment_id) = query.equipment {
            builder = builder.bind(equipment_id);
        }
        if let Some(kind) = query.kind {
            builder = builder.bind(kind);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Create a maintenance log entry
    pub async fn create(
        &self,
        reported_by: i32,
        data: &CreateMaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (equipment_id, kind, description, reported_by, cost)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.kind)
        .bind(&data.description)
        .bind(reported_by)
        .bind(data.cost)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    /// Delete a maintenance log entry
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance log {} not found", id)));
        }
        Ok(())
    }
}
