//! Statistics service

use sqlx::Row;

use crate::{
    api::stats::{EquipmentStats, RequestStats, StatEntry, StatsResponse, UserStats},
    error::AppResult,
    models::enums::RequestStatus,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get dashboard statistics
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let equipment_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(pool)
            .await?;

        let total_units: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM equipment")
                .fetch_one(pool)
                .await?;

        let available_units: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(available_quantity), 0)::BIGINT FROM equipment")
                .fetch_one(pool)
                .await?;

        let mut requests = RequestStats::default();
        let rows = sqlx::query("SELECT status, COUNT(*) AS value FROM borrow_requests GROUP BY status")
            .fetch_all(pool)
            .await?;
        for row in rows {
            let status: RequestStatus = row.get("status");
            let value: i64 = row.get("value");
            match status {
                RequestStatus::Pending => requests.pending = value,
                RequestStatus::Approved => requests.approved = value,
                RequestStatus::Rejected => requests.rejected = value,
                RequestStatus::Issued => requests.issued = value,
                RequestStatus::Returned => requests.returned = value,
            }
        }

        let users_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let users_by_role = sqlx::query(
            "SELECT role AS label, COUNT(*) AS value FROM users GROUP BY role ORDER BY value DESC",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        Ok(StatsResponse {
            equipment: EquipmentStats {
                items: equipment_items,
                total_units,
                available_units,
            },
            requests,
            users: UserStats {
                total: users_total,
                by_role: users_by_role,
            },
        })
    }
}
