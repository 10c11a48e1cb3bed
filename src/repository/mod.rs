//! Repository layer for database operations

pub mod borrow_requests;
pub mod equipment;
pub mod maintenance_logs;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub equipment: equipment::EquipmentRepository,
    pub borrow_requests: borrow_requests::BorrowRequestsRepository,
    pub maintenance_logs: maintenance_logs::MaintenanceLogsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            borrow_requests: borrow_requests::BorrowRequestsRepository::new(pool.clone()),
            maintenance_logs: maintenance_logs::MaintenanceLogsRepository::new(pool.clone()),
            pool,
        }
    }
}
