//! Borrow requests repository for database operations
//!
//! The lifecycle transitions that touch both a request's status and the
//! equipment counter (approve's capacity re-check, issue, return) run in
//! a single transaction: the request row is locked first, then the
//! equipment row. The equipment row lock serializes concurrent
//! transitions on the same stock.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::{
            ApproveRequest, BorrowRequest, BorrowRequestDetails, BorrowRequestQuery,
            CreateBorrowRequest, RejectRequest,
        },
        enums::RequestStatus,
        equipment::{Equipment, EquipmentShort},
        user::UserShort,
    },
    services::availability::{check_capacity, committed_quantity, Reservation},
};

const DETAILS_SELECT: &str = r#"
    SELECT br.id, br.user_id, br.equipment_id, br.quantity, br.status, br.request_date,
           br.borrow_from, br.borrow_to, br.approved_date, br.issued_date, br.returned_date,
           br.purpose, br.rejection_reason, br.notes,
           u.username AS user_username, u.first_name AS user_first_name,
           u.last_name AS user_last_name, u.role AS user_role,
           e.name AS equipment_name, e.category AS equipment_category,
           e.quantity AS equipment_quantity, e.available_quantity AS equipment_available,
           a.id AS approver_id, a.username AS approver_username,
           a.first_name AS approver_first_name, a.last_name AS approver_last_name,
           a.role AS approver_role
    FROM borrow_requests br
    JOIN users u ON br.user_id = u.id
    JOIN equipment e ON br.equipment_id = e.id
    LEFT JOIN users a ON br.approved_by = a.id
"#;

#[derive(Clone)]
pub struct BorrowRequestsRepository {
    pool: Pool<Postgres>,
}

impl BorrowRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRequest> {
        sqlx::query_as::<_, BorrowRequest>("SELECT * FROM borrow_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request {} not found", id)))
    }

    /// Get borrow request with embedded user and equipment
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowRequestDetails> {
        let sql = format!("{} WHERE br.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request {} not found", id)))?;
        Ok(Self::details_from_row(&row))
    }

    /// List borrow requests with optional status/user/equipment filters,
    /// most recent first
    pub async fn list(&self, query: &BorrowRequestQuery) -> AppResult<Vec<BorrowRequestDetails>> {
        let mut conditions = vec!["1 = 1".to_string()];
        let mut idx = 0;

        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("br.status = ${}", idx));
        }
        if query.user.is_some() {
            idx += 1;
            conditions.push(format!("br.user_id = ${}", idx));
        }
        if query.equipment.is_some() {
            idx += 1;
            conditions.push(format!("br.equipment_id = ${}", idx));
        }
        let _ = idx;

        let sql = format!(
            "{} WHERE {} ORDER BY br.request_date DESC",
            DETAILS_SELECT,
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query(&sql);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(user_id) = query.user {
            builder = builder.bind(user_id);
        }
        if let Some(equipment_id) = query.equipment {
            builder = builder.bind(equipment_id);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(Self::details_from_row).collect())
    }

    /// Intervals and quantities of the approved/issued requests holding
    /// capacity on an equipment item, optionally excluding one request
    pub async fn active_reservations(
        &self,
        equipment_id: i32,
        exclude_request: Option<i32>,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT borrow_from, borrow_to, quantity
            FROM borrow_requests
            WHERE equipment_id = $1
              AND status IN ('approved', 'issued')
              AND ($2::INT IS NULL OR id != $2)
            "#,
        )
        .bind(equipment_id)
        .bind(exclude_request)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Insert a new pending request. Date and capacity validation happens
    /// in the service before this is called.
    pub async fn create(&self, user_id: i32, data: &CreateBorrowRequest) -> AppResult<BorrowRequest> {
        let request = sqlx::query_as::<_, BorrowRequest>(
            r#"
            INSERT INTO borrow_requests (user_id, equipment_id, quantity, status, borrow_from, borrow_to, purpose)
            VALUES ($1, $2, $3, 'pending', $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.equipment_id)
        .bind(data.quantity)
        .bind(data.borrow_from)
        .bind(data.borrow_to)
        .bind(&data.purpose)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    /// Approve a pending request.
    ///
    /// Re-runs the capacity check for the request's own interval under the
    /// equipment row lock, excluding the request itself, so capacity
    /// consumed by other approvals since creation is accounted for and two
    /// concurrent approvals cannot jointly over-commit stock.
    pub async fn approve(
        &self,
        id: i32,
        approver_id: i32,
        data: &ApproveRequest,
    ) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidTransition {
                action: "approve",
                status: request.status,
            });
        }

        let equipment = Self::lock_equipment(&mut tx, request.equipment_id).await?;

        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT borrow_from, borrow_to, quantity
            FROM borrow_requests
            WHERE equipment_id = $1
              AND status IN ('approved', 'issued')
              AND id != $2
            "#,
        )
        .bind(request.equipment_id)
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let committed = committed_quantity(&reservations, request.borrow_from, request.borrow_to);
        let check = check_capacity(equipment.quantity, committed, request.quantity);
        if !check.admissible {
            return Err(AppError::OverlapExceedsStock {
                remaining: check.remaining,
            });
        }

        let updated = sqlx::query_as::<_, BorrowRequest>(
            r#"
            UPDATE borrow_requests
            SET status = 'approved', approved_by = $2, approved_date = $3,
                notes = COALESCE($4, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(Utc::now())
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reject a pending request. Terminal; no counter change.
    pub async fn reject(
        &self,
        id: i32,
        approver_id: i32,
        data: &RejectRequest,
    ) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidTransition {
                action: "reject",
                status: request.status,
            });
        }

        let updated = sqlx::query_as::<_, BorrowRequest>(
            r#"
            UPDATE borrow_requests
            SET status = 'rejected', approved_by = $2, approved_date = $3,
                rejection_reason = $4, notes = COALESCE($5, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(Utc::now())
        .bind(&data.rejection_reason)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Issue an approved request: decrement the equipment counter and mark
    /// the request issued, atomically.
    pub async fn issue(&self, id: i32) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;
        if request.status != RequestStatus::Approved {
            return Err(AppError::InvalidTransition {
                action: "issue",
                status: request.status,
            });
        }

        let equipment = Self::lock_equipment(&mut tx, request.equipment_id).await?;
        if equipment.available_quantity < request.quantity {
            return Err(AppError::InsufficientStock {
                available: equipment.available_quantity,
                requested: request.quantity,
            });
        }

        sqlx::query(
            "UPDATE equipment SET available_quantity = available_quantity - $2, updated_at = $3 WHERE id = $1",
        )
        .bind(request.equipment_id)
        .bind(request.quantity)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, BorrowRequest>(
            "UPDATE borrow_requests SET status = 'issued', issued_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Return an issued request: restore the equipment counter (clamped to
    /// the total) and mark the request returned, atomically. Terminal.
    pub async fn return_equipment(&self, id: i32) -> AppResult<BorrowRequest> {
        let mut tx = self.pool.begin().await?;

        let request = Self::lock_request(&mut tx, id).await?;
        if request.status != RequestStatus::Issued {
            return Err(AppError::InvalidTransition {
                action: "return",
                status: request.status,
            });
        }

        Self::lock_equipment(&mut tx, request.equipment_id).await?;

        sqlx::query(
            r#"
            UPDATE equipment
            SET available_quantity = LEAST(quantity, available_quantity + $2), updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(request.equipment_id)
        .bind(request.quantity)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, BorrowRequest>(
            "UPDATE borrow_requests SET status = 'returned', returned_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn lock_request(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<BorrowRequest> {
        sqlx::query_as::<_, BorrowRequest>("SELECT * FROM borrow_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request {} not found", id)))
    }

    async fn lock_equipment(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    fn details_from_row(row: &sqlx::postgres::PgRow) -> BorrowRequestDetails {
        let approver = row
            .get::<Option<i32>, _>("approver_id")
            .map(|approver_id| UserShort {
                id: approver_id,
                username: row.get("approver_username"),
                first_name: row.get("approver_first_name"),
                last_name: row.get("approver_last_name"),
                role: row.get("approver_role"),
            });

        BorrowRequestDetails {
            id: row.get("id"),
            quantity: row.get("quantity"),
            status: row.get("status"),
            request_date: row.get("request_date"),
            borrow_from: row.get("borrow_from"),
            borrow_to: row.get("borrow_to"),
            approved_date: row.get("approved_date"),
            issued_date: row.get("issued_date"),
            returned_date: row.get("returned_date"),
            purpose: row.get("purpose"),
            rejection_reason: row.get("rejection_reason"),
            notes: row.get("notes"),
            user: UserShort {
                id: row.get("user_id"),
                username: row.get("user_username"),
                first_name: row.get("user_first_name"),
                last_name: row.get("user_last_name"),
                role: row.get("user_role"),
            },
            equipment: EquipmentShort {
                id: row.get("equipment_id"),
                name: row.get("equipment_name"),
                category: row.get("equipment_category"),
                quantity: row.get("equipment_quantity"),
                available_quantity: row.get("equipment_available"),
            },
            approved_by: approver,
        }
    }
}
