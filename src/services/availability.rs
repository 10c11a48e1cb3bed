//! Availability ledger
//!
//! Decides whether a requested quantity of equipment fits within total
//! stock for a date range. Capacity is reserved by approved and issued
//! requests only; pending, rejected and returned requests never count.
//! The check is a linear scan over an equipment's active reservations,
//! which is plenty at this scale.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// A slice of reserved capacity: the interval and quantity of one
/// approved or issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Reservation {
    pub borrow_from: NaiveDate,
    pub borrow_to: NaiveDate,
    pub quantity: i32,
}

/// Outcome of an availability check
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Availability {
    /// Whether the candidate quantity fits within total stock
    pub admissible: bool,
    /// Units still free over the period (total minus committed)
    pub remaining: i32,
}

/// Inclusive interval overlap: each interval's start is on or before the
/// other's end.
pub fn overlaps(a_from: NaiveDate, a_to: NaiveDate, b_from: NaiveDate, b_to: NaiveDate) -> bool {
    a_from <= b_to && a_to >= b_from
}

/// Sum of quantities reserved by `reservations` that overlap `[from, to]`
pub fn committed_quantity(reservations: &[Reservation], from: NaiveDate, to: NaiveDate) -> i64 {
    reservations
        .iter()
        .filter(|r| overlaps(r.borrow_from, r.borrow_to, from, to))
        .map(|r| r.quantity as i64)
        .sum()
}

/// Whether `quantity` more units fit within `total` given `committed`
pub fn check_capacity(total: i32, committed: i64, quantity: i32) -> Availability {
    Availability {
        admissible: committed + quantity as i64 <= total as i64,
        remaining: (total as i64 - committed).max(0) as i32,
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check whether `quantity` units of an equipment item can be granted
    /// over `[from, to]` without exceeding total stock.
    ///
    /// `exclude_request` leaves one request out of the committed sum,
    /// used when re-validating an existing request against its own
    /// interval. Read-only; safe to call repeatedly.
    pub async fn check(
        &self,
        equipment_id: i32,
        from: NaiveDate,
        to: NaiveDate,
        quantity: i32,
        exclude_request: Option<i32>,
    ) -> AppResult<Availability> {
        if to < from {
            return Err(AppError::InvalidInterval);
        }

        let equipment = self.repository.equipment.get_by_id(equipment_id).await?;

        if quantity < 1 || quantity > equipment.quantity {
            return Err(AppError::QuantityExceedsStock {
                requested: quantity,
                total: equipment.quantity,
            });
        }

        let reservations = self
            .repository
            .borrow_requests
            .active_reservations(equipment_id, exclude_request)
            .await?;

        let committed = committed_quantity(&reservations, from, to);
        Ok(check_capacity(equipment.quantity, committed, quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reservation(from: NaiveDate, to: NaiveDate, quantity: i32) -> Reservation {
        Reservation {
            borrow_from: from,
            borrow_to: to,
            quantity,
        }
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = (date(2026, 3, 1), date(2026, 3, 5));
        // Touching endpoints overlap
        assert!(overlaps(a.0, a.1, date(2026, 3, 5), date(2026, 3, 10)));
        assert!(overlaps(a.0, a.1, date(2026, 2, 20), date(2026, 3, 1)));
        // Contained and containing intervals overlap
        assert!(overlaps(a.0, a.1, date(2026, 3, 2), date(2026, 3, 3)));
        assert!(overlaps(a.0, a.1, date(2026, 2, 1), date(2026, 4, 1)));
        // Disjoint intervals do not
        assert!(!overlaps(a.0, a.1, date(2026, 3, 6), date(2026, 3, 10)));
        assert!(!overlaps(a.0, a.1, date(2026, 2, 1), date(2026, 2, 28)));
    }

    #[test]
    fn test_committed_quantity_ignores_disjoint() {
        let reservations = vec![
            reservation(date(2026, 3, 1), date(2026, 3, 5), 3),
            reservation(date(2026, 3, 10), date(2026, 3, 12), 2),
        ];
        assert_eq!(
            committed_quantity(&reservations, date(2026, 3, 4), date(2026, 3, 6)),
            3
        );
        assert_eq!(
            committed_quantity(&reservations, date(2026, 3, 4), date(2026, 3, 11)),
            5
        );
        assert_eq!(
            committed_quantity(&reservations, date(2026, 3, 6), date(2026, 3, 9)),
            0
        );
    }

    #[test]
    fn test_capacity_boundary() {
        // committed + quantity == total is still admissible
        let check = check_capacity(5, 3, 2);
        assert!(check.admissible);
        assert_eq!(check.remaining, 2);

        let check = check_capacity(5, 3, 3);
        assert!(!check.admissible);
        assert_eq!(check.remaining, 2);
    }

    #[test]
    fn test_overlapping_approval_reports_remaining() {
        // total=5, one approved request for 3 over [d+1, d+5]; a second
        // request for 3 over [d+2, d+4] must not fit and leaves 2
        let reservations = vec![reservation(date(2026, 6, 2), date(2026, 6, 6), 3)];
        let committed = committed_quantity(&reservations, date(2026, 6, 3), date(2026, 6, 5));
        let check = check_capacity(5, committed, 3);
        assert!(!check.admissible);
        assert_eq!(check.remaining, 2);
    }

    #[test]
    fn test_empty_ledger_leaves_full_stock() {
        let committed = committed_quantity(&[], date(2026, 6, 3), date(2026, 6, 5));
        let check = check_capacity(5, committed, 2);
        assert!(check.admissible);
        assert_eq!(check.remaining, 5);
    }
}
