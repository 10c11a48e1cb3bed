//! Borrow request lifecycle service
//!
//! Owns the path pending -> approved | rejected, approved -> issued,
//! issued -> returned. Creation gates on the availability ledger;
//! approve/issue/return delegate to the repository's transactional
//! transitions.

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::{
            ApproveRequest, BorrowRequest, BorrowRequestDetails, BorrowRequestQuery,
            CreateBorrowRequest, RejectRequest,
        },
        enums::RequestStatus,
    },
    repository::Repository,
    services::availability::AvailabilityService,
};

#[derive(Clone)]
pub struct BorrowRequestsService {
    repository: Repository,
    availability: AvailabilityService,
}

impl BorrowRequestsService {
    pub fn new(repository: Repository, availability: AvailabilityService) -> Self {
        Self {
            repository,
            availability,
        }
    }

    /// Create a new request in `pending`. No counter mutation happens
    /// here; only approval commits capacity.
    pub async fn create(&self, user_id: i32, data: &CreateBorrowRequest) -> AppResult<BorrowRequest> {
        data.validate()?;

        if data.borrow_to < data.borrow_from {
            return Err(AppError::InvalidInterval);
        }
        if data.borrow_from < Utc::now().date_naive() {
            return Err(AppError::PastStartDate);
        }

        let check = self
            .availability
            .check(
                data.equipment_id,
                data.borrow_from,
                data.borrow_to,
                data.quantity,
                None,
            )
            .await?;
        if !check.admissible {
            return Err(AppError::OverlapExceedsStock {
                remaining: check.remaining,
            });
        }

        self.repository.borrow_requests.create(user_id, data).await
    }

    /// Approve a pending request (capacity re-checked atomically)
    pub async fn approve(
        &self,
        id: i32,
        approver_id: i32,
        data: &ApproveRequest,
    ) -> AppResult<BorrowRequest> {
        self.repository.borrow_requests.approve(id, approver_id, data).await
    }

    /// Reject a pending request
    pub async fn reject(
        &self,
        id: i32,
        approver_id: i32,
        data: &RejectRequest,
    ) -> AppResult<BorrowRequest> {
        self.repository.borrow_requests.reject(id, approver_id, data).await
    }

    /// Hand out an approved request's equipment
    pub async fn issue(&self, id: i32) -> AppResult<BorrowRequest> {
        self.repository.borrow_requests.issue(id).await
    }

    /// Take an issued request's equipment back
    pub async fn return_equipment(&self, id: i32) -> AppResult<BorrowRequest> {
        self.repository.borrow_requests.return_equipment(id).await
    }

    /// Get one request with embedded user/equipment
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowRequestDetails> {
        self.repository.borrow_requests.get_details(id).await
    }

    /// List requests with filters
    pub async fn list(&self, query: &BorrowRequestQuery) -> AppResult<Vec<BorrowRequestDetails>> {
        self.repository.borrow_requests.list(query).await
    }

    /// List the requests made by one user
    pub async fn my_requests(&self, user_id: i32) -> AppResult<Vec<BorrowRequestDetails>> {
        self.repository
            .borrow_requests
            .list(&BorrowRequestQuery {
                status: None,
                user: Some(user_id),
                equipment: None,
            })
            .await
    }

    /// List requests waiting for a decision
    pub async fn pending_approvals(&self) -> AppResult<Vec<BorrowRequestDetails>> {
        self.repository
            .borrow_requests
            .list(&BorrowRequestQuery {
                status: Some(RequestStatus::Pending),
                user: None,
                equipment: None,
            })
            .await
    }
}
