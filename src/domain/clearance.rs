// src/domain/clearance.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::shipment::ShipmentId;
use crate::domain::user::UserId;
use crate::domain::workflow::{EntityStatus, HasStatusWorkflow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceStatus {
    Pending,
    InProgress,
    Cleared,
    Released,
}

impl EntityStatus for ClearanceStatus {
    fn all() -> &'static [Self] {
        &[
            ClearanceStatus::Pending,
            ClearanceStatus::InProgress,
            ClearanceStatus::Cleared,
            ClearanceStatus::Released,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ClearanceStatus::Pending => "pending",
            ClearanceStatus::InProgress => "in_progress",
            ClearanceStatus::Cleared => "cleared",
            ClearanceStatus::Released => "released",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearanceId(pub i64);

impl From<ClearanceId> for i64 {
    fn from(value: ClearanceId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Clearance {
    pub id: ClearanceId,
    pub clearance_no: String,
    pub shipment_id: ShipmentId,
    pub cha_id: Option<UserId>,
    /// Customer resolved through the shipment (and its order), for
    /// ownership checks.
    pub shipment_customer_id: Option<UserId>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duty_amount: Option<Decimal>,
    pub currency: String,
    pub status: ClearanceStatus,
    pub clearance_date: Option<NaiveDate>,
    pub released_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Clearance {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.shipment_customer_id == Some(user_id)
    }
}

impl HasStatusWorkflow for Clearance {
    type Status = ClearanceStatus;

    fn status(&self) -> ClearanceStatus {
        self.status
    }

    fn set_status(&mut self, status: ClearanceStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
pub struct NewClearance {
    pub clearance_no: String,
    pub shipment_id: ShipmentId,
    pub cha_id: Option<UserId>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duty_amount: Option<Decimal>,
    pub currency: String,
    pub status: ClearanceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClearanceDocument {
    pub id: i64,
    pub clearance_id: ClearanceId,
    pub uploaded_by: Option<UserId>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClearanceDocument {
    pub clearance_id: ClearanceId,
    pub uploaded_by: Option<UserId>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

/// `search` matches clearance number and arrival port.
#[derive(Debug, Clone, Default)]
pub struct ClearanceFilter {
    pub search: Option<String>,
    pub status: Option<ClearanceStatus>,
    pub customer_scope: Option<UserId>,
}

#[async_trait]
pub trait ClearanceRepository: Send + Sync {
    async fn insert(&self, new_clearance: NewClearance) -> DomainResult<Clearance>;
    async fn find_by_id(&self, id: ClearanceId) -> DomainResult<Option<Clearance>>;
    /// `cleared` stamps `clearance_date`, `released` stamps
    /// `released_date`; earlier stamps are kept.
    async fn update_status(
        &self,
        id: ClearanceId,
        status: ClearanceStatus,
        status_date: Option<NaiveDate>,
    ) -> DomainResult<Clearance>;
    async fn list(
        &self,
        filter: &ClearanceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Clearance>>;
    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64>;
    async fn add_document(&self, document: NewClearanceDocument)
    -> DomainResult<ClearanceDocument>;
    async fn list_documents(&self, id: ClearanceId) -> DomainResult<Vec<ClearanceDocument>>;
}
