// src/domain/shipment.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::order::OrderId;
use crate::domain::user::UserId;
use crate::domain::workflow::{EntityStatus, HasStatusWorkflow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "Departed")]
    Departed,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Arrived at Port")]
    ArrivedAtPort,
    #[serde(rename = "Customs Clearance")]
    CustomsClearance,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl EntityStatus for ShipmentStatus {
    fn all() -> &'static [Self] {
        &[
            ShipmentStatus::Departed,
            ShipmentStatus::InTransit,
            ShipmentStatus::ArrivedAtPort,
            ShipmentStatus::CustomsClearance,
            ShipmentStatus::Delivered,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Departed => "Departed",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::ArrivedAtPort => "Arrived at Port",
            ShipmentStatus::CustomsClearance => "Customs Clearance",
            ShipmentStatus::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipmentId(pub i64);

impl From<ShipmentId> for i64 {
    fn from(value: ShipmentId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Shipment {
    pub id: ShipmentId,
    pub shipment_no: String,
    pub order_id: OrderId,
    pub customer_id: Option<UserId>,
    /// Customer on the linked order; used for ownership checks when the
    /// shipment row itself has no customer.
    pub order_customer_id: Option<UserId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_no: Option<String>,
    pub eta: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.customer_id == Some(user_id) || self.order_customer_id == Some(user_id)
    }
}

impl HasStatusWorkflow for Shipment {
    type Status = ShipmentStatus;

    fn status(&self) -> ShipmentStatus {
        self.status
    }

    fn set_status(&mut self, status: ShipmentStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
pub struct NewShipment {
    pub shipment_no: String,
    pub order_id: OrderId,
    pub customer_id: Option<UserId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_no: Option<String>,
    pub eta: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ShipmentDocument {
    pub id: i64,
    pub shipment_id: ShipmentId,
    pub uploaded_by: Option<UserId>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShipmentDocument {
    pub shipment_id: ShipmentId,
    pub uploaded_by: Option<UserId>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

/// `search` matches shipment number, tracking number, carrier, origin,
/// destination, and the customer's details one level deep.
#[derive(Debug, Clone, Default)]
pub struct ShipmentFilter {
    pub search: Option<String>,
    pub status: Option<ShipmentStatus>,
    pub customer_scope: Option<UserId>,
}

#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn insert(&self, new_shipment: NewShipment) -> DomainResult<Shipment>;
    async fn find_by_id(&self, id: ShipmentId) -> DomainResult<Option<Shipment>>;
    async fn update_status(&self, id: ShipmentId, status: ShipmentStatus)
    -> DomainResult<Shipment>;
    async fn list(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Shipment>>;
    /// Grouped status counts over the scoped base set, before any other
    /// caller filter is applied.
    async fn status_counts(&self, scope: Option<UserId>) -> DomainResult<Vec<(String, u64)>>;
    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64>;
    async fn add_document(&self, document: NewShipmentDocument) -> DomainResult<ShipmentDocument>;
    async fn list_documents(&self, id: ShipmentId) -> DomainResult<Vec<ShipmentDocument>>;
}
