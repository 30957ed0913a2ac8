// src/domain/order.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::quotation::QuotationId;
use crate::domain::user::UserId;
use crate::domain::workflow::{EntityStatus, HasStatusWorkflow, StatusTimeline};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    InTransit,
    Arrived,
    Clearance,
    Delivered,
    Cancelled,
}

impl EntityStatus for OrderStatus {
    fn all() -> &'static [Self] {
        &[
            OrderStatus::Draft,
            OrderStatus::Confirmed,
            OrderStatus::InTransit,
            OrderStatus::Arrived,
            OrderStatus::Clearance,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Arrived => "arrived",
            OrderStatus::Clearance => "clearance",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub i64);

impl From<OrderId> for i64 {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub order_no: String,
    pub customer_id: UserId,
    pub supplier_id: Option<UserId>,
    pub quotation_id: Option<QuotationId>,
    pub status: OrderStatus,
    pub status_timeline: StatusTimeline,
    pub origin_country: Option<String>,
    pub destination_port: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub currency: String,
    pub expected_arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.customer_id == user_id
    }
}

impl HasStatusWorkflow for Order {
    type Status = OrderStatus;

    fn status(&self) -> OrderStatus {
        self.status
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    fn timeline_mut(&mut self) -> Option<&mut StatusTimeline> {
        Some(&mut self.status_timeline)
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_no: String,
    pub customer_id: UserId,
    pub supplier_id: Option<UserId>,
    pub quotation_id: Option<QuotationId>,
    pub status: OrderStatus,
    pub status_timeline: StatusTimeline,
    pub origin_country: Option<String>,
    pub destination_port: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub currency: String,
    pub expected_arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `search` matches the order number plus the customer's and supplier's
/// name, email, and company name.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer_scope: Option<UserId>,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, new_order: NewOrder) -> DomainResult<Order>;
    async fn find_by_id(&self, id: OrderId) -> DomainResult<Option<Order>>;
    /// Status and timeline always change together.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        timeline: &StatusTimeline,
    ) -> DomainResult<Order>;
    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> DomainResult<Page<Order>>;
    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64>;
}
