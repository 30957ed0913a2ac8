// src/application/dto/orders.rs
use crate::application::dto::serde_time;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::workflow::TimelineEntry;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntryDto {
    pub status: String,
    pub note: Option<String>,
    #[serde(with = "serde_time")]
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<i64>,
}

impl From<&TimelineEntry> for TimelineEntryDto {
    fn from(entry: &TimelineEntry) -> Self {
        Self {
            status: entry.status.clone(),
            note: entry.note.clone(),
            changed_at: entry.changed_at,
            changed_by: entry.changed_by.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDto {
    pub id: i64,
    pub order_no: String,
    pub customer_id: i64,
    pub supplier_id: Option<i64>,
    pub quotation_id: Option<i64>,
    pub status: OrderStatus,
    pub status_timeline: Vec<TimelineEntryDto>,
    pub origin_country: Option<String>,
    pub destination_port: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub currency: String,
    pub expected_arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.into(),
            order_no: order.order_no,
            customer_id: order.customer_id.into(),
            supplier_id: order.supplier_id.map(Into::into),
            quotation_id: order.quotation_id.map(Into::into),
            status: order.status,
            status_timeline: order.status_timeline.entries().iter().map(Into::into).collect(),
            origin_country: order.origin_country,
            destination_port: order.destination_port,
            invoice_value: order.invoice_value,
            currency: order.currency,
            expected_arrival_date: order.expected_arrival_date,
            notes: order.notes,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderTimelineDto {
    pub order_id: i64,
    pub order_no: String,
    pub status: OrderStatus,
    pub timeline: Vec<TimelineEntryDto>,
}

impl From<Order> for OrderTimelineDto {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id.into(),
            order_no: order.order_no,
            status: order.status,
            timeline: order.status_timeline.entries().iter().map(Into::into).collect(),
        }
    }
}
