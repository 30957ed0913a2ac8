// src/application/dto/quotations.rs
use crate::application::dto::serde_time;
use crate::domain::quotation::{Quotation, QuotationItem, QuotationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuotationItemDto {
    pub description: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl From<QuotationItem> for QuotationItemDto {
    fn from(item: QuotationItem) -> Self {
        let total = item.line_total();
        Self {
            description: item.description,
            quantity: item.quantity,
            unit: item.unit,
            unit_price: item.unit_price,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotationDto {
    pub id: i64,
    pub quote_id: String,
    pub customer_id: i64,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: QuotationStatus,
    pub terms_and_conditions: Option<String>,
    pub customer_note: Option<String>,
    pub total_amount: Decimal,
    pub items: Vec<QuotationItemDto>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Quotation> for QuotationDto {
    fn from(quotation: Quotation) -> Self {
        Self {
            id: quotation.id.into(),
            quote_id: quotation.quote_id,
            customer_id: quotation.customer_id.into(),
            date: quotation.date,
            valid_until: quotation.valid_until,
            status: quotation.status,
            terms_and_conditions: quotation.terms_and_conditions,
            customer_note: quotation.customer_note,
            total_amount: quotation.total_amount,
            items: quotation.items.into_iter().map(Into::into).collect(),
            created_at: quotation.created_at,
        }
    }
}
