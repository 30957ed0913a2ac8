// src/domain/quotation.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::user::UserId;
use crate::domain::workflow::{EntityStatus, HasStatusWorkflow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    ChangesRequested,
}

impl EntityStatus for QuotationStatus {
    fn all() -> &'static [Self] {
        &[
            QuotationStatus::Draft,
            QuotationStatus::Sent,
            QuotationStatus::Approved,
            QuotationStatus::Rejected,
            QuotationStatus::ChangesRequested,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "Draft",
            QuotationStatus::Sent => "Sent",
            QuotationStatus::Approved => "Approved",
            QuotationStatus::Rejected => "Rejected",
            QuotationStatus::ChangesRequested => "ChangesRequested",
        }
    }
}

impl QuotationStatus {
    /// Statuses a customer may move an owned quotation into.
    pub const CUSTOMER_RESPONSES: [QuotationStatus; 3] = [
        QuotationStatus::Approved,
        QuotationStatus::Rejected,
        QuotationStatus::ChangesRequested,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuotationId(pub i64);

impl From<QuotationId> for i64 {
    fn from(value: QuotationId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotationItem {
    pub description: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Decimal,
}

pub const DEFAULT_ITEM_UNIT: &str = "Pieces";

impl QuotationItem {
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit: Option<String>,
        unit_price: Decimal,
    ) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::Validation(
                "item description cannot be empty".into(),
            ));
        }
        if quantity == 0 {
            return Err(DomainError::Validation(
                "item quantity must be at least 1".into(),
            ));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::Validation(
                "item unit price cannot be negative".into(),
            ));
        }
        Ok(Self {
            description,
            quantity,
            unit: unit.unwrap_or_else(|| DEFAULT_ITEM_UNIT.to_string()),
            unit_price,
        })
    }

    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Sum of line totals; the only legal value for `total_amount`.
pub fn total_amount(items: &[QuotationItem]) -> Decimal {
    items.iter().map(QuotationItem::line_total).sum()
}

#[derive(Debug, Clone)]
pub struct Quotation {
    pub id: QuotationId,
    pub quote_id: String,
    pub customer_id: UserId,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: QuotationStatus,
    pub terms_and_conditions: Option<String>,
    pub customer_note: Option<String>,
    pub total_amount: Decimal,
    pub items: Vec<QuotationItem>,
    pub created_at: DateTime<Utc>,
}

impl Quotation {
    /// Replaces the line items wholesale and recomputes the total.
    pub fn replace_items(&mut self, items: Vec<QuotationItem>) -> DomainResult<()> {
        if items.is_empty() {
            return Err(DomainError::Validation(
                "a quotation needs at least one item".into(),
            ));
        }
        self.total_amount = total_amount(&items);
        self.items = items;
        Ok(())
    }
}

impl HasStatusWorkflow for Quotation {
    type Status = QuotationStatus;

    fn status(&self) -> QuotationStatus {
        self.status
    }

    fn set_status(&mut self, status: QuotationStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub quote_id: String,
    pub customer_id: UserId,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: QuotationStatus,
    pub terms_and_conditions: Option<String>,
    pub total_amount: Decimal,
    pub items: Vec<QuotationItem>,
    pub created_at: DateTime<Utc>,
}

/// `search` matches the customer's name, email, and company name.
#[derive(Debug, Clone, Default)]
pub struct QuotationFilter {
    pub search: Option<String>,
    pub status: Option<QuotationStatus>,
    /// Restrict to quotations owned by this customer.
    pub customer_scope: Option<UserId>,
}

#[async_trait]
pub trait QuotationRepository: Send + Sync {
    async fn insert(&self, new_quotation: NewQuotation) -> DomainResult<Quotation>;
    async fn find_by_id(&self, id: QuotationId) -> DomainResult<Option<Quotation>>;
    /// Persists items and the recomputed total together.
    async fn replace_items(
        &self,
        id: QuotationId,
        items: &[QuotationItem],
        total: Decimal,
    ) -> DomainResult<Quotation>;
    async fn update_status(
        &self,
        id: QuotationId,
        status: QuotationStatus,
        customer_note: Option<&str>,
    ) -> DomainResult<Quotation>;
    async fn soft_delete(&self, id: QuotationId) -> DomainResult<()>;
    async fn list(
        &self,
        filter: &QuotationFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Quotation>>;
    /// Includes soft-deleted rows so numbers are never reissued.
    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64>;
}
