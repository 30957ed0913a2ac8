// src/domain/lead.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{DateWindow, Page, PageRequest};
use crate::domain::workflow::{EntityStatus, HasStatusWorkflow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
}

impl EntityStatus for LeadStatus {
    fn all() -> &'static [Self] {
        &[
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Converted,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeadId(pub i64);

impl From<LeadId> for i64 {
    fn from(value: LeadId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Lead {
    pub id: LeadId,
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<Decimal>,
    pub added_date: Option<NaiveDate>,
    pub last_contact: Option<NaiveDate>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl HasStatusWorkflow for Lead {
    type Status = LeadStatus;

    fn status(&self) -> LeadStatus {
        self.status
    }

    fn set_status(&mut self, status: LeadStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<Decimal>,
    pub added_date: Option<NaiveDate>,
    pub last_contact: Option<NaiveDate>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LeadUpdate {
    pub id: LeadId,
    pub company: Option<String>,
    pub contact: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub value: Option<Option<Decimal>>,
    pub added_date: Option<Option<NaiveDate>>,
    pub last_contact: Option<Option<NaiveDate>>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    pub fn new(id: LeadId) -> Self {
        Self {
            id,
            company: None,
            contact: None,
            email: None,
            phone: None,
            value: None,
            added_date: None,
            last_contact: None,
            status: None,
        }
    }
}

/// `search` matches company, contact, email, and phone; the date window is
/// evaluated against `added_date`.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub dates: DateWindow,
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, new_lead: NewLead) -> DomainResult<Lead>;
    async fn find_by_id(&self, id: LeadId) -> DomainResult<Option<Lead>>;
    async fn update(&self, update: LeadUpdate) -> DomainResult<Lead>;
    async fn update_status(&self, id: LeadId, status: LeadStatus) -> DomainResult<Lead>;
    async fn soft_delete(&self, id: LeadId) -> DomainResult<()>;
    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> DomainResult<Page<Lead>>;
}
