// src/application/dto/leads.rs
use crate::application::dto::serde_time;
use crate::domain::lead::{Lead, LeadStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LeadDto {
    pub id: i64,
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<Decimal>,
    pub added_date: Option<NaiveDate>,
    pub last_contact: Option<NaiveDate>,
    pub status: LeadStatus,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Lead> for LeadDto {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id.into(),
            company: lead.company,
            contact: lead.contact,
            email: lead.email,
            phone: lead.phone,
            value: lead.value,
            added_date: lead.added_date,
            last_contact: lead.last_contact,
            status: lead.status,
            created_at: lead.created_at,
        }
    }
}
