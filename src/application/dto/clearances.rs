// src/application/dto/clearances.rs
use crate::application::dto::serde_time;
use crate::domain::clearance::{Clearance, ClearanceDocument, ClearanceStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClearanceDto {
    pub id: i64,
    pub clearance_no: String,
    pub shipment_id: i64,
    pub cha_id: Option<i64>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duty_amount: Option<Decimal>,
    pub currency: String,
    pub status: ClearanceStatus,
    pub clearance_date: Option<NaiveDate>,
    pub released_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<ClearanceDocumentDto>>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Clearance> for ClearanceDto {
    fn from(clearance: Clearance) -> Self {
        Self {
            id: clearance.id.into(),
            clearance_no: clearance.clearance_no,
            shipment_id: clearance.shipment_id.into(),
            cha_id: clearance.cha_id.map(Into::into),
            arrival_port: clearance.arrival_port,
            arrival_date: clearance.arrival_date,
            duty_amount: clearance.duty_amount,
            currency: clearance.currency,
            status: clearance.status,
            clearance_date: clearance.clearance_date,
            released_date: clearance.released_date,
            documents: None,
            created_at: clearance.created_at,
        }
    }
}

impl ClearanceDto {
    pub fn with_documents(mut self, documents: Vec<ClearanceDocumentDto>) -> Self {
        self.documents = Some(documents);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearanceDocumentDto {
    pub id: i64,
    pub clearance_id: i64,
    pub uploaded_by: Option<i64>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<ClearanceDocument> for ClearanceDocumentDto {
    fn from(document: ClearanceDocument) -> Self {
        Self {
            id: document.id,
            clearance_id: document.clearance_id.into(),
            uploaded_by: document.uploaded_by.map(Into::into),
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
            created_at: document.created_at,
        }
    }
}
