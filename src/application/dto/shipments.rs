// src/application/dto/shipments.rs
use crate::application::dto::serde_time;
use crate::domain::shipment::{Shipment, ShipmentDocument, ShipmentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentDto {
    pub id: i64,
    pub shipment_no: String,
    pub order_id: i64,
    pub customer_id: Option<i64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_no: Option<String>,
    pub eta: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<ShipmentDocumentDto>>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<Shipment> for ShipmentDto {
    fn from(shipment: Shipment) -> Self {
        Self {
            id: shipment.id.into(),
            shipment_no: shipment.shipment_no,
            order_id: shipment.order_id.into(),
            customer_id: shipment.customer_id.map(Into::into),
            origin: shipment.origin,
            destination: shipment.destination,
            carrier_name: shipment.carrier_name,
            tracking_no: shipment.tracking_no,
            eta: shipment.eta,
            status: shipment.status,
            notes: shipment.notes,
            documents: None,
            created_at: shipment.created_at,
        }
    }
}

impl ShipmentDto {
    pub fn with_documents(mut self, documents: Vec<ShipmentDocumentDto>) -> Self {
        self.documents = Some(documents);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentDocumentDto {
    pub id: i64,
    pub shipment_id: i64,
    pub uploaded_by: Option<i64>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<ShipmentDocument> for ShipmentDocumentDto {
    fn from(document: ShipmentDocument) -> Self {
        Self {
            id: document.id,
            shipment_id: document.shipment_id.into(),
            uploaded_by: document.uploaded_by.map(Into::into),
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
            created_at: document.created_at,
        }
    }
}
