// src/application/commands/shipments.rs
use crate::application::audit::AuditRecorder;
use crate::application::dto::{AuthenticatedUser, RequestMeta, ShipmentDocumentDto, ShipmentDto};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::time::Clock;
use crate::application::role_gate::{ensure_role, is_admin, is_cha};
use crate::domain::audit::AuditAction;
use crate::domain::doc_number::{SHIPMENT_PREFIX, document_number};
use crate::domain::order::{OrderId, OrderRepository};
use crate::domain::role::RoleName;
use crate::domain::shipment::{
    NewShipment, NewShipmentDocument, Shipment, ShipmentId, ShipmentRepository, ShipmentStatus,
};
use crate::domain::user::UserId;
use crate::domain::workflow::{self, EntityStatus};
use chrono::{Datelike, NaiveDate};
use serde_json::json;
use std::sync::Arc;

pub const SHIPMENT_MANAGER_ROLES: [RoleName; 2] = [RoleName::Admin, RoleName::Cha];

#[derive(Debug, Clone)]
pub struct CreateShipmentCommand {
    pub order_id: i64,
    pub customer_id: Option<i64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_no: Option<String>,
    pub eta: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterDocumentCommand {
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

pub struct ShipmentCommandService {
    shipment_repo: Arc<dyn ShipmentRepository>,
    order_repo: Arc<dyn OrderRepository>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl ShipmentCommandService {
    pub fn new(
        shipment_repo: Arc<dyn ShipmentRepository>,
        order_repo: Arc<dyn OrderRepository>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shipment_repo,
            order_repo,
            audit,
            clock,
        }
    }

    pub async fn create_shipment(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateShipmentCommand,
    ) -> ApplicationResult<ShipmentDto> {
        ensure_role(actor, &SHIPMENT_MANAGER_ROLES)?;

        let mut errors = FieldErrors::new();
        let order = self.order_repo.find_by_id(OrderId(command.order_id)).await?;
        if order.is_none() {
            errors.add("order_id", "The selected order does not exist.");
        }
        let status = match command.status.as_deref() {
            Some(raw) => match ShipmentStatus::parse(raw) {
                Ok(status) => status,
                Err(err) => {
                    errors.add("status", err.to_string());
                    ShipmentStatus::InTransit
                }
            },
            None => ShipmentStatus::InTransit,
        };
        errors.into_result()?;

        let now = self.clock.now();
        let sequence = self
            .shipment_repo
            .count_created_in_year(now.year())
            .await?
            + 1;
        let shipment_no = document_number(SHIPMENT_PREFIX, now.year(), sequence);

        // Fall back to the order's customer when none is given explicitly.
        let customer_id = command
            .customer_id
            .map(UserId)
            .or_else(|| order.map(|order| order.customer_id));

        let shipment = self
            .shipment_repo
            .insert(NewShipment {
                shipment_no,
                order_id: OrderId(command.order_id),
                customer_id,
                origin: command.origin,
                destination: command.destination,
                carrier_name: command.carrier_name,
                tracking_no: command.tracking_no,
                eta: command.eta,
                status,
                notes: command.notes,
                created_at: now,
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("Shipment"),
                Some(shipment.id.into()),
                Some(format!("Created shipment {}", shipment.shipment_no)),
                Some(json!({ "shipment_no": shipment.shipment_no })),
            )
            .await;

        Ok(shipment.into())
    }

    /// Admin and CHA may move any shipment; a customer only their own.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        status: &str,
    ) -> ApplicationResult<ShipmentDto> {
        let mut shipment = self.find_shipment(id).await?;
        self.ensure_can_touch(actor, &shipment)?;

        let target =
            ShipmentStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        workflow::transition(&mut shipment, target, None, Some(actor.id), self.clock.now());
        let updated = self.shipment_repo.update_status(shipment.id, target).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Shipment"),
                Some(updated.id.into()),
                Some(format!(
                    "Updated shipment {} status to {}",
                    updated.shipment_no,
                    target.as_str()
                )),
                Some(json!({ "shipment_no": updated.shipment_no, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    /// Registers metadata for files already placed in storage by an outer
    /// layer; this service never touches blob contents.
    pub async fn register_documents(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        documents: Vec<RegisterDocumentCommand>,
    ) -> ApplicationResult<Vec<ShipmentDocumentDto>> {
        let shipment = self.find_shipment(id).await?;
        self.ensure_can_touch(actor, &shipment)?;

        let mut errors = FieldErrors::new();
        if documents.is_empty() {
            errors.add("documents", "At least one document is required.");
        }
        for (index, document) in documents.iter().enumerate() {
            if document.file_name.trim().is_empty() {
                errors.add(format!("documents.{index}.file_name"), "The file name is required.");
            }
            if document.file_path.trim().is_empty() {
                errors.add(format!("documents.{index}.file_path"), "The file path is required.");
            }
        }
        errors.into_result()?;

        let mut stored = Vec::with_capacity(documents.len());
        for document in documents {
            let saved = self
                .shipment_repo
                .add_document(NewShipmentDocument {
                    shipment_id: shipment.id,
                    uploaded_by: Some(actor.id),
                    file_name: document.file_name,
                    file_path: document.file_path,
                    mime_type: document.mime_type,
                    file_size: document.file_size,
                })
                .await?;
            stored.push(saved.into());
        }

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Shipment"),
                Some(shipment.id.into()),
                Some(format!(
                    "Uploaded {} document(s) to shipment {}",
                    stored.len(),
                    shipment.shipment_no
                )),
                Some(json!({ "shipment_no": shipment.shipment_no, "documents": stored.len() })),
            )
            .await;

        Ok(stored)
    }

    fn ensure_can_touch(
        &self,
        actor: &AuthenticatedUser,
        shipment: &Shipment,
    ) -> ApplicationResult<()> {
        if is_admin(actor) || is_cha(actor) || shipment.is_owned_by(actor.id) {
            Ok(())
        } else {
            Err(ApplicationError::forbidden(
                "You do not have access to this shipment",
            ))
        }
    }

    async fn find_shipment(&self, id: i64) -> ApplicationResult<Shipment> {
        self.shipment_repo
            .find_by_id(ShipmentId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Shipment not found"))
    }
}
