// src/application/commands/clearances.rs
use crate::application::audit::AuditRecorder;
use crate::application::dto::{AuthenticatedUser, ClearanceDocumentDto, ClearanceDto, RequestMeta};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::time::Clock;
use crate::application::role_gate::ensure_role;
use crate::domain::audit::AuditAction;
use crate::domain::clearance::{
    Clearance, ClearanceId, ClearanceRepository, ClearanceStatus, NewClearance,
    NewClearanceDocument,
};
use crate::domain::doc_number::{CLEARANCE_PREFIX, document_number};
use crate::domain::role::RoleName;
use crate::domain::shipment::{ShipmentId, ShipmentRepository};
use crate::domain::user::UserId;
use crate::domain::workflow::{self, EntityStatus};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

pub const CLEARANCE_MANAGER_ROLES: [RoleName; 2] = [RoleName::Admin, RoleName::Cha];

#[derive(Debug, Clone)]
pub struct CreateClearanceCommand {
    pub shipment_id: i64,
    pub cha_id: Option<i64>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duty_amount: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterClearanceDocumentCommand {
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

pub struct ClearanceCommandService {
    clearance_repo: Arc<dyn ClearanceRepository>,
    shipment_repo: Arc<dyn ShipmentRepository>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl ClearanceCommandService {
    pub fn new(
        clearance_repo: Arc<dyn ClearanceRepository>,
        shipment_repo: Arc<dyn ShipmentRepository>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clearance_repo,
            shipment_repo,
            audit,
            clock,
        }
    }

    pub async fn create_clearance(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateClearanceCommand,
    ) -> ApplicationResult<ClearanceDto> {
        ensure_role(actor, &CLEARANCE_MANAGER_ROLES)?;

        let mut errors = FieldErrors::new();
        if self
            .shipment_repo
            .find_by_id(ShipmentId(command.shipment_id))
            .await?
            .is_none()
        {
            errors.add("shipment_id", "The selected shipment does not exist.");
        }
        if let Some(amount) = command.duty_amount
            && amount < Decimal::ZERO
        {
            errors.add("duty_amount", "The duty amount must be at least 0.");
        }
        errors.into_result()?;

        let now = self.clock.now();
        let sequence = self
            .clearance_repo
            .count_created_in_year(now.year())
            .await?
            + 1;
        let clearance_no = document_number(CLEARANCE_PREFIX, now.year(), sequence);

        let clearance = self
            .clearance_repo
            .insert(NewClearance {
                clearance_no,
                shipment_id: ShipmentId(command.shipment_id),
                cha_id: command.cha_id.map(UserId),
                arrival_port: command.arrival_port,
                arrival_date: command.arrival_date,
                duty_amount: command.duty_amount,
                currency: command.currency.unwrap_or_else(|| "USD".to_string()),
                status: ClearanceStatus::Pending,
                created_at: now,
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("Clearance"),
                Some(clearance.id.into()),
                Some(format!("Created clearance {}", clearance.clearance_no)),
                Some(json!({ "clearance_no": clearance.clearance_no })),
            )
            .await;

        Ok(clearance.into())
    }

    /// `cleared` stamps the clearance date and `released` the released
    /// date, both with today's date; other transitions stamp nothing.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        status: &str,
    ) -> ApplicationResult<ClearanceDto> {
        ensure_role(actor, &CLEARANCE_MANAGER_ROLES)?;
        let target =
            ClearanceStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        let mut clearance = self.find_clearance(id).await?;

        let now = self.clock.now();
        workflow::transition(&mut clearance, target, None, Some(actor.id), now);
        let status_date = matches!(
            target,
            ClearanceStatus::Cleared | ClearanceStatus::Released
        )
        .then(|| now.date_naive());
        let updated = self
            .clearance_repo
            .update_status(clearance.id, target, status_date)
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Clearance"),
                Some(updated.id.into()),
                Some(format!(
                    "Updated clearance {} status to {}",
                    updated.clearance_no,
                    target.as_str()
                )),
                Some(json!({ "clearance_no": updated.clearance_no, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn register_documents(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        documents: Vec<RegisterClearanceDocumentCommand>,
    ) -> ApplicationResult<Vec<ClearanceDocumentDto>> {
        ensure_role(actor, &CLEARANCE_MANAGER_ROLES)?;
        let clearance = self.find_clearance(id).await?;

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
                .clearance_repo
                .add_document(NewClearanceDocument {
                    clearance_id: clearance.id,
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
                Some("Clearance"),
                Some(clearance.id.into()),
                Some(format!(
                    "Uploaded {} document(s) to clearance {}",
                    stored.len(),
                    clearance.clearance_no
                )),
                Some(json!({ "clearance_no": clearance.clearance_no, "documents": stored.len() })),
            )
            .await;

        Ok(stored)
    }

    async fn find_clearance(&self, id: i64) -> ApplicationResult<Clearance> {
        self.clearance_repo
            .find_by_id(ClearanceId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Clearance not found"))
    }
}
