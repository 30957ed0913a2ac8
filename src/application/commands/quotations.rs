// src/application/commands/quotations.rs
use crate::application::audit::{AuditRecorder, action_for_quotation_status};
use crate::application::dto::{AuthenticatedUser, QuotationDto, RequestMeta};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::time::Clock;
use crate::application::role_gate::{BACK_OFFICE_ROLES, ensure_role};
use crate::domain::audit::AuditAction;
use crate::domain::doc_number::{QUOTATION_PREFIX, document_number};
use crate::domain::quotation::{
    NewQuotation, Quotation, QuotationId, QuotationItem, QuotationRepository, QuotationStatus,
    total_amount,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::workflow::{self, EntityStatus};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QuotationItemInput {
    pub description: String,
    pub quantity: u32,
    pub unit: Option<String>,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct CreateQuotationCommand {
    pub customer_id: i64,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub terms_and_conditions: Option<String>,
    pub items: Vec<QuotationItemInput>,
}

#[derive(Debug, Clone)]
pub struct UpdateQuotationCommand {
    pub items: Vec<QuotationItemInput>,
}

pub struct QuotationCommandService {
    quotation_repo: Arc<dyn QuotationRepository>,
    user_repo: Arc<dyn UserRepository>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl QuotationCommandService {
    pub fn new(
        quotation_repo: Arc<dyn QuotationRepository>,
        user_repo: Arc<dyn UserRepository>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quotation_repo,
            user_repo,
            audit,
            clock,
        }
    }

    pub async fn create_quotation(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateQuotationCommand,
    ) -> ApplicationResult<QuotationDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;

        let mut errors = FieldErrors::new();
        if command.valid_until < command.date {
            errors.add(
                "valid_until",
                "The valid until date must be on or after the quotation date.",
            );
        }
        if self
            .user_repo
            .find_by_id(UserId(command.customer_id))
            .await?
            .is_none()
        {
            errors.add("customer_id", "The selected customer does not exist.");
        }
        let items = collect_items(&mut errors, &command.items);
        errors.into_result()?;

        let now = self.clock.now();
        let sequence = self
            .quotation_repo
            .count_created_in_year(now.year())
            .await?
            + 1;
        let quote_id = document_number(QUOTATION_PREFIX, now.year(), sequence);
        let total = total_amount(&items);

        let quotation = self
            .quotation_repo
            .insert(NewQuotation {
                quote_id,
                customer_id: UserId(command.customer_id),
                date: command.date,
                valid_until: command.valid_until,
                status: QuotationStatus::Draft,
                terms_and_conditions: command.terms_and_conditions,
                total_amount: total,
                items,
                created_at: now,
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("Quotation"),
                Some(quotation.id.into()),
                Some(format!("Created quotation {}", quotation.quote_id)),
                Some(json!({ "quote_id": quotation.quote_id })),
            )
            .await;

        Ok(quotation.into())
    }

    /// Replaces the line items wholesale; the total is recomputed server-side
    /// and a caller-supplied total is never trusted.
    pub async fn update_quotation(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        command: UpdateQuotationCommand,
    ) -> ApplicationResult<QuotationDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let mut quotation = self.find_quotation(id).await?;

        let mut errors = FieldErrors::new();
        let items = collect_items(&mut errors, &command.items);
        errors.into_result()?;

        quotation
            .replace_items(items)
            .map_err(|err| attribute_to_field("items", err))?;
        let updated = self
            .quotation_repo
            .replace_items(quotation.id, &quotation.items, quotation.total_amount)
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Quotation"),
                Some(updated.id.into()),
                Some(format!("Updated quotation {}", updated.quote_id)),
                Some(json!({ "quote_id": updated.quote_id })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        status: &str,
    ) -> ApplicationResult<QuotationDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let target =
            QuotationStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        let mut quotation = self.find_quotation(id).await?;

        workflow::transition(&mut quotation, target, None, Some(actor.id), self.clock.now());
        let updated = self
            .quotation_repo
            .update_status(quotation.id, target, None)
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                action_for_quotation_status(target),
                Some("Quotation"),
                Some(updated.id.into()),
                Some(format!(
                    "Updated quotation {} status to {}",
                    updated.quote_id,
                    target.as_str()
                )),
                Some(json!({ "quote_id": updated.quote_id, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    /// A customer answering a quotation sent to them. Ownership is checked
    /// before anything else, and only the three response statuses are open
    /// to them.
    pub async fn respond(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        status: &str,
        customer_note: Option<String>,
    ) -> ApplicationResult<QuotationDto> {
        let mut quotation = self.find_quotation(id).await?;
        if quotation.customer_id != actor.id {
            return Err(ApplicationError::forbidden(
                "You do not have access to this quotation",
            ));
        }

        let target =
            QuotationStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        if !QuotationStatus::CUSTOMER_RESPONSES.contains(&target) {
            return Err(ApplicationError::forbidden(
                "Customers may only approve, reject, or request changes",
            ));
        }

        workflow::transition(&mut quotation, target, None, Some(actor.id), self.clock.now());
        let updated = self
            .quotation_repo
            .update_status(quotation.id, target, customer_note.as_deref())
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                action_for_quotation_status(target),
                Some("Quotation"),
                Some(updated.id.into()),
                Some(format!(
                    "Responded to quotation {} with {}",
                    updated.quote_id,
                    target.as_str()
                )),
                Some(json!({ "quote_id": updated.quote_id, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn delete_quotation(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
    ) -> ApplicationResult<()> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let quotation = self.find_quotation(id).await?;

        self.quotation_repo.soft_delete(quotation.id).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Delete,
                Some("Quotation"),
                Some(quotation.id.into()),
                Some(format!("Deleted quotation {}", quotation.quote_id)),
                Some(json!({ "quote_id": quotation.quote_id })),
            )
            .await;

        Ok(())
    }

    async fn find_quotation(&self, id: i64) -> ApplicationResult<Quotation> {
        self.quotation_repo
            .find_by_id(QuotationId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Quotation not found"))
    }
}

fn collect_items(errors: &mut FieldErrors, inputs: &[QuotationItemInput]) -> Vec<QuotationItem> {
    if inputs.is_empty() {
        errors.add("items", "A quotation needs at least one item.");
        return Vec::new();
    }
    let mut items = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match QuotationItem::new(
            input.description.clone(),
            input.quantity,
            input.unit.clone(),
            input.unit_price,
        ) {
            Ok(item) => items.push(item),
            Err(err) => errors.add(format!("items.{index}"), err.to_string()),
        }
    }
    items
}
