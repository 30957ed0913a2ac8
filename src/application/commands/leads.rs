// src/application/commands/leads.rs
use crate::application::audit::AuditRecorder;
use crate::application::dto::{AuthenticatedUser, LeadDto, RequestMeta};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::time::Clock;
use crate::application::role_gate::{BACK_OFFICE_ROLES, ensure_role};
use crate::domain::audit::AuditAction;
use crate::domain::lead::{Lead, LeadId, LeadRepository, LeadStatus, LeadUpdate, NewLead};
use crate::domain::workflow::{self, EntityStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CreateLeadCommand {
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<Decimal>,
    pub added_date: Option<NaiveDate>,
    pub last_contact: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLeadCommand {
    pub company: Option<String>,
    pub contact: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub value: Option<Option<Decimal>>,
    pub added_date: Option<Option<NaiveDate>>,
    pub last_contact: Option<Option<NaiveDate>>,
    pub status: Option<String>,
}

pub struct LeadCommandService {
    lead_repo: Arc<dyn LeadRepository>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl LeadCommandService {
    pub fn new(
        lead_repo: Arc<dyn LeadRepository>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lead_repo,
            audit,
            clock,
        }
    }

    pub async fn create_lead(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateLeadCommand,
    ) -> ApplicationResult<LeadDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;

        let mut errors = FieldErrors::new();
        validate_company(&mut errors, &command.company);
        validate_contact(&mut errors, &command.contact);
        validate_value(&mut errors, command.value.as_ref());
        let status = match command.status.as_deref() {
            Some(raw) => match LeadStatus::parse(raw) {
                Ok(status) => status,
                Err(err) => {
                    errors.add("status", err.to_string());
                    LeadStatus::New
                }
            },
            None => LeadStatus::New,
        };
        errors.into_result()?;

        let lead = self
            .lead_repo
            .insert(NewLead {
                company: command.company,
                contact: command.contact,
                email: command.email,
                phone: command.phone,
                value: command.value,
                added_date: command.added_date,
                last_contact: command.last_contact,
                status,
                created_at: self.clock.now(),
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("Lead"),
                Some(lead.id.into()),
                Some(format!("Created lead for {}", lead.company)),
                Some(json!({ "company": lead.company })),
            )
            .await;

        Ok(lead.into())
    }

    pub async fn update_lead(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        command: UpdateLeadCommand,
    ) -> ApplicationResult<LeadDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let lead = self.find_lead(id).await?;

        let mut errors = FieldErrors::new();
        if let Some(company) = &command.company {
            validate_company(&mut errors, company);
        }
        if let Some(contact) = &command.contact {
            validate_contact(&mut errors, contact);
        }
        if let Some(Some(value)) = &command.value {
            validate_value(&mut errors, Some(value));
        }
        let status = match command.status.as_deref() {
            Some(raw) => match LeadStatus::parse(raw) {
                Ok(status) => Some(status),
                Err(err) => {
                    errors.add("status", err.to_string());
                    None
                }
            },
            None => None,
        };
        errors.into_result()?;

        let update = LeadUpdate {
            id: lead.id,
            company: command.company,
            contact: command.contact,
            email: command.email,
            phone: command.phone,
            value: command.value,
            added_date: command.added_date,
            last_contact: command.last_contact,
            status,
        };
        let updated = self.lead_repo.update(update).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Lead"),
                Some(updated.id.into()),
                Some(format!("Updated lead for {}", updated.company)),
                Some(json!({ "company": updated.company })),
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
        note: Option<String>,
    ) -> ApplicationResult<LeadDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let target =
            LeadStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        let mut lead = self.find_lead(id).await?;

        workflow::transition(&mut lead, target, note, Some(actor.id), self.clock.now());
        let updated = self.lead_repo.update_status(lead.id, target).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Lead"),
                Some(updated.id.into()),
                Some(format!("Updated lead status to {}", target.as_str())),
                Some(json!({ "company": updated.company, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn delete_lead(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
    ) -> ApplicationResult<()> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let lead = self.find_lead(id).await?;

        self.lead_repo.soft_delete(lead.id).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Delete,
                Some("Lead"),
                Some(lead.id.into()),
                Some(format!("Deleted lead for {}", lead.company)),
                Some(json!({ "company": lead.company })),
            )
            .await;

        Ok(())
    }

    async fn find_lead(&self, id: i64) -> ApplicationResult<Lead> {
        self.lead_repo
            .find_by_id(LeadId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Lead not found"))
    }
}

fn validate_company(errors: &mut FieldErrors, company: &str) {
    if company.trim().is_empty() {
        errors.add("company", "The company field is required.");
    } else if company.len() > 255 {
        errors.add("company", "The company may not be greater than 255 characters.");
    }
}

fn validate_contact(errors: &mut FieldErrors, contact: &str) {
    if contact.trim().is_empty() {
        errors.add("contact", "The contact field is required.");
    } else if contact.len() > 255 {
        errors.add("contact", "The contact may not be greater than 255 characters.");
    }
}

fn validate_value(errors: &mut FieldErrors, value: Option<&Decimal>) {
    if let Some(value) = value
        && *value < Decimal::ZERO
    {
        errors.add("value", "The value must be at least 0.");
    }
}
