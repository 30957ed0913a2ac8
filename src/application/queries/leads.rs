// src/application/queries/leads.rs
use crate::application::dto::{AuthenticatedUser, LeadDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::{date_window, filter_status, filter_text};
use crate::application::role_gate::{BACK_OFFICE_ROLES, ensure_role};
use crate::domain::lead::{LeadFilter, LeadId, LeadRepository};
use crate::domain::listing::{Page, PageRequest};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct LeadListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct LeadQueryService {
    lead_repo: Arc<dyn LeadRepository>,
}

impl LeadQueryService {
    pub fn new(lead_repo: Arc<dyn LeadRepository>) -> Self {
        Self { lead_repo }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: LeadListParams,
    ) -> ApplicationResult<Page<LeadDto>> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;

        let filter = LeadFilter {
            search: filter_text(params.search.as_deref()),
            status: filter_status(params.status.as_deref()),
            dates: date_window(
                params.date.as_deref(),
                params.date_from.as_deref(),
                params.date_to.as_deref(),
            ),
        };
        let page = self
            .lead_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;
        Ok(page.map(Into::into))
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<LeadDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        self.lead_repo
            .find_by_id(LeadId(id))
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found("Lead not found"))
    }
}
