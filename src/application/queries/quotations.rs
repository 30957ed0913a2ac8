// src/application/queries/quotations.rs
use crate::application::dto::{AuthenticatedUser, QuotationDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::{filter_status, filter_text};
use crate::application::role_gate::BACK_OFFICE_ROLES;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::quotation::{QuotationFilter, QuotationId, QuotationRepository};
use crate::domain::role::RoleName;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct QuotationListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct QuotationQueryService {
    quotation_repo: Arc<dyn QuotationRepository>,
}

impl QuotationQueryService {
    pub fn new(quotation_repo: Arc<dyn QuotationRepository>) -> Self {
        Self { quotation_repo }
    }

    /// Back office staff see everything; a customer only their own rows.
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: QuotationListParams,
    ) -> ApplicationResult<Page<QuotationDto>> {
        let customer_scope = scope_for(actor)?;

        let filter = QuotationFilter {
            search: filter_text(params.search.as_deref()),
            status: filter_status(params.status.as_deref()),
            customer_scope,
        };
        let page = self
            .quotation_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;
        Ok(page.map(Into::into))
    }

    pub async fn get(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
    ) -> ApplicationResult<QuotationDto> {
        let scope = scope_for(actor)?;
        let quotation = self
            .quotation_repo
            .find_by_id(QuotationId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Quotation not found"))?;
        if let Some(customer_id) = scope
            && quotation.customer_id != customer_id
        {
            return Err(ApplicationError::forbidden(
                "You do not have access to this quotation",
            ));
        }
        Ok(quotation.into())
    }
}

fn scope_for(
    actor: &AuthenticatedUser,
) -> ApplicationResult<Option<crate::domain::user::UserId>> {
    if BACK_OFFICE_ROLES.contains(&actor.role) {
        Ok(None)
    } else if actor.role == RoleName::Customer {
        Ok(Some(actor.id))
    } else {
        Err(ApplicationError::forbidden(format!(
            "role '{}' may not view quotations",
            actor.role
        )))
    }
}
