// src/application/queries/clearances.rs
use crate::application::dto::{AuthenticatedUser, ClearanceDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::{filter_status, filter_text};
use crate::domain::clearance::{ClearanceFilter, ClearanceId, ClearanceRepository};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::role::RoleName;
use crate::domain::user::UserId;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ClearanceListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct ClearanceQueryService {
    clearance_repo: Arc<dyn ClearanceRepository>,
}

impl ClearanceQueryService {
    pub fn new(clearance_repo: Arc<dyn ClearanceRepository>) -> Self {
        Self { clearance_repo }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: ClearanceListParams,
    ) -> ApplicationResult<Page<ClearanceDto>> {
        let customer_scope = scope_for(actor)?;

        let filter = ClearanceFilter {
            search: filter_text(params.search.as_deref()),
            status: filter_status(params.status.as_deref()),
            customer_scope,
        };
        let page = self
            .clearance_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;
        Ok(page.map(Into::into))
    }

    pub async fn get(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
    ) -> ApplicationResult<ClearanceDto> {
        let scope = scope_for(actor)?;
        let clearance = self
            .clearance_repo
            .find_by_id(ClearanceId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Clearance not found"))?;
        if let Some(customer_id) = scope
            && !clearance.is_owned_by(customer_id)
        {
            return Err(ApplicationError::forbidden(
                "You do not have access to this clearance",
            ));
        }
        let documents = self
            .clearance_repo
            .list_documents(clearance.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(ClearanceDto::from(clearance).with_documents(documents))
    }
}

fn scope_for(actor: &AuthenticatedUser) -> ApplicationResult<Option<UserId>> {
    match actor.role {
        RoleName::Admin | RoleName::Cha => Ok(None),
        RoleName::Customer => Ok(Some(actor.id)),
        other => Err(ApplicationError::forbidden(format!(
            "role '{other}' may not view clearances"
        ))),
    }
}
