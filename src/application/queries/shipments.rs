// src/application/queries/shipments.rs
use crate::application::dto::{AuthenticatedUser, ShipmentDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::{filter_status, filter_text};
use crate::domain::listing::{Page, PageRequest, zero_filled_stats};
use crate::domain::role::RoleName;
use crate::domain::shipment::{ShipmentFilter, ShipmentId, ShipmentRepository, ShipmentStatus};
use crate::domain::user::UserId;
use crate::domain::workflow::EntityStatus;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ShipmentListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub include_stats: bool,
}

#[derive(Debug, Clone)]
pub struct ShipmentListing {
    pub page: Page<ShipmentDto>,
    pub stats: Option<BTreeMap<String, u64>>,
}

pub struct ShipmentQueryService {
    shipment_repo: Arc<dyn ShipmentRepository>,
}

impl ShipmentQueryService {
    pub fn new(shipment_repo: Arc<dyn ShipmentRepository>) -> Self {
        Self { shipment_repo }
    }

    /// Stats are grouped over the actor's scoped base set before the
    /// caller's own filters narrow the page, so the cards stay stable
    /// while paging or searching.
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: ShipmentListParams,
    ) -> ApplicationResult<ShipmentListing> {
        let customer_scope = scope_for(actor)?;

        let stats = if params.include_stats {
            let counts = self.shipment_repo.status_counts(customer_scope).await?;
            let known: Vec<&str> = ShipmentStatus::all()
                .iter()
                .map(EntityStatus::as_str)
                .collect();
            Some(zero_filled_stats(&known, counts))
        } else {
            None
        };

        let filter = ShipmentFilter {
            search: filter_text(params.search.as_deref()),
            status: filter_status(params.status.as_deref()),
            customer_scope,
        };
        let page = self
            .shipment_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;

        Ok(ShipmentListing {
            page: page.map(Into::into),
            stats,
        })
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<ShipmentDto> {
        let scope = scope_for(actor)?;
        let shipment = self
            .shipment_repo
            .find_by_id(ShipmentId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Shipment not found"))?;
        if let Some(customer_id) = scope
            && !shipment.is_owned_by(customer_id)
        {
            return Err(ApplicationError::forbidden(
                "You do not have access to this shipment",
            ));
        }
        let documents = self
            .shipment_repo
            .list_documents(shipment.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(ShipmentDto::from(shipment).with_documents(documents))
    }
}

fn scope_for(actor: &AuthenticatedUser) -> ApplicationResult<Option<UserId>> {
    match actor.role {
        RoleName::Admin | RoleName::Cha => Ok(None),
        RoleName::Customer => Ok(Some(actor.id)),
        other => Err(ApplicationError::forbidden(format!(
            "role '{other}' may not view shipments"
        ))),
    }
}
