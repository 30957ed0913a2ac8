// src/application/queries/orders.rs
use crate::application::dto::{AuthenticatedUser, OrderDto, OrderTimelineDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::{filter_status, filter_text};
use crate::application::role_gate::BACK_OFFICE_ROLES;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::order::{Order, OrderFilter, OrderId, OrderRepository};
use crate::domain::role::RoleName;
use crate::domain::user::UserId;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct OrderListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct OrderQueryService {
    order_repo: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    pub fn new(order_repo: Arc<dyn OrderRepository>) -> Self {
        Self { order_repo }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: OrderListParams,
    ) -> ApplicationResult<Page<OrderDto>> {
        let customer_scope = scope_for(actor)?;

        let filter = OrderFilter {
            search: filter_text(params.search.as_deref()),
            status: filter_status(params.status.as_deref()),
            customer_scope,
        };
        let page = self
            .order_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;
        Ok(page.map(Into::into))
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<OrderDto> {
        Ok(self.find_visible(actor, id).await?.into())
    }

    /// The timeline never loses entries; it is returned in recorded order.
    pub async fn timeline(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
    ) -> ApplicationResult<OrderTimelineDto> {
        Ok(self.find_visible(actor, id).await?.into())
    }

    async fn find_visible(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<Order> {
        let scope = scope_for(actor)?;
        let order = self
            .order_repo
            .find_by_id(OrderId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Order not found"))?;
        if let Some(customer_id) = scope
            && !order.is_owned_by(customer_id)
        {
            return Err(ApplicationError::forbidden(
                "You do not have access to this order",
            ));
        }
        Ok(order)
    }
}

fn scope_for(actor: &AuthenticatedUser) -> ApplicationResult<Option<UserId>> {
    if BACK_OFFICE_ROLES.contains(&actor.role) {
        Ok(None)
    } else if actor.role == RoleName::Customer {
        Ok(Some(actor.id))
    } else {
        Err(ApplicationError::forbidden(format!(
            "role '{}' may not view orders",
            actor.role
        )))
    }
}
