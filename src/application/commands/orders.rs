// src/application/commands/orders.rs
use crate::application::audit::AuditRecorder;
use crate::application::dto::{AuthenticatedUser, OrderDto, RequestMeta};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::time::Clock;
use crate::application::role_gate::{BACK_OFFICE_ROLES, ensure_role};
use crate::domain::audit::AuditAction;
use crate::domain::doc_number::{ORDER_PREFIX, document_number};
use crate::domain::order::{NewOrder, Order, OrderId, OrderRepository, OrderStatus};
use crate::domain::quotation::{QuotationId, QuotationRepository};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::workflow::{self, EntityStatus, StatusTimeline, timeline_entry};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub customer_id: i64,
    pub supplier_id: Option<i64>,
    pub quotation_id: Option<i64>,
    pub origin_country: Option<String>,
    pub destination_port: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub currency: Option<String>,
    pub expected_arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct OrderCommandService {
    order_repo: Arc<dyn OrderRepository>,
    quotation_repo: Arc<dyn QuotationRepository>,
    user_repo: Arc<dyn UserRepository>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl OrderCommandService {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        quotation_repo: Arc<dyn QuotationRepository>,
        user_repo: Arc<dyn UserRepository>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_repo,
            quotation_repo,
            user_repo,
            audit,
            clock,
        }
    }

    /// New orders start in `draft` with a single seeded timeline entry.
    pub async fn create_order(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateOrderCommand,
    ) -> ApplicationResult<OrderDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;

        let mut errors = FieldErrors::new();
        if self
            .user_repo
            .find_by_id(UserId(command.customer_id))
            .await?
            .is_none()
        {
            errors.add("customer_id", "The selected customer does not exist.");
        }
        if let Some(supplier_id) = command.supplier_id
            && self.user_repo.find_by_id(UserId(supplier_id)).await?.is_none()
        {
            errors.add("supplier_id", "The selected supplier does not exist.");
        }
        if let Some(quotation_id) = command.quotation_id
            && self
                .quotation_repo
                .find_by_id(QuotationId(quotation_id))
                .await?
                .is_none()
        {
            errors.add("quotation_id", "The selected quotation does not exist.");
        }
        if let Some(value) = command.invoice_value
            && value < Decimal::ZERO
        {
            errors.add("invoice_value", "The invoice value must be at least 0.");
        }
        errors.into_result()?;

        let now = self.clock.now();
        let sequence = self.order_repo.count_created_in_year(now.year()).await? + 1;
        let order_no = document_number(ORDER_PREFIX, now.year(), sequence);

        let order = self
            .order_repo
            .insert(NewOrder {
                order_no,
                customer_id: UserId(command.customer_id),
                supplier_id: command.supplier_id.map(UserId),
                quotation_id: command.quotation_id.map(QuotationId),
                status: OrderStatus::Draft,
                status_timeline: StatusTimeline::seeded(timeline_entry(
                    OrderStatus::Draft.as_str(),
                    Some("Order created".to_string()),
                    Some(actor.id),
                    now,
                )),
                origin_country: command.origin_country,
                destination_port: command.destination_port,
                invoice_value: command.invoice_value,
                currency: command.currency.unwrap_or_else(|| "USD".to_string()),
                expected_arrival_date: command.expected_arrival_date,
                notes: command.notes,
                created_at: now,
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("Order"),
                Some(order.id.into()),
                Some(format!("Created order {}", order.order_no)),
                Some(json!({ "order_no": order.order_no })),
            )
            .await;

        Ok(order.into())
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        status: &str,
        note: Option<String>,
    ) -> ApplicationResult<OrderDto> {
        ensure_role(actor, &BACK_OFFICE_ROLES)?;
        let target =
            OrderStatus::parse(status).map_err(|err| attribute_to_field("status", err))?;
        let mut order = self.find_order(id).await?;

        workflow::transition(&mut order, target, note, Some(actor.id), self.clock.now());
        let updated = self
            .order_repo
            .update_status(order.id, target, &order.status_timeline)
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("Order"),
                Some(updated.id.into()),
                Some(format!(
                    "Updated order {} status to {}",
                    updated.order_no,
                    target.as_str()
                )),
                Some(json!({ "order_no": updated.order_no, "status": target.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    async fn find_order(&self, id: i64) -> ApplicationResult<Order> {
        self.order_repo
            .find_by_id(OrderId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Order not found"))
    }
}
