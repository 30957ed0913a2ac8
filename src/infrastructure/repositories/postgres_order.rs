// src/infrastructure/repositories/postgres_order.rs
use super::{like_pattern, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::order::{NewOrder, Order, OrderFilter, OrderId, OrderRepository, OrderStatus};
use crate::domain::quotation::QuotationId;
use crate::domain::user::UserId;
use crate::domain::workflow::{EntityStatus, StatusTimeline};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_ORDER: &str = "SELECT o.id, o.order_no, o.customer_id, o.supplier_id, \
     o.quotation_id, o.status, o.status_timeline, o.origin_country, o.destination_port, \
     o.invoice_value, o.currency, o.expected_arrival_date, o.notes, o.created_at \
     FROM orders o \
     JOIN users c ON c.id = o.customer_id \
     LEFT JOIN users s ON s.id = o.supplier_id \
     LEFT JOIN company_details cd ON cd.user_id = c.id";

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    order_no: String,
    customer_id: i64,
    supplier_id: Option<i64>,
    quotation_id: Option<i64>,
    status: String,
    status_timeline: serde_json::Value,
    origin_country: Option<String>,
    destination_port: Option<String>,
    invoice_value: Option<Decimal>,
    currency: String,
    expected_arrival_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status_timeline: StatusTimeline = serde_json::from_value(row.status_timeline)
            .map_err(|err| DomainError::Persistence(format!("bad status_timeline: {err}")))?;
        Ok(Order {
            id: OrderId(row.id),
            order_no: row.order_no,
            customer_id: UserId::new(row.customer_id)?,
            supplier_id: row.supplier_id.map(UserId::new).transpose()?,
            quotation_id: row.quotation_id.map(QuotationId),
            status: OrderStatus::parse(&row.status)?,
            status_timeline,
            origin_country: row.origin_country,
            destination_port: row.destination_port,
            invoice_value: row.invoice_value,
            currency: row.currency,
            expected_arrival_date: row.expected_arrival_date,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (o.order_no ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cd.company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND o.status = ").push_bind(status.as_str());
    }
    if let Some(customer_id) = filter.customer_scope {
        builder
            .push(" AND o.customer_id = ")
            .push_bind(i64::from(customer_id));
    }
}

fn timeline_json(timeline: &StatusTimeline) -> DomainResult<serde_json::Value> {
    serde_json::to_value(timeline)
        .map_err(|err| DomainError::Persistence(format!("cannot serialize timeline: {err}")))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, new_order: NewOrder) -> DomainResult<Order> {
        let timeline = timeline_json(&new_order.status_timeline)?;
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (order_no, customer_id, supplier_id, quotation_id, status, status_timeline, origin_country, destination_port, invoice_value, currency, expected_arrival_date, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING id, order_no, customer_id, supplier_id, quotation_id, status, status_timeline, origin_country, destination_port, invoice_value, currency, expected_arrival_date, notes, created_at",
        )
        .bind(&new_order.order_no)
        .bind(i64::from(new_order.customer_id))
        .bind(new_order.supplier_id.map(i64::from))
        .bind(new_order.quotation_id.map(i64::from))
        .bind(new_order.status.as_str())
        .bind(timeline)
        .bind(&new_order.origin_country)
        .bind(&new_order.destination_port)
        .bind(new_order.invoice_value)
        .bind(&new_order.currency)
        .bind(new_order.expected_arrival_date)
        .bind(&new_order.notes)
        .bind(new_order.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Order::try_from(row)
    }

    async fn find_by_id(&self, id: OrderId) -> DomainResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE o.id = $1"))
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Order::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        timeline: &StatusTimeline,
    ) -> DomainResult<Order> {
        let timeline = timeline_json(timeline)?;
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $2, status_timeline = $3 WHERE id = $1
             RETURNING id, order_no, customer_id, supplier_id, quotation_id, status, status_timeline, origin_country, destination_port, invoice_value, currency, expected_arrival_date, notes, created_at",
        )
        .bind(i64::from(id))
        .bind(status.as_str())
        .bind(timeline)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Order::try_from(row)
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> DomainResult<Page<Order>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM orders o \
             JOIN users c ON c.id = o.customer_id \
             LEFT JOIN users s ON s.id = o.supplier_id \
             LEFT JOIN company_details cd ON cd.user_id = c.id",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_ORDER);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY o.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(orders, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM orders WHERE EXTRACT(YEAR FROM created_at)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }
}
