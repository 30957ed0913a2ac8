// src/infrastructure/repositories/postgres_shipment.rs
use super::{like_pattern, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::order::OrderId;
use crate::domain::shipment::{
    NewShipment, NewShipmentDocument, Shipment, ShipmentDocument, ShipmentFilter, ShipmentId,
    ShipmentRepository, ShipmentStatus,
};
use crate::domain::user::UserId;
use crate::domain::workflow::EntityStatus;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_SHIPMENT: &str = "SELECT s.id, s.shipment_no, s.order_id, s.customer_id, \
     o.customer_id AS order_customer_id, s.origin, s.destination, s.carrier_name, \
     s.tracking_no, s.eta, s.status, s.notes, s.created_at \
     FROM shipments s \
     JOIN orders o ON o.id = s.order_id \
     LEFT JOIN users cu ON cu.id = COALESCE(s.customer_id, o.customer_id)";

#[derive(Clone)]
pub struct PostgresShipmentRepository {
    pool: PgPool,
}

impl PostgresShipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> DomainResult<Option<Shipment>> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!("{SELECT_SHIPMENT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Shipment::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct ShipmentRow {
    id: i64,
    shipment_no: String,
    order_id: i64,
    customer_id: Option<i64>,
    order_customer_id: Option<i64>,
    origin: Option<String>,
    destination: Option<String>,
    carrier_name: Option<String>,
    tracking_no: Option<String>,
    eta: Option<NaiveDate>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = DomainError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        Ok(Shipment {
            id: ShipmentId(row.id),
            shipment_no: row.shipment_no,
            order_id: OrderId(row.order_id),
            customer_id: row.customer_id.map(UserId::new).transpose()?,
            order_customer_id: row.order_customer_id.map(UserId::new).transpose()?,
            origin: row.origin,
            destination: row.destination,
            carrier_name: row.carrier_name,
            tracking_no: row.tracking_no,
            eta: row.eta,
            status: ShipmentStatus::parse(&row.status)?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: i64,
    shipment_id: i64,
    uploaded_by: Option<i64>,
    file_name: String,
    file_path: String,
    mime_type: Option<String>,
    file_size: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for ShipmentDocument {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(ShipmentDocument {
            id: row.id,
            shipment_id: ShipmentId(row.shipment_id),
            uploaded_by: row.uploaded_by.map(UserId::new).transpose()?,
            file_name: row.file_name,
            file_path: row.file_path,
            mime_type: row.mime_type,
            file_size: row.file_size,
            created_at: row.created_at,
        })
    }
}

fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: Option<UserId>) {
    builder.push(" WHERE 1 = 1");
    if let Some(customer_id) = scope {
        builder
            .push(" AND COALESCE(s.customer_id, o.customer_id) = ")
            .push_bind(i64::from(customer_id));
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ShipmentFilter) {
    push_scope(builder, filter.customer_scope);
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (s.shipment_no ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.tracking_no ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.carrier_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.origin ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.destination ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cu.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cu.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND s.status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl ShipmentRepository for PostgresShipmentRepository {
    async fn insert(&self, new_shipment: NewShipment) -> DomainResult<Shipment> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO shipments (shipment_no, order_id, customer_id, origin, destination, carrier_name, tracking_no, eta, status, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(&new_shipment.shipment_no)
        .bind(i64::from(new_shipment.order_id))
        .bind(new_shipment.customer_id.map(i64::from))
        .bind(&new_shipment.origin)
        .bind(&new_shipment.destination)
        .bind(&new_shipment.carrier_name)
        .bind(&new_shipment.tracking_no)
        .bind(new_shipment.eta)
        .bind(new_shipment.status.as_str())
        .bind(&new_shipment.notes)
        .bind(new_shipment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Persistence("inserted shipment vanished".into()))
    }

    async fn find_by_id(&self, id: ShipmentId) -> DomainResult<Option<Shipment>> {
        self.fetch_by_id(i64::from(id)).await
    }

    async fn update_status(
        &self,
        id: ShipmentId,
        status: ShipmentStatus,
    ) -> DomainResult<Shipment> {
        sqlx::query("UPDATE shipments SET status = $2 WHERE id = $1")
            .bind(i64::from(id))
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        self.fetch_by_id(i64::from(id))
            .await?
            .ok_or_else(|| DomainError::NotFound("shipment not found".into()))
    }

    async fn list(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Shipment>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM shipments s \
             JOIN orders o ON o.id = s.order_id \
             LEFT JOIN users cu ON cu.id = COALESCE(s.customer_id, o.customer_id)",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_SHIPMENT);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY s.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<ShipmentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let shipments = rows
            .into_iter()
            .map(Shipment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(shipments, total, page))
    }

    async fn status_counts(&self, scope: Option<UserId>) -> DomainResult<Vec<(String, u64)>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT s.status, COUNT(1) AS total FROM shipments s \
             JOIN orders o ON o.id = s.order_id",
        );
        push_scope(&mut builder, scope);
        builder.push(" GROUP BY s.status");
        let rows = builder
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(status, total)| (status, total as u64))
            .collect())
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM shipments WHERE EXTRACT(YEAR FROM created_at)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }

    async fn add_document(&self, document: NewShipmentDocument) -> DomainResult<ShipmentDocument> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO shipment_documents (shipment_id, uploaded_by, file_name, file_path, mime_type, file_size)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, shipment_id, uploaded_by, file_name, file_path, mime_type, file_size, created_at",
        )
        .bind(i64::from(document.shipment_id))
        .bind(document.uploaded_by.map(i64::from))
        .bind(&document.file_name)
        .bind(&document.file_path)
        .bind(&document.mime_type)
        .bind(document.file_size)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        ShipmentDocument::try_from(row)
    }

    async fn list_documents(&self, id: ShipmentId) -> DomainResult<Vec<ShipmentDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, shipment_id, uploaded_by, file_name, file_path, mime_type, file_size, created_at
             FROM shipment_documents WHERE shipment_id = $1 ORDER BY id",
        )
        .bind(i64::from(id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(ShipmentDocument::try_from).collect()
    }
}
