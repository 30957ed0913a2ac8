// src/infrastructure/repositories/postgres_clearance.rs
use super::{like_pattern, map_sqlx};
use crate::domain::clearance::{
    Clearance, ClearanceDocument, ClearanceFilter, ClearanceId, ClearanceRepository,
    ClearanceStatus, NewClearance, NewClearanceDocument,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::shipment::ShipmentId;
use crate::domain::user::UserId;
use crate::domain::workflow::EntityStatus;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_CLEARANCE: &str = "SELECT c.id, c.clearance_no, c.shipment_id, c.cha_id, \
     COALESCE(s.customer_id, o.customer_id) AS shipment_customer_id, c.arrival_port, \
     c.arrival_date, c.duty_amount, c.currency, c.status, c.clearance_date, \
     c.released_date, c.created_at \
     FROM clearances c \
     JOIN shipments s ON s.id = c.shipment_id \
     JOIN orders o ON o.id = s.order_id";

#[derive(Clone)]
pub struct PostgresClearanceRepository {
    pool: PgPool,
}

impl PostgresClearanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> DomainResult<Option<Clearance>> {
        let row =
            sqlx::query_as::<_, ClearanceRow>(&format!("{SELECT_CLEARANCE} WHERE c.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;

        row.map(Clearance::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct ClearanceRow {
    id: i64,
    clearance_no: String,
    shipment_id: i64,
    cha_id: Option<i64>,
    shipment_customer_id: Option<i64>,
    arrival_port: Option<String>,
    arrival_date: Option<NaiveDate>,
    duty_amount: Option<Decimal>,
    currency: String,
    status: String,
    clearance_date: Option<NaiveDate>,
    released_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClearanceRow> for Clearance {
    type Error = DomainError;

    fn try_from(row: ClearanceRow) -> Result<Self, Self::Error> {
        Ok(Clearance {
            id: ClearanceId(row.id),
            clearance_no: row.clearance_no,
            shipment_id: ShipmentId(row.shipment_id),
            cha_id: row.cha_id.map(UserId::new).transpose()?,
            shipment_customer_id: row.shipment_customer_id.map(UserId::new).transpose()?,
            arrival_port: row.arrival_port,
            arrival_date: row.arrival_date,
            duty_amount: row.duty_amount,
            currency: row.currency,
            status: ClearanceStatus::parse(&row.status)?,
            clearance_date: row.clearance_date,
            released_date: row.released_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: i64,
    clearance_id: i64,
    uploaded_by: Option<i64>,
    file_name: String,
    file_path: String,
    mime_type: Option<String>,
    file_size: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for ClearanceDocument {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(ClearanceDocument {
            id: row.id,
            clearance_id: ClearanceId(row.clearance_id),
            uploaded_by: row.uploaded_by.map(UserId::new).transpose()?,
            file_name: row.file_name,
            file_path: row.file_path,
            mime_type: row.mime_type,
            file_size: row.file_size,
            created_at: row.created_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ClearanceFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (c.clearance_no ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.arrival_port ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND c.status = ").push_bind(status.as_str());
    }
    if let Some(customer_id) = filter.customer_scope {
        builder
            .push(" AND COALESCE(s.customer_id, o.customer_id) = ")
            .push_bind(i64::from(customer_id));
    }
}

#[async_trait]
impl ClearanceRepository for PostgresClearanceRepository {
    async fn insert(&self, new_clearance: NewClearance) -> DomainResult<Clearance> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO clearances (clearance_no, shipment_id, cha_id, arrival_port, arrival_date, duty_amount, currency, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(&new_clearance.clearance_no)
        .bind(i64::from(new_clearance.shipment_id))
        .bind(new_clearance.cha_id.map(i64::from))
        .bind(&new_clearance.arrival_port)
        .bind(new_clearance.arrival_date)
        .bind(new_clearance.duty_amount)
        .bind(&new_clearance.currency)
        .bind(new_clearance.status.as_str())
        .bind(new_clearance.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Persistence("inserted clearance vanished".into()))
    }

    async fn find_by_id(&self, id: ClearanceId) -> DomainResult<Option<Clearance>> {
        self.fetch_by_id(i64::from(id)).await
    }

    async fn update_status(
        &self,
        id: ClearanceId,
        status: ClearanceStatus,
        status_date: Option<NaiveDate>,
    ) -> DomainResult<Clearance> {
        // Existing stamps are kept; only the date matching the new status
        // is written.
        sqlx::query(
            "UPDATE clearances SET status = $2,
                 clearance_date = CASE WHEN $2 = 'cleared' THEN COALESCE(clearance_date, $3) ELSE clearance_date END,
                 released_date = CASE WHEN $2 = 'released' THEN COALESCE(released_date, $3) ELSE released_date END
             WHERE id = $1",
        )
        .bind(i64::from(id))
        .bind(status.as_str())
        .bind(status_date)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        self.fetch_by_id(i64::from(id))
            .await?
            .ok_or_else(|| DomainError::NotFound("clearance not found".into()))
    }

    async fn list(
        &self,
        filter: &ClearanceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Clearance>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM clearances c \
             JOIN shipments s ON s.id = c.shipment_id \
             JOIN orders o ON o.id = s.order_id",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_CLEARANCE);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY c.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<ClearanceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let clearances = rows
            .into_iter()
            .map(Clearance::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(clearances, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM clearances WHERE EXTRACT(YEAR FROM created_at)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }

    async fn add_document(
        &self,
        document: NewClearanceDocument,
    ) -> DomainResult<ClearanceDocument> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO clearance_documents (clearance_id, uploaded_by, file_name, file_path, mime_type, file_size)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, clearance_id, uploaded_by, file_name, file_path, mime_type, file_size, created_at",
        )
        .bind(i64::from(document.clearance_id))
        .bind(document.uploaded_by.map(i64::from))
        .bind(&document.file_name)
        .bind(&document.file_path)
        .bind(&document.mime_type)
        .bind(document.file_size)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        ClearanceDocument::try_from(row)
    }

    async fn list_documents(&self, id: ClearanceId) -> DomainResult<Vec<ClearanceDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, clearance_id, uploaded_by, file_name, file_path, mime_type, file_size, created_at
             FROM clearance_documents WHERE clearance_id = $1 ORDER BY id",
        )
        .bind(i64::from(id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(ClearanceDocument::try_from).collect()
    }
}
