// src/infrastructure/repositories/postgres_quotation.rs
use super::{like_pattern, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::quotation::{
    NewQuotation, Quotation, QuotationFilter, QuotationId, QuotationItem, QuotationRepository,
    QuotationStatus,
};
use crate::domain::user::UserId;
use crate::domain::workflow::EntityStatus;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

const SELECT_QUOTATION: &str = "SELECT q.id, q.quote_id, q.customer_id, q.date, q.valid_until, \
     q.status, q.terms_and_conditions, q.customer_note, q.total_amount, q.created_at \
     FROM quotations q \
     JOIN users u ON u.id = q.customer_id \
     LEFT JOIN company_details cd ON cd.user_id = u.id";

#[derive(Clone)]
pub struct PostgresQuotationRepository {
    pool: PgPool,
}

impl PostgresQuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, quotation_ids: &[i64]) -> DomainResult<HashMap<i64, Vec<QuotationItem>>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT quotation_id, description, quantity, unit, unit_price
             FROM quotation_items WHERE quotation_id = ANY($1) ORDER BY id",
        )
        .bind(quotation_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut grouped: HashMap<i64, Vec<QuotationItem>> = HashMap::new();
        for row in rows {
            let quotation_id = row.quotation_id;
            grouped
                .entry(quotation_id)
                .or_default()
                .push(row.try_into()?);
        }
        Ok(grouped)
    }
}

#[derive(Debug, FromRow)]
struct QuotationRow {
    id: i64,
    quote_id: String,
    customer_id: i64,
    date: NaiveDate,
    valid_until: NaiveDate,
    status: String,
    terms_and_conditions: Option<String>,
    customer_note: Option<String>,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl QuotationRow {
    fn into_quotation(self, items: Vec<QuotationItem>) -> DomainResult<Quotation> {
        Ok(Quotation {
            id: QuotationId(self.id),
            quote_id: self.quote_id,
            customer_id: UserId::new(self.customer_id)?,
            date: self.date,
            valid_until: self.valid_until,
            status: QuotationStatus::parse(&self.status)?,
            terms_and_conditions: self.terms_and_conditions,
            customer_note: self.customer_note,
            total_amount: self.total_amount,
            items,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    quotation_id: i64,
    description: String,
    quantity: i32,
    unit: String,
    unit_price: Decimal,
}

impl TryFrom<ItemRow> for QuotationItem {
    type Error = DomainError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        QuotationItem::new(
            row.description,
            row.quantity.max(0) as u32,
            Some(row.unit),
            row.unit_price,
        )
    }
}

async fn insert_items(
    conn: &mut PgConnection,
    quotation_id: i64,
    items: &[QuotationItem],
) -> DomainResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO quotation_items (quotation_id, description, quantity, unit, unit_price)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(quotation_id)
        .bind(&item.description)
        .bind(item.quantity as i32)
        .bind(&item.unit)
        .bind(item.unit_price)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
    }
    Ok(())
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &QuotationFilter) {
    builder.push(" WHERE q.deleted_at IS NULL");
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (q.quote_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cd.company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND q.status = ").push_bind(status.as_str());
    }
    if let Some(customer_id) = filter.customer_scope {
        builder
            .push(" AND q.customer_id = ")
            .push_bind(i64::from(customer_id));
    }
}

#[async_trait]
impl QuotationRepository for PostgresQuotationRepository {
    async fn insert(&self, new_quotation: NewQuotation) -> DomainResult<Quotation> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let row = sqlx::query_as::<_, QuotationRow>(
            "INSERT INTO quotations (quote_id, customer_id, date, valid_until, status, terms_and_conditions, total_amount, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, quote_id, customer_id, date, valid_until, status, terms_and_conditions, customer_note, total_amount, created_at",
        )
        .bind(&new_quotation.quote_id)
        .bind(i64::from(new_quotation.customer_id))
        .bind(new_quotation.date)
        .bind(new_quotation.valid_until)
        .bind(new_quotation.status.as_str())
        .bind(&new_quotation.terms_and_conditions)
        .bind(new_quotation.total_amount)
        .bind(new_quotation.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        insert_items(&mut tx, row.id, &new_quotation.items).await?;
        tx.commit().await.map_err(map_sqlx)?;

        row.into_quotation(new_quotation.items)
    }

    async fn find_by_id(&self, id: QuotationId) -> DomainResult<Option<Quotation>> {
        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            "{SELECT_QUOTATION} WHERE q.id = $1 AND q.deleted_at IS NULL"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let Some(row) = row else { return Ok(None) };
        let mut items = self.load_items(&[row.id]).await?;
        let quotation = row.into_quotation(items.remove(&i64::from(id)).unwrap_or_default())?;
        Ok(Some(quotation))
    }

    async fn replace_items(
        &self,
        id: QuotationId,
        items: &[QuotationItem],
        total: Decimal,
    ) -> DomainResult<Quotation> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let row = sqlx::query_as::<_, QuotationRow>(
            "UPDATE quotations SET total_amount = $2 WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, quote_id, customer_id, date, valid_until, status, terms_and_conditions, customer_note, total_amount, created_at",
        )
        .bind(i64::from(id))
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query("DELETE FROM quotation_items WHERE quotation_id = $1")
            .bind(i64::from(id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        insert_items(&mut tx, row.id, items).await?;
        tx.commit().await.map_err(map_sqlx)?;

        row.into_quotation(items.to_vec())
    }

    async fn update_status(
        &self,
        id: QuotationId,
        status: QuotationStatus,
        customer_note: Option<&str>,
    ) -> DomainResult<Quotation> {
        let row = sqlx::query_as::<_, QuotationRow>(
            "UPDATE quotations
             SET status = $2, customer_note = COALESCE($3, customer_note)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, quote_id, customer_id, date, valid_until, status, terms_and_conditions, customer_note, total_amount, created_at",
        )
        .bind(i64::from(id))
        .bind(status.as_str())
        .bind(customer_note)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut items = self.load_items(&[row.id]).await?;
        row.into_quotation(items.remove(&i64::from(id)).unwrap_or_default())
    }

    async fn soft_delete(&self, id: QuotationId) -> DomainResult<()> {
        sqlx::query(
            "UPDATE quotations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(i64::from(id))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &QuotationFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Quotation>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM quotations q \
             JOIN users u ON u.id = q.customer_id \
             LEFT JOIN company_details cd ON cd.user_id = u.id",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_QUOTATION);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY q.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<QuotationRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut items = self.load_items(&ids).await?;
        let quotations = rows
            .into_iter()
            .map(|row| {
                let own = items.remove(&row.id).unwrap_or_default();
                row.into_quotation(own)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(quotations, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        // Soft-deleted rows stay in the count so document numbers are
        // never reissued.
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM quotations WHERE EXTRACT(YEAR FROM created_at)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }
}
