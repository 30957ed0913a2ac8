// src/infrastructure/repositories/postgres_lead.rs
use super::{like_pattern, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lead::{Lead, LeadFilter, LeadId, LeadRepository, LeadStatus, LeadUpdate, NewLead};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::workflow::EntityStatus;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_LEAD: &str = "SELECT id, company, contact, email, phone, value, added_date, \
     last_contact, status, created_at FROM leads";

#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LeadRow {
    id: i64,
    company: String,
    contact: String,
    email: Option<String>,
    phone: Option<String>,
    value: Option<Decimal>,
    added_date: Option<NaiveDate>,
    last_contact: Option<NaiveDate>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = DomainError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        Ok(Lead {
            id: LeadId(row.id),
            company: row.company,
            contact: row.contact,
            email: row.email,
            phone: row.phone,
            value: row.value,
            added_date: row.added_date,
            last_contact: row.last_contact,
            status: LeadStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &LeadFilter) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (company ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR contact ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(on) = filter.dates.on {
        builder.push(" AND added_date = ").push_bind(on);
    }
    if let Some(from) = filter.dates.from {
        builder.push(" AND added_date >= ").push_bind(from);
    }
    if let Some(to) = filter.dates.to {
        builder.push(" AND added_date <= ").push_bind(to);
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn insert(&self, new_lead: NewLead) -> DomainResult<Lead> {
        let row = sqlx::query_as::<_, LeadRow>(
            "INSERT INTO leads (company, contact, email, phone, value, added_date, last_contact, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, company, contact, email, phone, value, added_date, last_contact, status, created_at",
        )
        .bind(&new_lead.company)
        .bind(&new_lead.contact)
        .bind(&new_lead.email)
        .bind(&new_lead.phone)
        .bind(new_lead.value)
        .bind(new_lead.added_date)
        .bind(new_lead.last_contact)
        .bind(new_lead.status.as_str())
        .bind(new_lead.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Lead::try_from(row)
    }

    async fn find_by_id(&self, id: LeadId) -> DomainResult<Option<Lead>> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "{SELECT_LEAD} WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Lead::try_from).transpose()
    }

    async fn update(&self, update: LeadUpdate) -> DomainResult<Lead> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE leads SET ");
        let mut fields = builder.separated(", ");
        let mut touched = false;
        if let Some(company) = &update.company {
            fields.push("company = ").push_bind_unseparated(company.clone());
            touched = true;
        }
        if let Some(contact) = &update.contact {
            fields.push("contact = ").push_bind_unseparated(contact.clone());
            touched = true;
        }
        if let Some(email) = &update.email {
            fields.push("email = ").push_bind_unseparated(email.clone());
            touched = true;
        }
        if let Some(phone) = &update.phone {
            fields.push("phone = ").push_bind_unseparated(phone.clone());
            touched = true;
        }
        if let Some(value) = &update.value {
            fields.push("value = ").push_bind_unseparated(*value);
            touched = true;
        }
        if let Some(added_date) = &update.added_date {
            fields.push("added_date = ").push_bind_unseparated(*added_date);
            touched = true;
        }
        if let Some(last_contact) = &update.last_contact {
            fields
                .push("last_contact = ")
                .push_bind_unseparated(*last_contact);
            touched = true;
        }
        if let Some(status) = update.status {
            fields.push("status = ").push_bind_unseparated(status.as_str());
            touched = true;
        }
        if !touched {
            return self
                .find_by_id(update.id)
                .await?
                .ok_or_else(|| DomainError::NotFound("lead not found".into()));
        }

        builder
            .push(" WHERE id = ")
            .push_bind(i64::from(update.id))
            .push(" AND deleted_at IS NULL RETURNING id, company, contact, email, phone, value, added_date, last_contact, status, created_at");
        let row = builder
            .build_query_as::<LeadRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Lead::try_from(row)
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> DomainResult<Lead> {
        let row = sqlx::query_as::<_, LeadRow>(
            "UPDATE leads SET status = $2 WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, company, contact, email, phone, value, added_date, last_contact, status, created_at",
        )
        .bind(i64::from(id))
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Lead::try_from(row)
    }

    async fn soft_delete(&self, id: LeadId) -> DomainResult<()> {
        sqlx::query("UPDATE leads SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(())
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> DomainResult<Page<Lead>> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(1) FROM leads");
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_LEAD);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<LeadRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let leads = rows
            .into_iter()
            .map(Lead::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(leads, total, page))
    }
}
