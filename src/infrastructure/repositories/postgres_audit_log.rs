// src/infrastructure/repositories/postgres_audit_log.rs
use super::{like_pattern, map_sqlx};
use crate::domain::audit::{AuditAction, AuditFilter, AuditLog, AuditLogRepository, NewAuditLog};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

const SELECT_LOG: &str = "SELECT a.id, a.user_id, u.name AS user_name, u.email AS user_email, \
     a.role, a.action, a.entity_type, a.entity_id, a.description, a.meta, a.ip_address, \
     a.user_agent, a.created_at \
     FROM audit_logs a \
     LEFT JOIN users u ON u.id = a.user_id";

#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: i64,
    user_id: Option<i64>,
    user_name: Option<String>,
    user_email: Option<String>,
    role: Option<String>,
    action: String,
    entity_type: Option<String>,
    entity_id: Option<i64>,
    description: Option<String>,
    meta: Option<serde_json::Value>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLog {
    type Error = DomainError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let action = AuditAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == row.action)
            .ok_or_else(|| DomainError::Persistence(format!("unknown action '{}'", row.action)))?;
        Ok(AuditLog {
            id: row.id,
            user_id: row.user_id.map(UserId::new).transpose()?,
            user_name: row.user_name,
            user_email: row.user_email,
            role: row.role,
            action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            description: row.description,
            meta: row.meta,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &AuditFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(user) = &filter.user {
        if let Ok(id) = user.parse::<i64>() {
            builder.push(" AND a.user_id = ").push_bind(id);
        } else {
            let pattern = like_pattern(user);
            builder
                .push(" AND (u.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (a.action ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.role ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.entity_type ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = &filter.role {
        // The filter arrives normalized; stored labels differ only in case.
        builder.push(" AND LOWER(a.role) = ").push_bind(role.clone());
    }
    if let Some(action) = filter.action {
        builder.push(" AND a.action = ").push_bind(action.as_str());
    }
    if let Some(on) = filter.dates.on {
        builder.push(" AND a.created_at::date = ").push_bind(on);
    }
    if let Some(from) = filter.dates.from {
        builder.push(" AND a.created_at::date >= ").push_bind(from);
    }
    if let Some(to) = filter.dates.to {
        builder.push(" AND a.created_at::date <= ").push_bind(to);
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn insert(&self, log: NewAuditLog) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO audit_logs (user_id, role, action, entity_type, entity_id, description, meta, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(log.user_id.map(i64::from))
        .bind(&log.role)
        .bind(log.action.as_str())
        .bind(&log.entity_type)
        .bind(log.entity_id)
        .bind(&log.description)
        .bind(&log.meta)
        .bind(&log.ip_address)
        .bind(&log.user_agent)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn list(&self, filter: &AuditFilter, page: PageRequest) -> DomainResult<Page<AuditLog>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM audit_logs a LEFT JOIN users u ON u.id = a.user_id",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_LOG);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY a.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<AuditLogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let logs = rows
            .into_iter()
            .map(AuditLog::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(logs, total, page))
    }

    async fn list_all(&self, filter: &AuditFilter) -> DomainResult<Vec<AuditLog>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_LOG);
        push_filters(&mut builder, filter);
        builder.push(" ORDER BY a.created_at DESC");
        let rows = builder
            .build_query_as::<AuditLogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(AuditLog::try_from).collect()
    }

    async fn action_counts(&self, filter: &AuditFilter) -> DomainResult<Vec<(String, u64)>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT a.action, COUNT(1) AS total FROM audit_logs a \
             LEFT JOIN users u ON u.id = a.user_id",
        );
        push_filters(&mut builder, filter);
        builder.push(" GROUP BY a.action");
        let rows = builder
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(action, total)| (action, total as u64))
            .collect())
    }
}
