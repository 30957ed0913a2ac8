// src/infrastructure/repositories/postgres_user.rs
use super::{like_pattern, map_sqlx};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Page, PageRequest};
use crate::domain::role::{RoleId, RoleName};
use crate::domain::user::{
    CompanyDetail, Email, NewUser, PasswordHash, User, UserFilter, UserId, UserRepository,
    UserStatus, UserUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;

const SELECT_USER: &str = "SELECT u.id, u.name, u.email, u.password AS password_hash, \
     u.role_id, r.name AS role_name, u.status, cd.company_name, u.created_at \
     FROM users u \
     JOIN roles r ON r.id = u.role_id \
     LEFT JOIN company_details cd ON cd.user_id = u.id";

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE u.id = $1 AND u.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role_id: i64,
    role_name: String,
    status: String,
    company_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id)?,
            name: row.name,
            email: Email::new(row.email)?,
            password_hash: PasswordHash::new(row.password_hash)?,
            role_id: RoleId::new(row.role_id)?,
            role: RoleName::from_str(&row.role_name)?,
            status: UserStatus::from_str(&row.status)?,
            company_detail: row
                .company_name
                .map(|company_name| CompanyDetail { company_name }),
            created_at: row.created_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE u.deleted_at IS NULL");
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (u.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR cd.company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = filter.role {
        builder.push(" AND r.name = ").push_bind(role.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND u.status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (name, email, password, role_id, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&new_user.name)
        .bind(new_user.email.as_str())
        .bind(new_user.password_hash.as_str())
        .bind(i64::from(new_user.role_id))
        .bind(new_user.status.as_str())
        .bind(new_user.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if let Some(detail) = &new_user.company_detail {
            sqlx::query("INSERT INTO company_details (user_id, company_name) VALUES ($1, $2)")
                .bind(id)
                .bind(&detail.company_name)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Persistence("inserted user vanished".into()))
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        self.fetch_by_id(i64::from(id)).await
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE u.email = $1 AND u.deleted_at IS NULL"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, update: UserUpdate) -> DomainResult<User> {
        let id = i64::from(update.id);
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let touches_user = update.name.is_some()
            || update.email.is_some()
            || update.role_id.is_some()
            || update.status.is_some();
        if touches_user {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
            let mut fields = builder.separated(", ");
            if let Some(name) = &update.name {
                fields.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(email) = &update.email {
                fields
                    .push("email = ")
                    .push_bind_unseparated(email.as_str().to_string());
            }
            if let Some(role_id) = update.role_id {
                fields
                    .push("role_id = ")
                    .push_bind_unseparated(i64::from(role_id));
            }
            if let Some(status) = update.status {
                fields
                    .push("status = ")
                    .push_bind_unseparated(status.as_str());
            }
            builder.push(" WHERE id = ").push_bind(id);
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }

        if let Some(detail) = &update.company_detail {
            sqlx::query("DELETE FROM company_details WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
            if let Some(detail) = detail {
                sqlx::query("INSERT INTO company_details (user_id, company_name) VALUES ($1, $2)")
                    .bind(id)
                    .bind(&detail.company_name)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx)?;
            }
        }

        tx.commit().await.map_err(map_sqlx)?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("user not found".into()))
    }

    async fn soft_delete(&self, id: UserId) -> DomainResult<()> {
        sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(())
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>> {
        let mut count_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(1) FROM users u \
             JOIN roles r ON r.id = u.role_id \
             LEFT JOIN company_details cd ON cd.user_id = u.id",
        );
        push_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)? as u64;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_USER);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY u.created_at DESC LIMIT ")
            .push_bind(i64::from(page.per_page))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(users, total, page))
    }

    async fn count_by_role(&self, role: RoleName) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM users u JOIN roles r ON r.id = u.role_id
             WHERE r.name = $1 AND u.deleted_at IS NULL",
        )
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }

    async fn count_all(&self) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map(|count| count as u64)
            .map_err(map_sqlx)
    }
}
