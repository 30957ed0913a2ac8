// src/infrastructure/repositories/postgres_role.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::role::{Role, RoleId, RoleName, RoleRepository};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    slug: String,
}

impl TryFrom<RoleRow> for Role {
    type Error = DomainError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: RoleId::new(row.id)?,
            name: RoleName::from_str(&row.name)?,
            slug: row.slug,
        })
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn insert(&self, name: RoleName, slug: &str) -> DomainResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (name, slug) VALUES ($1, $2)
             RETURNING id, name, slug",
        )
        .bind(name.as_str())
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Role::try_from(row)
    }

    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name, slug FROM roles WHERE id = $1")
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Role::try_from).transpose()
    }

    async fn find_by_name(&self, name: RoleName) -> DomainResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name, slug FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(Role::try_from).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Role>> {
        let rows =
            sqlx::query_as::<_, RoleRow>("SELECT id, name, slug FROM roles ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn rename(&self, id: RoleId, name: RoleName, slug: &str) -> DomainResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            "UPDATE roles SET name = $2, slug = $3 WHERE id = $1
             RETURNING id, name, slug",
        )
        .bind(i64::from(id))
        .bind(name.as_str())
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Role::try_from(row)
    }

    async fn delete(&self, id: RoleId) -> DomainResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(())
    }

    async fn user_count(&self, id: RoleId) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM users WHERE role_id = $1 AND deleted_at IS NULL",
        )
        .bind(i64::from(id))
        .fetch_one(&self.pool)
        .await
        .map(|count| count as u64)
        .map_err(map_sqlx)
    }
}
