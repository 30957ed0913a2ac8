// src/infrastructure/security/token.rs
use crate::application::dto::AuthenticatedUser;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::security::TokenAuthenticator;
use crate::domain::role::RoleName;
use crate::domain::user::UserId;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Bearer tokens are stored as SHA-256 digests in `api_tokens`; the raw
/// token never touches the database. Provisioning happens out of band.
#[derive(Clone)]
pub struct PostgresTokenAuthenticator {
    pool: PgPool,
}

impl PostgresTokenAuthenticator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TokenOwnerRow {
    user_id: i64,
    name: String,
    email: String,
    role_name: String,
    status: String,
}

pub(crate) fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl TokenAuthenticator for PostgresTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let row = sqlx::query_as::<_, TokenOwnerRow>(
            "SELECT u.id AS user_id, u.name, u.email, r.name AS role_name, u.status
             FROM api_tokens t
             JOIN users u ON u.id = t.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE t.token_hash = $1 AND u.deleted_at IS NULL",
        )
        .bind(token_digest(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .ok_or_else(|| ApplicationError::unauthorized("invalid or expired token"))?;

        if row.status != "active" {
            return Err(ApplicationError::unauthorized("account is inactive"));
        }

        Ok(AuthenticatedUser {
            id: UserId::new(row.user_id)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?,
            name: row.name,
            email: row.email,
            role: RoleName::from_str(&row.role_name)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let digest = token_digest("example-token");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, token_digest("example-token"));
        assert_ne!(digest, token_digest("other-token"));
    }
}
