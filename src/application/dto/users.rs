// src/application/dto/users.rs
use crate::application::dto::serde_time;
use crate::domain::role::{Role, RoleName};
use crate::domain::user::{User, UserStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.into(),
            name: role.name.as_str().to_string(),
            slug: role.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub role_id: i64,
    pub status: UserStatus,
    pub company_name: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            name: user.name,
            email: user.email.into(),
            role: user.role.as_str().to_string(),
            role_id: user.role_id.into(),
            status: user.status,
            company_name: user.company_detail.map(|detail| detail.company_name),
            created_at: user.created_at,
        }
    }
}

/// Dashboard cards: total plus one zero-filled count per known role.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatsDto {
    pub total: u64,
    #[serde(flatten)]
    pub by_role: BTreeMap<String, u64>,
}

impl UserStatsDto {
    pub fn new(total: u64, counts: impl IntoIterator<Item = (RoleName, u64)>) -> Self {
        let mut by_role: BTreeMap<String, u64> = RoleName::ALL
            .iter()
            .map(|role| (role.slug().replace('-', "_"), 0))
            .collect();
        for (role, count) in counts {
            by_role.insert(role.slug().replace('-', "_"), count);
        }
        Self { total, by_role }
    }
}
