// src/domain/role.rs
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Collapses the role spellings seen in the wild ("Back Office",
/// "back_office", "back-office") into one comparable form.
pub fn normalize_role_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    Admin,
    Customer,
    Supplier,
    Cha,
    BackOffice,
}

impl RoleName {
    pub const ALL: [RoleName; 5] = [
        RoleName::Admin,
        RoleName::Customer,
        RoleName::Supplier,
        RoleName::Cha,
        RoleName::BackOffice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "Admin",
            RoleName::Customer => "Customer",
            RoleName::Supplier => "Supplier",
            RoleName::Cha => "CHA",
            RoleName::BackOffice => "Back Office",
        }
    }

    pub fn slug(&self) -> String {
        slug::slugify(self.as_str())
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_role_name(s).as_str() {
            "admin" => Ok(RoleName::Admin),
            "customer" => Ok(RoleName::Customer),
            "supplier" => Ok(RoleName::Supplier),
            "cha" => Ok(RoleName::Cha),
            "back office" => Ok(RoleName::BackOffice),
            other => Err(DomainError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub i64);

impl RoleId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("role id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<RoleId> for i64 {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub slug: String,
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn insert(&self, name: RoleName, slug: &str) -> DomainResult<Role>;
    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>>;
    async fn find_by_name(&self, name: RoleName) -> DomainResult<Option<Role>>;
    async fn list(&self) -> DomainResult<Vec<Role>>;
    async fn rename(&self, id: RoleId, name: RoleName, slug: &str) -> DomainResult<Role>;
    async fn delete(&self, id: RoleId) -> DomainResult<()>;
    /// Count of non-deleted users still referencing the role.
    async fn user_count(&self, id: RoleId) -> DomainResult<u64>;
}
