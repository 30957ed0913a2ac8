// src/domain/audit.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{DateWindow, Page, PageRequest};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
    Send,
    Login,
    Logout,
}

impl AuditAction {
    pub const ALL: [AuditAction; 8] = [
        AuditAction::Create,
        AuditAction::Update,
        AuditAction::Delete,
        AuditAction::Login,
        AuditAction::Logout,
        AuditAction::Approve,
        AuditAction::Reject,
        AuditAction::Send,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "Create",
            AuditAction::Update => "Update",
            AuditAction::Delete => "Delete",
            AuditAction::Approve => "Approve",
            AuditAction::Reject => "Reject",
            AuditAction::Send => "Send",
            AuditAction::Login => "Login",
            AuditAction::Logout => "Logout",
        }
    }
}

/// One immutable row in the trail. Never updated or deleted by the
/// application.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    /// Role name at the time of the action, not the user's current role.
    pub role: Option<String>,
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub description: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub user_id: Option<UserId>,
    pub role: Option<String>,
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub description: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// `user` accepts an id or a name/email fragment; `search` spans action,
/// role, entity type, description, and the actor's name and email.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub action: Option<AuditAction>,
    pub dates: DateWindow,
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn insert(&self, log: NewAuditLog) -> DomainResult<()>;
    async fn list(&self, filter: &AuditFilter, page: PageRequest) -> DomainResult<Page<AuditLog>>;
    /// Unpaginated, for the CSV export.
    async fn list_all(&self, filter: &AuditFilter) -> DomainResult<Vec<AuditLog>>;
    async fn action_counts(&self, filter: &AuditFilter) -> DomainResult<Vec<(String, u64)>>;
}
