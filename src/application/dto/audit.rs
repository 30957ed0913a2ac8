// src/application/dto/audit.rs
use crate::application::dto::serde_time;
use crate::domain::audit::AuditLog;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogDto {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub role: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub description: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogDto {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id.map(Into::into),
            user_name: log.user_name,
            user_email: log.user_email,
            role: log.role,
            action: log.action.as_str().to_string(),
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            description: log.description,
            meta: log.meta,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            created_at: log.created_at,
        }
    }
}

/// A rendered CSV export, ready to stream back to the caller.
#[derive(Debug, Clone)]
pub struct AuditLogCsv {
    pub filename: String,
    pub body: String,
}
