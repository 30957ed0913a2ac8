// src/application/audit.rs
use crate::application::dto::{AuthenticatedUser, RequestMeta};
use crate::domain::audit::{AuditAction, AuditLogRepository, NewAuditLog};
use crate::domain::quotation::QuotationStatus;
use std::sync::Arc;

/// Fire-and-forget writer for the audit trail. A failed insert is logged
/// and swallowed; the business operation that triggered it has already
/// committed and must not be rolled back.
pub struct AuditRecorder {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditRecorder {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        actor: Option<&AuthenticatedUser>,
        meta: &RequestMeta,
        action: AuditAction,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        description: Option<String>,
        extra: Option<serde_json::Value>,
    ) {
        let log = NewAuditLog {
            user_id: actor.map(|user| user.id),
            role: actor.map(|user| user.role.as_str().to_string()),
            action,
            entity_type: entity_type.map(str::to_string),
            entity_id,
            description,
            meta: extra,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        };

        if let Err(err) = self.repo.insert(log).await {
            tracing::warn!(error = %err, action = action.as_str(), "audit log write failed");
        }
    }
}

/// Quotation transitions log a status-specific verb; everything else is an
/// update.
pub fn action_for_quotation_status(status: QuotationStatus) -> AuditAction {
    match status {
        QuotationStatus::Approved => AuditAction::Approve,
        QuotationStatus::Rejected => AuditAction::Reject,
        QuotationStatus::Sent => AuditAction::Send,
        QuotationStatus::Draft | QuotationStatus::ChangesRequested => AuditAction::Update,
    }
}
