// src/application/queries/audit.rs
use crate::application::dto::{AuditLogCsv, AuditLogDto, AuthenticatedUser};
use crate::application::error::ApplicationResult;
use crate::application::ports::time::Clock;
use crate::application::queries::{date_window, filter_text};
use crate::application::role_gate::ensure_role;
use crate::domain::audit::{AuditAction, AuditFilter, AuditLog, AuditLogRepository};
use crate::domain::listing::{Page, PageRequest, zero_filled_stats};
use crate::domain::role::{RoleName, normalize_role_name};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AuditListParams {
    pub user: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub action: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub include_stats: bool,
}

#[derive(Debug, Clone)]
pub struct AuditListing {
    pub page: Page<AuditLogDto>,
    pub stats: Option<BTreeMap<String, u64>>,
}

pub struct AuditQueryService {
    audit_repo: Arc<dyn AuditLogRepository>,
    clock: Arc<dyn Clock>,
}

impl AuditQueryService {
    pub fn new(audit_repo: Arc<dyn AuditLogRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { audit_repo, clock }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: AuditListParams,
    ) -> ApplicationResult<AuditListing> {
        ensure_role(actor, &[RoleName::Admin])?;
        let filter = build_filter(&params);

        let stats = if params.include_stats {
            let counts = self.audit_repo.action_counts(&filter).await?;
            let known: Vec<&str> = AuditAction::ALL.iter().map(AuditAction::as_str).collect();
            Some(zero_filled_stats(&known, counts))
        } else {
            None
        };

        let page = self
            .audit_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;

        Ok(AuditListing {
            page: page.map(Into::into),
            stats,
        })
    }

    /// Renders the filtered trail, unpaginated, as a CSV attachment.
    pub async fn export_csv(
        &self,
        actor: &AuthenticatedUser,
        params: AuditListParams,
    ) -> ApplicationResult<AuditLogCsv> {
        ensure_role(actor, &[RoleName::Admin])?;
        let filter = build_filter(&params);
        let logs = self.audit_repo.list_all(&filter).await?;

        let mut body = String::from(
            "Timestamp,User Name,User Email,Role,Action,Resource,Details,IP Address,User Agent\n",
        );
        for log in &logs {
            let row = [
                log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                log.user_name.clone().unwrap_or_default(),
                log.user_email.clone().unwrap_or_default(),
                log.role.clone().unwrap_or_default(),
                log.action.as_str().to_string(),
                resource_label(log),
                log.description.clone().unwrap_or_default(),
                log.ip_address.clone().unwrap_or_default(),
                log.user_agent.clone().unwrap_or_default(),
            ];
            let escaped: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
            body.push_str(&escaped.join(","));
            body.push('\n');
        }

        let filename = format!(
            "audit-logs-{}.csv",
            self.clock.now().format("%Y%m%d-%H%M%S")
        );
        Ok(AuditLogCsv { filename, body })
    }
}

fn build_filter(params: &AuditListParams) -> AuditFilter {
    AuditFilter {
        user: filter_text(params.user.as_deref()),
        search: filter_text(params.search.as_deref()),
        role: filter_text(params.role.as_deref()).map(|raw| normalize_role_name(&raw)),
        action: filter_text(params.action.as_deref()).and_then(|raw| {
            AuditAction::ALL
                .iter()
                .copied()
                .find(|action| action.as_str().eq_ignore_ascii_case(&raw))
        }),
        dates: date_window(
            params.date.as_deref(),
            params.date_from.as_deref(),
            params.date_to.as_deref(),
        ),
    }
}

/// `Quotation #12 (Q-2026-001)` when the row carries a document number,
/// `Quotation #12` otherwise.
fn resource_label(log: &AuditLog) -> String {
    let mut label = match (&log.entity_type, log.entity_id) {
        (Some(entity), Some(id)) => format!("{entity} #{id}"),
        (Some(entity), None) => entity.clone(),
        _ => String::new(),
    };
    if let Some(meta) = &log.meta {
        for key in ["quote_id", "order_no", "shipment_no", "clearance_no"] {
            if let Some(number) = meta.get(key).and_then(|value| value.as_str()) {
                label.push_str(&format!(" ({number})"));
                break;
            }
        }
    }
    label
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
