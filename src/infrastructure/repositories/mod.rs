// src/infrastructure/repositories/mod.rs
mod postgres_audit_log;
mod postgres_clearance;
mod postgres_lead;
mod postgres_order;
mod postgres_quotation;
mod postgres_role;
mod postgres_shipment;
mod postgres_user;

pub use postgres_audit_log::PostgresAuditLogRepository;
pub use postgres_clearance::PostgresClearanceRepository;
pub use postgres_lead::PostgresLeadRepository;
pub use postgres_order::PostgresOrderRepository;
pub use postgres_quotation::PostgresQuotationRepository;
pub use postgres_role::PostgresRoleRepository;
pub use postgres_shipment::PostgresShipmentRepository;
pub use postgres_user::PostgresUserRepository;

use crate::domain::errors::DomainError;

pub(crate) fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound("row not found".into()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict("a record with the same unique value already exists".into())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DomainError::Conflict("the record is referenced by other rows".into())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

/// `ILIKE '%term%'` pattern with the LIKE metacharacters in the user's
/// input escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
