// src/application/dto/mod.rs
pub mod audit;
pub mod clearances;
pub mod leads;
pub mod orders;
pub mod quotations;
pub mod shipments;
pub mod users;

use crate::domain::role::RoleName;
use crate::domain::user::UserId;

pub use audit::{AuditLogDto, AuditLogCsv};
pub use clearances::{ClearanceDocumentDto, ClearanceDto};
pub use leads::LeadDto;
pub use orders::{OrderDto, OrderTimelineDto, TimelineEntryDto};
pub use quotations::{QuotationDto, QuotationItemDto};
pub use shipments::{ShipmentDocumentDto, ShipmentDto};
pub use users::{RoleDto, UserDto, UserStatsDto};

/// The actor behind a request, resolved from the bearer token and passed
/// explicitly into every service call.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: RoleName,
}

/// Request origin captured for the audit trail.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub mod serde_time {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    #[allow(dead_code)]
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
