// src/presentation/http/controllers/mod.rs
pub mod audit;
pub mod clearances;
pub mod leads;
pub mod orders;
pub mod quotations;
pub mod roles;
pub mod shipments;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Distinguishes "field absent" from "field explicitly null" in PATCH-style
/// payloads: missing stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
