// src/application/commands/mod.rs
pub mod clearances;
pub mod leads;
pub mod orders;
pub mod quotations;
pub mod roles;
pub mod shipments;
pub mod users;
