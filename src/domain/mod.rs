// src/domain/mod.rs
pub mod audit;
pub mod clearance;
pub mod doc_number;
pub mod errors;
pub mod lead;
pub mod listing;
pub mod order;
pub mod quotation;
pub mod role;
pub mod shipment;
pub mod user;
pub mod workflow;
