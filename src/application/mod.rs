// src/application/mod.rs
pub mod audit;
pub mod commands;
pub mod dto;
pub mod error;
pub mod ports;
pub mod queries;
pub mod role_gate;
pub mod services;

pub use error::ApplicationResult;
