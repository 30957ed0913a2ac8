// src/domain/user/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{CompanyDetail, NewUser, User, UserUpdate};
pub use repository::{UserFilter, UserRepository};
pub use value_objects::{Email, PasswordHash, UserId, UserStatus};
