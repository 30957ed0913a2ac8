// src/domain/user/repository.rs
use crate::domain::errors::DomainResult;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::role::RoleName;
use crate::domain::user::entity::{NewUser, User, UserUpdate};
use crate::domain::user::value_objects::{Email, UserId, UserStatus};
use async_trait::async_trait;

/// Caller-supplied narrowing for the user listing. `search` matches name,
/// email, and company name case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<RoleName>,
    pub status: Option<UserStatus>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User>;
    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>>;
    async fn update(&self, update: UserUpdate) -> DomainResult<User>;
    async fn soft_delete(&self, id: UserId) -> DomainResult<()>;
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>>;
    /// Per-role counts over non-deleted users, for the dashboard cards.
    async fn count_by_role(&self, role: RoleName) -> DomainResult<u64>;
    async fn count_all(&self) -> DomainResult<u64>;
}
