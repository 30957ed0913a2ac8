// src/application/queries/users.rs
use crate::application::dto::{AuthenticatedUser, UserDto, UserStatsDto};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::queries::filter_text;
use crate::application::role_gate::ensure_role;
use crate::domain::listing::{Page, PageRequest};
use crate::domain::role::RoleName;
use crate::domain::user::{UserFilter, UserId, UserRepository, UserStatus};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub include_stats: bool,
}

#[derive(Debug, Clone)]
pub struct UserListing {
    pub page: Page<UserDto>,
    pub stats: Option<UserStatsDto>,
}

pub struct UserQueryService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserQueryService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: UserListParams,
    ) -> ApplicationResult<UserListing> {
        ensure_role(actor, &[RoleName::Admin])?;

        let stats = if params.include_stats {
            let total = self.user_repo.count_all().await?;
            let mut counts = Vec::with_capacity(RoleName::ALL.len());
            for role in RoleName::ALL {
                counts.push((role, self.user_repo.count_by_role(role).await?));
            }
            Some(UserStatsDto::new(total, counts))
        } else {
            None
        };

        let filter = UserFilter {
            search: filter_text(params.search.as_deref()),
            role: filter_text(params.role.as_deref())
                .and_then(|raw| RoleName::from_str(&raw).ok()),
            status: filter_text(params.status.as_deref())
                .and_then(|raw| UserStatus::from_str(&raw).ok()),
        };
        let page = self
            .user_repo
            .list(&filter, PageRequest::new(params.page, params.per_page))
            .await?;

        Ok(UserListing {
            page: page.map(Into::into),
            stats,
        })
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<UserDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        self.user_repo
            .find_by_id(UserId(id))
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found("User not found"))
    }
}
