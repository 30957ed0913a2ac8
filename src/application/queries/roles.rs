// src/application/queries/roles.rs
use crate::application::dto::{AuthenticatedUser, RoleDto};
use crate::application::error::{ApplicationError, ApplicationResult, attribute_to_field};
use crate::application::role_gate::ensure_role;
use crate::domain::role::{RoleId, RoleName, RoleRepository};
use std::sync::Arc;

pub struct RoleQueryService {
    role_repo: Arc<dyn RoleRepository>,
}

impl RoleQueryService {
    pub fn new(role_repo: Arc<dyn RoleRepository>) -> Self {
        Self { role_repo }
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> ApplicationResult<Vec<RoleDto>> {
        ensure_role(actor, &[RoleName::Admin])?;
        let roles = self.role_repo.list().await?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<RoleDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        let role_id = RoleId::new(id).map_err(|err| attribute_to_field("id", err))?;
        self.role_repo
            .find_by_id(role_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found("Role not found"))
    }
}
