// src/application/commands/roles.rs
use crate::application::dto::{AuthenticatedUser, RoleDto};
use crate::application::error::{ApplicationError, ApplicationResult, attribute_to_field};
use crate::application::role_gate::ensure_role;
use crate::domain::role::{Role, RoleId, RoleName, RoleRepository};
use std::str::FromStr;
use std::sync::Arc;

pub struct RoleCommandService {
    role_repo: Arc<dyn RoleRepository>,
}

impl RoleCommandService {
    pub fn new(role_repo: Arc<dyn RoleRepository>) -> Self {
        Self { role_repo }
    }

    /// Registers one of the known roles. Spelling variants normalize to
    /// the same role, so "back_office" and "Back Office" collide.
    pub async fn create_role(
        &self,
        actor: &AuthenticatedUser,
        name: &str,
    ) -> ApplicationResult<RoleDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        let name =
            RoleName::from_str(name).map_err(|err| attribute_to_field("name", err))?;
        if self.role_repo.find_by_name(name).await?.is_some() {
            return Err(ApplicationError::invalid(
                "name",
                "The name has already been taken.",
            ));
        }
        let role = self.role_repo.insert(name, &name.slug()).await?;
        Ok(role.into())
    }

    pub async fn rename_role(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        name: &str,
    ) -> ApplicationResult<RoleDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        let role = self.find_role(id).await?;
        let name =
            RoleName::from_str(name).map_err(|err| attribute_to_field("name", err))?;
        if let Some(existing) = self.role_repo.find_by_name(name).await?
            && existing.id != role.id
        {
            return Err(ApplicationError::invalid(
                "name",
                "The name has already been taken.",
            ));
        }
        let renamed = self.role_repo.rename(role.id, name, &name.slug()).await?;
        Ok(renamed.into())
    }

    /// Refused while any non-deleted user still holds the role.
    pub async fn delete_role(&self, actor: &AuthenticatedUser, id: i64) -> ApplicationResult<()> {
        ensure_role(actor, &[RoleName::Admin])?;
        let role = self.find_role(id).await?;
        let holders = self.role_repo.user_count(role.id).await?;
        if holders > 0 {
            return Err(ApplicationError::conflict(format!(
                "Cannot delete role '{}' because {} user(s) are assigned to it",
                role.name.as_str(),
                holders
            )));
        }
        self.role_repo.delete(role.id).await?;
        Ok(())
    }

    async fn find_role(&self, id: i64) -> ApplicationResult<Role> {
        let role_id = RoleId::new(id).map_err(|err| attribute_to_field("id", err))?;
        self.role_repo
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role not found"))
    }
}
