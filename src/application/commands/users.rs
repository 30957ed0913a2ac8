// src/application/commands/users.rs
use crate::application::audit::AuditRecorder;
use crate::application::dto::{AuthenticatedUser, RequestMeta, UserDto};
use crate::application::error::{ApplicationError, ApplicationResult, FieldErrors, attribute_to_field};
use crate::application::ports::security::PasswordHasher;
use crate::application::ports::time::Clock;
use crate::application::role_gate::ensure_role;
use crate::domain::audit::AuditAction;
use crate::domain::role::{Role, RoleId, RoleName, RoleRepository};
use crate::domain::user::{
    CompanyDetail, Email, NewUser, PasswordHash, User, UserId, UserRepository, UserStatus,
    UserUpdate,
};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Accepts a numeric role id or a role name in any spelling.
    pub role: String,
    pub status: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub company_name: Option<Option<String>>,
}

pub struct UserCommandService {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

impl UserCommandService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        role_repo: Arc<dyn RoleRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            password_hasher,
            audit,
            clock,
        }
    }

    pub async fn create_user(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        command: CreateUserCommand,
    ) -> ApplicationResult<UserDto> {
        ensure_role(actor, &[RoleName::Admin])?;

        let mut errors = FieldErrors::new();
        if command.name.trim().is_empty() {
            errors.add("name", "The name field is required.");
        }
        let email = match Email::new(&command.email) {
            Ok(email) => Some(email),
            Err(err) => {
                errors.add("email", err.to_string());
                None
            }
        };
        if command.password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("The password must be at least {MIN_PASSWORD_LENGTH} characters."),
            );
        }
        let role = match self.resolve_role(&command.role).await {
            Ok(role) => Some(role),
            Err(err) => {
                errors.add("role", err.to_string());
                None
            }
        };
        let status = match command.status.as_deref() {
            Some(raw) => match UserStatus::from_str(raw) {
                Ok(status) => status,
                Err(err) => {
                    errors.add("status", err.to_string());
                    UserStatus::Active
                }
            },
            None => UserStatus::Active,
        };
        if let Some(email) = &email
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            errors.add("email", "The email has already been taken.");
        }
        errors.into_result()?;

        let email = email.ok_or_else(|| ApplicationError::invalid("email", "invalid email"))?;
        let role = role.ok_or_else(|| ApplicationError::invalid("role", "invalid role"))?;

        let hash = self.password_hasher.hash(&command.password).await?;
        let user = self
            .user_repo
            .insert(NewUser {
                name: command.name.trim().to_string(),
                email,
                password_hash: PasswordHash::new(hash)
                    .map_err(|err| ApplicationError::infrastructure(err.to_string()))?,
                role_id: role.id,
                status,
                company_detail: command
                    .company_name
                    .filter(|name| !name.trim().is_empty())
                    .map(|company_name| CompanyDetail { company_name }),
                created_at: self.clock.now(),
            })
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Create,
                Some("User"),
                Some(user.id.into()),
                Some(format!("Created user {}", user.name)),
                Some(json!({ "email": user.email.as_str(), "role": user.role.as_str() })),
            )
            .await;

        Ok(user.into())
    }

    pub async fn update_user(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        command: UpdateUserCommand,
    ) -> ApplicationResult<UserDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        let user = self.find_user(id).await?;

        let mut errors = FieldErrors::new();
        let mut update = UserUpdate::new(user.id);
        if let Some(name) = command.name {
            if name.trim().is_empty() {
                errors.add("name", "The name field is required.");
            } else {
                update = update.with_name(name.trim().to_string());
            }
        }
        if let Some(raw) = command.email {
            match Email::new(&raw) {
                Ok(email) => {
                    if let Some(existing) = self.user_repo.find_by_email(&email).await?
                        && existing.id != user.id
                    {
                        errors.add("email", "The email has already been taken.");
                    } else {
                        update = update.with_email(email);
                    }
                }
                Err(err) => errors.add("email", err.to_string()),
            }
        }
        if let Some(raw) = command.role {
            match self.resolve_role(&raw).await {
                Ok(role) => update = update.with_role_id(role.id),
                Err(err) => errors.add("role", err.to_string()),
            }
        }
        if let Some(raw) = command.status {
            match UserStatus::from_str(&raw) {
                Ok(status) => update = update.with_status(status),
                Err(err) => errors.add("status", err.to_string()),
            }
        }
        if let Some(company_name) = command.company_name {
            update = update.with_company_detail(
                company_name
                    .filter(|name| !name.trim().is_empty())
                    .map(|company_name| CompanyDetail { company_name }),
            );
        }
        errors.into_result()?;

        let updated = if update.is_noop() {
            user
        } else {
            self.user_repo.update(update).await?
        };

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("User"),
                Some(updated.id.into()),
                Some(format!("Updated user {}", updated.name)),
                Some(json!({ "email": updated.email.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn update_role(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
        role: &str,
    ) -> ApplicationResult<UserDto> {
        ensure_role(actor, &[RoleName::Admin])?;
        let user = self.find_user(id).await?;

        let role = self
            .resolve_role(role)
            .await
            .map_err(|err| ApplicationError::invalid("role", err.to_string()))?;
        let updated = self
            .user_repo
            .update(UserUpdate::new(user.id).with_role_id(role.id))
            .await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Update,
                Some("User"),
                Some(updated.id.into()),
                Some(format!(
                    "Changed role of user {} to {}",
                    updated.name,
                    role.name.as_str()
                )),
                Some(json!({ "email": updated.email.as_str(), "role": role.name.as_str() })),
            )
            .await;

        Ok(updated.into())
    }

    pub async fn delete_user(
        &self,
        actor: &AuthenticatedUser,
        meta: &RequestMeta,
        id: i64,
    ) -> ApplicationResult<()> {
        ensure_role(actor, &[RoleName::Admin])?;
        let user = self.find_user(id).await?;

        self.user_repo.soft_delete(user.id).await?;

        self.audit
            .record(
                Some(actor),
                meta,
                AuditAction::Delete,
                Some("User"),
                Some(user.id.into()),
                Some(format!("Deleted user {}", user.name)),
                Some(json!({ "email": user.email.as_str() })),
            )
            .await;

        Ok(())
    }

    /// Accepts "3" as a role id or "back_office" as a role name.
    async fn resolve_role(&self, raw: &str) -> ApplicationResult<Role> {
        if let Ok(id) = raw.trim().parse::<i64>() {
            let role_id = RoleId::new(id).map_err(|err| attribute_to_field("role", err))?;
            return self
                .role_repo
                .find_by_id(role_id)
                .await?
                .ok_or_else(|| ApplicationError::invalid("role", "The selected role does not exist."));
        }
        let name = RoleName::from_str(raw).map_err(|err| attribute_to_field("role", err))?;
        self.role_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| ApplicationError::invalid("role", "The selected role does not exist."))
    }

    async fn find_user(&self, id: i64) -> ApplicationResult<User> {
        self.user_repo
            .find_by_id(UserId(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("User not found"))
    }
}
