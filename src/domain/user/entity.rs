// src/domain/user/entity.rs
use crate::domain::role::{RoleId, RoleName};
use crate::domain::user::value_objects::{Email, PasswordHash, UserId, UserStatus};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CompanyDetail {
    pub company_name: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role_id: RoleId,
    pub role: RoleName,
    pub status: UserStatus,
    pub company_detail: Option<CompanyDetail>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role_id: RoleId,
    pub status: UserStatus,
    pub company_detail: Option<CompanyDetail>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<Email>,
    pub role_id: Option<RoleId>,
    pub status: Option<UserStatus>,
    pub company_detail: Option<Option<CompanyDetail>>,
}

impl UserUpdate {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            email: None,
            role_id: None,
            status: None,
            company_detail: None,
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_role_id(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_company_detail(mut self, detail: Option<CompanyDetail>) -> Self {
        self.company_detail = Some(detail);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role_id.is_none()
            && self.status.is_none()
            && self.company_detail.is_none()
    }
}
