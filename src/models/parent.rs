use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

use super::present;

pub const MIN_PASSWORD_LEN: usize = 6;

/// DB row struct for `parents`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub family_code: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a parent; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProfile {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub family_code: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Parent> for ParentProfile {
    fn from(p: Parent) -> Self {
        Self {
            id: p.id,
            name: p.name,
            last_name: p.last_name,
            email: p.email,
            family_code: p.family_code,
            phone_number: p.phone_number,
            created_at: p.created_at,
        }
    }
}

/// What a child's device learns about the household behind a family code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyOwner {
    pub name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Parent> for FamilyOwner {
    fn from(p: Parent) -> Self {
        Self {
            name: p.name,
            last_name: p.last_name,
            email: p.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub parent: ParentProfile,
    pub token: String,
}

// Request DTOs. Every field is optional at the serde level so a missing field
// becomes a validation error instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParentRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
}

/// A registration request that passed field validation.
#[derive(Debug, Clone)]
pub struct NewParent {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

impl RegisterParentRequest {
    pub fn validate(self) -> AppResult<NewParent> {
        let (Some(name), Some(last_name), Some(email), Some(password)) = (
            present(self.name),
            present(self.last_name),
            present(self.email),
            present(self.password),
        ) else {
            return Err(AppError::validation(
                "Name, lastName, email and password are required",
            ));
        };

        let email = email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email format"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        Ok(NewParent {
            name: name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            password,
            phone_number: present(self.phone_number),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> AppResult<(String, String)> {
        match (present(self.email), present(self.password)) {
            (Some(email), Some(password)) => Ok((email.trim().to_string(), password)),
            _ => Err(AppError::validation("Email and password are required")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> AppResult<ProfileUpdate> {
        match (present(self.name), present(self.last_name)) {
            (Some(name), Some(last_name)) => Ok(ProfileUpdate {
                name: name.trim().to_string(),
                last_name: last_name.trim().to_string(),
                phone_number: present(self.phone_number),
            }),
            _ => Err(AppError::validation("Name and lastName are required")),
        }
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the domain
/// with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}
