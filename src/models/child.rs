use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

use super::present;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChildStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChildStatus::Active => "active",
            ChildStatus::Inactive => "inactive",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ChildStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ChildStatus::Active),
            "inactive" => Ok(ChildStatus::Inactive),
            _ => Err(AppError::validation(format!("Unknown child status: {s}"))),
        }
    }
}

/// DB row struct; status is kept as TEXT and parsed on demand.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub device_id: String,
    pub device_info: String,
    pub family_code: String,
    pub status: String,
    pub connected_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Everything needed to insert a child row, whichever path created it.
#[derive(Debug, Clone)]
pub struct NewChild {
    pub name: String,
    pub age: Option<i64>,
    pub device_id: String,
    pub device_info: String,
}

fn validate_age(age: Option<i64>) -> AppResult<Option<i64>> {
    match age {
        Some(a) if a < 0 => Err(AppError::validation("Age must not be negative")),
        other => Ok(other),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectChildRequest {
    pub family_code: Option<String>,
    pub child_name: Option<String>,
    pub age: Option<i64>,
    pub device_id: Option<String>,
    pub device_info: Option<String>,
}

impl ConnectChildRequest {
    /// Returns the family code alongside the child to insert.
    pub fn validate(self) -> AppResult<(String, NewChild)> {
        let (Some(family_code), Some(name), Some(device_id)) = (
            present(self.family_code),
            present(self.child_name),
            present(self.device_id),
        ) else {
            return Err(AppError::validation(
                "Family code, child name, and device ID are required",
            ));
        };

        Ok((
            family_code.trim().to_string(),
            NewChild {
                name: name.trim().to_string(),
                age: validate_age(self.age)?,
                device_id,
                device_info: present(self.device_info).unwrap_or_default(),
            },
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChildRequest {
    pub parent_id: Option<i64>,
    pub child_name: Option<String>,
    pub age: Option<i64>,
    pub device_id: Option<String>,
    pub device_info: Option<String>,
}

impl AddChildRequest {
    pub fn validate(self) -> AppResult<(i64, NewChild)> {
        let (Some(parent_id), Some(name), Some(device_id)) = (
            self.parent_id,
            present(self.child_name),
            present(self.device_id),
        ) else {
            return Err(AppError::validation(
                "Parent ID, child name, and device ID are required",
            ));
        };

        Ok((
            parent_id,
            NewChild {
                name: name.trim().to_string(),
                age: validate_age(self.age)?,
                device_id,
                device_info: present(self.device_info).unwrap_or_default(),
            },
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildLoginRequest {
    pub family_code: Option<String>,
    pub child_name: Option<String>,
}

impl ChildLoginRequest {
    pub fn validate(self) -> AppResult<(String, String)> {
        match (present(self.family_code), present(self.child_name)) {
            (Some(code), Some(name)) => Ok((code.trim().to_string(), name.trim().to_string())),
            _ => Err(AppError::validation("Family code and child name are required")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    pub fn validate(self) -> AppResult<ChildStatus> {
        present(self.status)
            .ok_or_else(|| AppError::validation("Status is required"))?
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_requires_code_name_and_device() {
        let req = ConnectChildRequest {
            family_code: Some("SAFE-ABCD1234".into()),
            child_name: Some("Tom".into()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn connect_defaults_device_info_to_empty() {
        let req = ConnectChildRequest {
            family_code: Some(" SAFE-ABCD1234 ".into()),
            child_name: Some("Tom".into()),
            age: Some(9),
            device_id: Some("dev-1".into()),
            device_info: None,
        };
        let (code, child) = req.validate().unwrap();
        assert_eq!(code, "SAFE-ABCD1234");
        assert_eq!(child.device_info, "");
        assert_eq!(child.age, Some(9));
    }

    #[test]
    fn negative_age_is_rejected() {
        let req = AddChildRequest {
            parent_id: Some(1),
            child_name: Some("Tom".into()),
            age: Some(-2),
            device_id: Some("dev-1".into()),
            device_info: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn status_parsing() {
        assert_eq!("active".parse::<ChildStatus>().unwrap(), ChildStatus::Active);
        assert_eq!(ChildStatus::Inactive.to_string(), "inactive");
        assert!("paused".parse::<ChildStatus>().is_err());

        let missing = UpdateStatusRequest { status: None };
        assert!(matches!(missing.validate(), Err(AppError::Validation(_))));
    }
}
