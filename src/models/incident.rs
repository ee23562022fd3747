use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

use super::present;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Severity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(AppError::validation(format!("Unknown severity: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    New,
    Reviewed,
    Dismissed,
}

impl IncidentStatus {
    /// Whether a parent has looked at the incident.
    pub fn is_reviewed(self) -> bool {
        !matches!(self, IncidentStatus::New)
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IncidentStatus::New => "new",
            IncidentStatus::Reviewed => "reviewed",
            IncidentStatus::Dismissed => "dismissed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(IncidentStatus::New),
            "reviewed" => Ok(IncidentStatus::Reviewed),
            "dismissed" => Ok(IncidentStatus::Dismissed),
            _ => Err(AppError::validation(format!("Unknown incident status: {s}"))),
        }
    }
}

/// DB row struct for `incidents`. `parent_id` and `family_code` are copied from
/// the child at insert time.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub child_id: i64,
    pub parent_id: i64,
    pub family_code: String,
    pub content: String,
    pub sender: Option<String>,
    pub platform: Option<String>,
    pub severity: String,
    pub confidence: f64,
    pub status: String,
    pub detected_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub child_id: Option<i64>,
    pub content: Option<String>,
    pub sender: Option<String>,
    pub platform: Option<String>,
    pub severity: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub child_id: i64,
    pub content: String,
    pub sender: Option<String>,
    pub platform: Option<String>,
    pub severity: Severity,
    pub confidence: f64,
}

impl CreateIncidentRequest {
    pub fn validate(self) -> AppResult<NewIncident> {
        let (Some(child_id), Some(content)) = (self.child_id, present(self.content)) else {
            return Err(AppError::validation("Child ID and content are required"));
        };

        let severity = match present(self.severity) {
            Some(s) => s.trim().to_lowercase().parse()?,
            None => Severity::default(),
        };

        let confidence = self.confidence.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AppError::validation("Confidence must be between 0 and 1"));
        }

        Ok(NewIncident {
            child_id,
            content,
            sender: present(self.sender),
            platform: present(self.platform),
            severity,
            confidence,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncidentStatusRequest {
    pub status: Option<String>,
}

impl UpdateIncidentStatusRequest {
    pub fn validate(self) -> AppResult<IncidentStatus> {
        present(self.status)
            .ok_or_else(|| AppError::validation("Status is required"))?
            .parse()
    }
}
