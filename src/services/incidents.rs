use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::incident::{Incident, IncidentStatus, NewIncident},
    services::children::ChildService,
};

/// Storage for incidents reported by the upstream detection pipeline.
pub struct IncidentService;

impl IncidentService {
    /// Files an incident against a child; the owning parent and family code are
    /// taken from the child row, never from the caller.
    pub async fn create(pool: &SqlitePool, new: &NewIncident) -> AppResult<Incident> {
        let child = ChildService::find_by_id(pool, new.child_id)
            .await?
            .ok_or_else(|| AppError::not_found("Child not found"))?;

        let incident = sqlx::query_as::<_, Incident>(
            "INSERT INTO incidents (child_id, parent_id, family_code, content, sender, platform, severity, confidence, status, detected_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(child.id)
        .bind(child.parent_id)
        .bind(&child.family_code)
        .bind(&new.content)
        .bind(&new.sender)
        .bind(&new.platform)
        .bind(new.severity.to_string())
        .bind(new.confidence)
        .bind(IncidentStatus::New.to_string())
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        info!(
            "Incident {} recorded for child {} (severity {})",
            incident.id, child.id, incident.severity
        );
        Ok(incident)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Incident>> {
        let incident = sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(incident)
    }

    pub async fn list_for_child(pool: &SqlitePool, child_id: i64) -> AppResult<Vec<Incident>> {
        let incidents = sqlx::query_as::<_, Incident>(
            "SELECT * FROM incidents WHERE child_id = ? ORDER BY detected_at DESC, id DESC",
        )
        .bind(child_id)
        .fetch_all(pool)
        .await?;
        Ok(incidents)
    }

    pub async fn list_for_parent(pool: &SqlitePool, parent_id: i64) -> AppResult<Vec<Incident>> {
        let incidents = sqlx::query_as::<_, Incident>(
            "SELECT * FROM incidents WHERE parent_id = ? ORDER BY detected_at DESC, id DESC",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await?;
        Ok(incidents)
    }

    /// Moving out of `new` stamps `reviewed_at`; moving back clears it.
    pub async fn update_status(
        pool: &SqlitePool,
        id: i64,
        status: IncidentStatus,
    ) -> AppResult<Option<Incident>> {
        let reviewed_at = status.is_reviewed().then(Utc::now);
        let incident = sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET status = ?, reviewed_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status.to_string())
        .bind(reviewed_at)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        if incident.is_some() {
            info!("Incident {} marked {}", id, status);
        }
        Ok(incident)
    }

    pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
