use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::child::{Child, ChildStatus, NewChild},
    services::parents::ParentService,
};

pub struct ChildService;

impl ChildService {
    /// Self-service pairing: a device proves it belongs to a household by
    /// presenting the family code.
    pub async fn connect(
        pool: &SqlitePool,
        family_code: &str,
        child: &NewChild,
    ) -> AppResult<Child> {
        let parent = ParentService::find_by_family_code(pool, family_code)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid family code"))?;

        let created =
            Self::insert(pool, parent.id, &parent.family_code, child, "Device already connected").await?;
        info!("Child connected with ID: {}", created.id);
        Ok(created)
    }

    /// Parent-initiated variant of `connect`; the family code is copied from the parent.
    pub async fn add(pool: &SqlitePool, parent_id: i64, child: &NewChild) -> AppResult<Child> {
        let parent = ParentService::find_by_id(pool, parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent not found"))?;

        let created =
            Self::insert(pool, parent.id, &parent.family_code, child, "Device ID already in use").await?;
        info!("Child added manually with ID: {}", created.id);
        Ok(created)
    }

    /// The pre-check turns the common case into a clean conflict; the UNIQUE
    /// index on `device_id` still catches concurrent inserts. Both answer with
    /// `conflict_message`.
    async fn insert(
        pool: &SqlitePool,
        parent_id: i64,
        family_code: &str,
        child: &NewChild,
        conflict_message: &str,
    ) -> AppResult<Child> {
        if Self::device_exists(pool, &child.device_id).await? {
            warn!("Device already connected: {}", child.device_id);
            return Err(AppError::conflict(conflict_message));
        }

        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Child>(
            "INSERT INTO children (parent_id, name, age, device_id, device_info, family_code, status, connected_at, last_seen)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(parent_id)
        .bind(&child.name)
        .bind(child.age)
        .bind(&child.device_id)
        .bind(&child.device_info)
        .bind(family_code)
        .bind(ChildStatus::Active.to_string())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(c) => Ok(c),
            Err(e) if is_unique_violation(&e, "children.device_id") => {
                warn!("Device connected concurrently: {}", child.device_id);
                Err(AppError::conflict(conflict_message))
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(AppError::not_found("Parent not found"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn device_exists(pool: &SqlitePool, device_id: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM children WHERE device_id = ?)")
                .bind(device_id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Returning-child session: matches the family code exactly and the name
    /// case-insensitively, then marks the child active. Several children with
    /// the same name resolve to the earliest connected one.
    pub async fn login(pool: &SqlitePool, family_code: &str, name: &str) -> AppResult<Child> {
        let child = sqlx::query_as::<_, Child>(
            "SELECT * FROM children
             WHERE family_code = ? AND LOWER(name) = LOWER(?)
             ORDER BY id
             LIMIT 1",
        )
        .bind(family_code)
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Child not found with this family code and name"))?;

        Self::update_status(pool, child.id, ChildStatus::Active)
            .await?
            .ok_or_else(|| AppError::not_found("Child not found"))
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Child>> {
        let child = sqlx::query_as::<_, Child>("SELECT * FROM children WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(child)
    }

    pub async fn find_by_parent_id(pool: &SqlitePool, parent_id: i64) -> AppResult<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            "SELECT * FROM children WHERE parent_id = ? ORDER BY connected_at DESC, id DESC",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await?;
        Ok(children)
    }

    pub async fn count_for_parent(pool: &SqlitePool, parent_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM children WHERE parent_id = ?")
            .bind(parent_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Sets the status and refreshes `last_seen`. `None` when the child does not exist.
    pub async fn update_status(
        pool: &SqlitePool,
        id: i64,
        status: ChildStatus,
    ) -> AppResult<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(
            "UPDATE children SET status = ?, last_seen = ? WHERE id = ? RETURNING *",
        )
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        if child.is_some() {
            info!("Child {} status updated to: {}", id, status);
        }
        Ok(child)
    }

    /// Deletes the child (its incidents go with it). Returns whether a row existed.
    pub async fn remove(pool: &SqlitePool, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("Child {} removed", id);
        }
        Ok(removed)
    }
}
