use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn a background task that folds the WAL back into the main database file
/// every `interval_secs`, so a crash loses at most one interval of writes to
/// replay. The caller aborts the handle at shutdown.
pub fn start(pool: SqlitePool, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match checkpoint(&pool).await {
                Ok(()) => debug!("WAL checkpoint complete"),
                Err(e) => warn!("WAL checkpoint failed: {}", e),
            }
        }
    })
}

pub async fn checkpoint(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA wal_checkpoint(PASSIVE)")
        .execute(pool)
        .await?;
    Ok(())
}
