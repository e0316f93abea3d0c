use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Creates a PostgreSQL connection pool and applies pending migrations.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Error from a bounded database call.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("database call timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Runs a query future with an upper bound on how long it may suspend.
pub async fn bounded<T, F>(timeout: Duration, query: F) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => result.map_err(QueryError::from),
        Err(_) => Err(QueryError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_slow_query() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, sqlx::Error>(1)
        };
        let err = bounded(Duration::from_secs(5), slow).await.unwrap_err();
        assert!(matches!(err, QueryError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let value = bounded(Duration::from_secs(5), async { Ok::<_, sqlx::Error>(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }
}
