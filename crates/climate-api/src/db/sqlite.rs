use anyhow::{anyhow, Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

/// Tables the API reads from; both are populated outside this service
pub const REQUIRED_TABLES: [&str; 2] = ["station", "measurement"];

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens an existing observation database in read-only mode.
    pub async fn open(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))?
            .create_if_missing(false)
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open observation database: {}", db_path))?;

        let db = Self::from_pool(pool);
        db.health_check().await?;
        info!("SQLite database opened read-only at: {}", db_path);

        Ok(db)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check connectivity and that the observation tables are present.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        for table in REQUIRED_TABLES {
            let found: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to look up table: {}", table))?;

            if found == 0 {
                return Err(anyhow!("Database is missing required table: {}", table));
            }
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite connection pool closed");
    }
}
