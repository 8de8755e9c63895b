//! Database initialization
//!
//! Creates the database file (and its parent directory) on first run and
//! applies the schema idempotently on every open.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open or create the database at `db_path` and ensure all tables exist
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_movements_table(pool).await?;
    create_class_plans_table(pool).await?;
    create_class_movements_table(pool).await?;
    Ok(())
}

/// Movements with their muscle groups as a JSON array
///
/// `muscle_groups IS NULL` means no muscle data was recorded for the
/// movement; `'[]'` is a measured empty set.
async fn create_movements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movements (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            muscle_groups TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_movements_name ON movements(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_class_plans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_plans (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Ordered membership of movements in a class plan
async fn create_class_movements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_movements (
            class_guid TEXT NOT NULL REFERENCES class_plans(guid) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            movement_guid TEXT NOT NULL REFERENCES movements(guid),
            PRIMARY KEY (class_guid, position)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
