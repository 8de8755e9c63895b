//! Storage access handle
//!
//! Services receive a [`PlanStore`] explicitly instead of reaching for a
//! process-wide client. [`SqliteStore`] is the production implementation.

use crate::db::init_database;
use crate::models::{ClassPlan, Movement, MuscleGroup};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

/// Get/put/query access to movements and class plans
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert or update a movement, returning its id
    ///
    /// A movement without an id is assigned a fresh UUID.
    async fn put_movement(&self, movement: &Movement) -> Result<String>;

    async fn get_movement(&self, id: &str) -> Result<Option<Movement>>;

    /// All movements targeting `muscle_group`, ordered by name
    ///
    /// Names compare after trimming, like everywhere else.
    async fn find_movements_by_muscle_group(&self, muscle_group: &str) -> Result<Vec<Movement>>;

    /// Insert or replace a class plan and its ordered membership
    ///
    /// Every referenced movement must already exist.
    async fn put_class(&self, plan: &ClassPlan) -> Result<()>;

    async fn get_class(&self, id: Uuid) -> Result<Option<ClassPlan>>;

    /// Movements of a class plan in performance order
    async fn class_sequence(&self, id: Uuid) -> Result<Vec<Movement>>;

    /// Store `movements` and a class plan referencing them in order
    ///
    /// Every movement is validated before anything is written.
    async fn import_class(&self, title: &str, movements: &[Movement]) -> Result<ClassPlan> {
        validate_all(movements)?;

        let mut ids = Vec::with_capacity(movements.len());
        for movement in movements {
            ids.push(self.put_movement(movement).await?);
        }

        let plan = ClassPlan::new(title, ids);
        self.put_class(&plan).await?;
        Ok(plan)
    }
}

/// [`PlanStore`] backed by a SQLite connection pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an initialized pool (see [`crate::db::init_database`])
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

type MovementRow = (String, String, Option<String>);

fn movement_from_row((guid, name, muscle_groups): MovementRow) -> Result<Movement> {
    let muscle_groups = match muscle_groups {
        Some(json) => {
            let names: Vec<String> = serde_json::from_str(&json)?;
            Some(names.into_iter().map(MuscleGroup::new).collect())
        }
        None => None,
    };

    Ok(Movement {
        id: Some(guid),
        name,
        muscle_groups,
    })
}

fn validate_all(movements: &[Movement]) -> Result<()> {
    movements
        .iter()
        .enumerate()
        .try_for_each(|(position, movement)| movement.validate(position))
}

/// Upsert one movement on `conn`; muscle groups are stored normalized
async fn upsert_movement(conn: &mut SqliteConnection, movement: &Movement) -> Result<String> {
    let guid = movement
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let muscle_groups = movement
        .muscle_groups
        .as_deref()
        .map(|groups| serde_json::to_string(&MuscleGroup::normalized_names(groups)))
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO movements (guid, name, muscle_groups)
        VALUES (?, ?, ?)
        ON CONFLICT(guid) DO UPDATE SET
            name = excluded.name,
            muscle_groups = excluded.muscle_groups,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&guid)
    .bind(&movement.name)
    .bind(muscle_groups)
    .execute(&mut *conn)
    .await?;

    debug!("Stored movement '{}' ({})", movement.name, guid);
    Ok(guid)
}

/// Write a class plan and its membership on `conn`
///
/// Run inside a transaction: an unknown movement aborts with
/// `Error::NotFound` after earlier statements have executed.
async fn write_class(conn: &mut SqliteConnection, plan: &ClassPlan) -> Result<()> {
    for movement_id in &plan.movement_ids {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements WHERE guid = ?")
            .bind(movement_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists == 0 {
            return Err(Error::NotFound(format!("movement {}", movement_id)));
        }
    }

    let class_guid = plan.id.to_string();

    sqlx::query(
        r#"
        INSERT INTO class_plans (guid, title, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(guid) DO UPDATE SET title = excluded.title
        "#,
    )
    .bind(&class_guid)
    .bind(&plan.title)
    .bind(plan.created_at)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM class_movements WHERE class_guid = ?")
        .bind(&class_guid)
        .execute(&mut *conn)
        .await?;

    for (position, movement_id) in plan.movement_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO class_movements (class_guid, position, movement_guid) VALUES (?, ?, ?)",
        )
        .bind(&class_guid)
        .bind(position as i64)
        .bind(movement_id)
        .execute(&mut *conn)
        .await?;
    }

    debug!(
        "Stored class '{}' ({}) with {} movements",
        plan.title,
        plan.id,
        plan.movement_ids.len()
    );
    Ok(())
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn put_movement(&self, movement: &Movement) -> Result<String> {
        let mut conn = self.pool.acquire().await?;
        upsert_movement(&mut conn, movement).await
    }

    async fn get_movement(&self, id: &str) -> Result<Option<Movement>> {
        let row = sqlx::query_as::<_, MovementRow>(
            "SELECT guid, name, muscle_groups FROM movements WHERE guid = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(movement_from_row).transpose()
    }

    async fn find_movements_by_muscle_group(&self, muscle_group: &str) -> Result<Vec<Movement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT DISTINCT m.guid, m.name, m.muscle_groups
            FROM movements m, json_each(m.muscle_groups) j
            WHERE m.muscle_groups IS NOT NULL
              AND j.value = ?
            ORDER BY m.name ASC, m.guid ASC
            "#,
        )
        .bind(muscle_group.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    async fn put_class(&self, plan: &ClassPlan) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        write_class(&mut tx, plan).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_class(&self, id: Uuid) -> Result<Option<ClassPlan>> {
        let class_guid = id.to_string();

        let row = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT title, created_at FROM class_plans WHERE guid = ?",
        )
        .bind(&class_guid)
        .fetch_optional(&self.pool)
        .await?;

        let Some((title, created_at)) = row else {
            return Ok(None);
        };

        let movement_ids: Vec<String> = sqlx::query_scalar(
            "SELECT movement_guid FROM class_movements WHERE class_guid = ? ORDER BY position ASC",
        )
        .bind(&class_guid)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ClassPlan {
            id,
            title,
            movement_ids,
            created_at,
        }))
    }

    async fn class_sequence(&self, id: Uuid) -> Result<Vec<Movement>> {
        let class_guid = id.to_string();

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM class_plans WHERE guid = ?")
            .bind(&class_guid)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(Error::NotFound(format!("class {}", id)));
        }

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT m.guid, m.name, m.muscle_groups
            FROM class_movements cm
            JOIN movements m ON m.guid = cm.movement_guid
            WHERE cm.class_guid = ?
            ORDER BY cm.position ASC
            "#,
        )
        .bind(&class_guid)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    /// Movements and class plan are written in one transaction
    async fn import_class(&self, title: &str, movements: &[Movement]) -> Result<ClassPlan> {
        validate_all(movements)?;

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(movements.len());
        for movement in movements {
            ids.push(upsert_movement(&mut tx, movement).await?);
        }

        let plan = ClassPlan::new(title, ids);
        write_class(&mut tx, &plan).await?;
        tx.commit().await?;

        Ok(plan)
    }
}

/// [`PlanStore`] that opens its SQLite database on first use
///
/// Commands that never touch storage never create the database file.
pub struct LazySqliteStore {
    path: PathBuf,
    store: OnceCell<SqliteStore>,
}

impl LazySqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.store.initialized()
    }

    async fn open(&self) -> Result<&SqliteStore> {
        self.store
            .get_or_try_init(|| async {
                info!("Opening database: {}", self.path.display());
                let pool = init_database(&self.path).await?;
                Ok::<_, Error>(SqliteStore::new(pool))
            })
            .await
    }
}

#[async_trait]
impl PlanStore for LazySqliteStore {
    async fn put_movement(&self, movement: &Movement) -> Result<String> {
        self.open().await?.put_movement(movement).await
    }

    async fn get_movement(&self, id: &str) -> Result<Option<Movement>> {
        self.open().await?.get_movement(id).await
    }

    async fn find_movements_by_muscle_group(&self, muscle_group: &str) -> Result<Vec<Movement>> {
        self.open()
            .await?
            .find_movements_by_muscle_group(muscle_group)
            .await
    }

    async fn put_class(&self, plan: &ClassPlan) -> Result<()> {
        self.open().await?.put_class(plan).await
    }

    async fn get_class(&self, id: Uuid) -> Result<Option<ClassPlan>> {
        self.open().await?.get_class(id).await
    }

    async fn class_sequence(&self, id: Uuid) -> Result<Vec<Movement>> {
        self.open().await?.class_sequence(id).await
    }

    async fn import_class(&self, title: &str, movements: &[Movement]) -> Result<ClassPlan> {
        self.open().await?.import_class(title, movements).await
    }
}
