//! Database Layer with Connection Pooling and Safe Transactions
//!
//! SQLite record store for projects, requirements and design artifacts:
//! - Connection pooling via r2d2
//! - Panic-safe transactions with automatic rollback
//! - Version-tracked migrations
//! - Cascading deletes from projects to their records

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};

use crate::types::{
    Artifact, ArtifactKind, ParseWithDefault, PlanError, Project, ProjectSummary, Requirement,
    RequirementCategory, RequirementSet, Result, ResultExt, log_filter_error,
};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Current schema version for migration tracking
const SCHEMA_VERSION: u32 = 1;

/// Migration definitions
struct Migration {
    version: u32,
    description: &'static str,
    up: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Index artifacts by project and kind",
    up: "CREATE INDEX IF NOT EXISTS idx_artifacts_project_kind
         ON design_artifacts(project_id, artifact_type)",
}];

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Minimum idle connections to keep ready
    pub min_idle: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        // Single-user CLI: calls are sequential, a small pool is plenty
        Self {
            max_size: 4,
            min_idle: 1,
            connection_timeout_secs: 30,
        }
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open database with connection pooling at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    /// Open database with custom pool configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| PlanError::Storage(format!("Failed to create connection pool: {}", e)))?;

        Ok(Self { pool })
    }

    /// Open an in-memory database for testing or temporary use.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| PlanError::Storage(format!("Failed to create in-memory pool: {}", e)))?;

        Ok(Self { pool })
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            PlanError::Storage(format!("Failed to acquire database connection: {}", e))
        })
    }

    /// Initialize database schema.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        let current_version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        drop(conn);

        if current_version == 0 {
            // Fresh database: schema.sql already contains every migration
            let conn = self.conn()?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .with_context("Failed to set schema version")?;
            return Ok(());
        }

        self.migrate(current_version)
    }

    /// Run version-tracked migrations.
    fn migrate(&self, current_version: u32) -> Result<()> {
        let conn = self.conn()?;

        for migration in MIGRATIONS {
            if migration.version > current_version {
                conn.execute_batch(migration.up).with_context_fn(|| {
                    format!(
                        "Failed to apply migration {}: {}",
                        migration.version, migration.description
                    )
                })?;

                tracing::info!(
                    "Applied migration {}: {}",
                    migration.version,
                    migration.description
                );
            }
        }

        if current_version < SCHEMA_VERSION {
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .with_context("Failed to update schema version")?;
        }

        Ok(())
    }

    /// Get a raw connection for advanced operations.
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.conn()
    }

    /// Execute a function within a panic-safe database transaction.
    ///
    /// If the closure fails or panics the transaction is rolled back.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + std::panic::UnwindSafe,
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .with_context("Failed to start transaction")?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&tx)));

        match result {
            Ok(Ok(value)) => {
                tx.commit().with_context("Failed to commit transaction")?;
                Ok(value)
            }
            Ok(Err(e)) => Err(e),
            Err(panic_payload) => {
                let panic_msg = panic_payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic_payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "Unknown panic".to_string());

                tracing::error!("Transaction panicked: {}", panic_msg);
                Err(PlanError::Storage(format!(
                    "Transaction panicked: {}",
                    panic_msg
                )))
            }
        }
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Create a project and return its id.
    pub fn create_project(&self, name: &str, description: &str) -> Result<i64> {
        let conn = self.conn()?;
        let now = now_rfc3339();
        conn.execute(
            "INSERT INTO projects (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![name, description, now],
        )
        .with_context("Failed to create project")?;

        let id = conn.last_insert_rowid();
        tracing::debug!(project_id = id, name, "Created project");
        Ok(id)
    }

    /// Load a project with its requirements and artifacts.
    pub fn get_project(&self, project_id: i64) -> Result<Project> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at
                 FROM projects WHERE id = ?1",
                params![project_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?
            .ok_or(PlanError::ProjectNotFound(project_id))?;

        let (id, name, description, created_at, updated_at) = row;

        Ok(Project {
            id,
            name,
            description,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
            requirements: Self::query_requirements(&conn, project_id)?,
            artifacts: Self::query_artifacts(&conn, project_id)?,
        })
    }

    /// List all projects, newest first, with record counts.
    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT p.id, p.name, p.description, p.created_at,
                        (SELECT COUNT(*) FROM requirements r WHERE r.project_id = p.id),
                        (SELECT COUNT(*) FROM design_artifacts a WHERE a.project_id = p.id)
                 FROM projects p
                 ORDER BY p.created_at DESC, p.id DESC",
            )
            .with_context("Failed to prepare project listing")?;

        let projects = stmt
            .query_map([], |row| {
                Ok(ProjectSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    created_at: parse_timestamp(&row.get::<_, String>(3)?),
                    requirement_count: row.get::<_, i64>(4)? as usize,
                    artifact_count: row.get::<_, i64>(5)? as usize,
                })
            })?
            .filter_map(|r| log_filter_error(r, "Skipping unreadable project row"))
            .collect();

        Ok(projects)
    }

    /// Delete a project and, by cascade, all its records.
    pub fn delete_project(&self, project_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn
            .execute("DELETE FROM projects WHERE id = ?1", params![project_id])
            .with_context("Failed to delete project")?;

        if affected == 0 {
            return Err(PlanError::ProjectNotFound(project_id));
        }

        tracing::info!(project_id, "Deleted project");
        Ok(())
    }

    // =========================================================================
    // Requirements
    // =========================================================================

    /// Append one requirement to a project.
    pub fn add_requirement(
        &self,
        project_id: i64,
        category: RequirementCategory,
        description: &str,
    ) -> Result<i64> {
        self.transaction(|conn| {
            Self::ensure_project(conn, project_id)?;
            Self::insert_requirement(conn, project_id, category, description)
        })
    }

    /// Replace every requirement of a project with the given set.
    ///
    /// Returns the number of stored requirements.
    pub fn replace_requirements(&self, project_id: i64, set: &RequirementSet) -> Result<usize> {
        self.transaction(|conn| {
            Self::ensure_project(conn, project_id)?;
            conn.execute(
                "DELETE FROM requirements WHERE project_id = ?1",
                params![project_id],
            )
            .with_context("Failed to clear requirements")?;

            let mut count = 0;
            for (category, description) in set.entries() {
                Self::insert_requirement(conn, project_id, category, description)?;
                count += 1;
            }
            Ok(count)
        })
    }

    pub fn list_requirements(&self, project_id: i64) -> Result<Vec<Requirement>> {
        let conn = self.conn()?;
        Self::query_requirements(&conn, project_id)
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    /// Store a generated artifact. Earlier artifacts of the same kind are kept.
    pub fn add_artifact(&self, project_id: i64, kind: ArtifactKind, content: &str) -> Result<i64> {
        self.transaction(|conn| {
            Self::ensure_project(conn, project_id)?;
            let now = now_rfc3339();
            conn.execute(
                "INSERT INTO design_artifacts (project_id, artifact_type, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![project_id, kind.as_str(), content, now],
            )
            .with_context("Failed to store artifact")?;
            let id = conn.last_insert_rowid();
            Self::touch_project(conn, project_id, &now)?;
            Ok(id)
        })
    }

    pub fn list_artifacts(&self, project_id: i64) -> Result<Vec<Artifact>> {
        let conn = self.conn()?;
        Self::query_artifacts(&conn, project_id)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn ensure_project(conn: &Connection, project_id: i64) -> Result<()> {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
                params![project_id],
                |row| row.get(0),
            )
            .with_context("Failed to check project")?;

        if exists {
            Ok(())
        } else {
            Err(PlanError::ProjectNotFound(project_id))
        }
    }

    fn touch_project(conn: &Connection, project_id: i64, now: &str) -> Result<()> {
        conn.execute(
            "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
            params![now, project_id],
        )
        .with_context("Failed to update project timestamp")?;
        Ok(())
    }

    fn insert_requirement(
        conn: &Connection,
        project_id: i64,
        category: RequirementCategory,
        description: &str,
    ) -> Result<i64> {
        let now = now_rfc3339();
        conn.execute(
            "INSERT INTO requirements (project_id, category, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![project_id, category.as_str(), description, now],
        )
        .with_context("Failed to store requirement")?;
        let id = conn.last_insert_rowid();
        Self::touch_project(conn, project_id, &now)?;
        Ok(id)
    }

    fn query_requirements(conn: &Connection, project_id: i64) -> Result<Vec<Requirement>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, project_id, category, description, created_at
                 FROM requirements WHERE project_id = ?1 ORDER BY id",
            )
            .with_context("Failed to prepare requirements query")?;

        let requirements = stmt
            .query_map(params![project_id], |row| {
                Ok(Requirement {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    category: RequirementCategory::parse_or_default(&row.get::<_, String>(2)?),
                    description: row.get(3)?,
                    created_at: parse_timestamp(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch requirements")?;

        Ok(requirements)
    }

    fn query_artifacts(conn: &Connection, project_id: i64) -> Result<Vec<Artifact>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, project_id, artifact_type, content, created_at
                 FROM design_artifacts WHERE project_id = ?1 ORDER BY id",
            )
            .with_context("Failed to prepare artifacts query")?;

        let artifacts = stmt
            .query_map(params![project_id], |row| {
                Ok(Artifact {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    kind: ArtifactKind::parse_or_default(&row.get::<_, String>(2)?),
                    content: row.get(3)?,
                    created_at: parse_timestamp(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch artifacts")?;

        Ok(artifacts)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!("Invalid timestamp '{}': {}", value, e);
            DateTime::<Utc>::UNIX_EPOCH
        })
}
