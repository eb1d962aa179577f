//! Gatehouse Storage
//!
//! `SQLite` persistence for user accounts and projects.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `users` and `projects` each own their queries
//! - **Pooled Connections**: every query checks a connection out of the pool
//!   and returns it when the query future completes or is dropped
//! - **Trait Facade**: [`LocalStore`] implements the core `UserStore` and
//!   `ProjectStore` traits on top of the slices
//!
//! # Example
//!
//! ```rust,no_run
//! use gatehouse_core::{CreateProject, NewUser, ProjectStore, Role, UserStore};
//! use gatehouse_storage::{create_pool, run_migrations, LocalStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://gatehouse.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalStore::new(pool);
//! let admin = store
//!     .create_user(NewUser {
//!         username: "admin".to_string(),
//!         password_hash: "$2b$12$...".to_string(),
//!         role: Role::Admin,
//!     })
//!     .await?;
//! let project = store
//!     .create_project(CreateProject::new("Apollo", "Lunar landing"), admin.id)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod projects;
pub mod users;

pub use context::LocalStore;
pub use error::StorageError;

// Type alias used by the server's application state
pub type Database = LocalStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://gatehouse.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("sqlite pool ready");

    Ok(pool)
}

/// Create a pool and bring the schema up to date in one step
pub async fn connect(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(pool)
}
