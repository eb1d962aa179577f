//! Project CRUD queries
//!
//! Every operation is a single statement, so SQLite's per-statement atomicity
//! is the only concurrency control needed.

use crate::StorageError;
use gatehouse_core::types::{CreateProject, Project, ProjectId, UpdateProject, UserId};
use sqlx::SqlitePool;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: ProjectId,
    name: String,
    description: String,
    user_id: Option<UserId>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            user_id: row.user_id,
        }
    }
}

/// Get all projects ordered by id
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Project>> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, description, user_id FROM projects ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Project::from).collect())
}

/// Get a project by id
pub async fn get_by_id(pool: &SqlitePool, id: ProjectId) -> Result<Option<Project>> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, description, user_id FROM projects WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Project::from))
}

/// Insert a new project owned by `owner`
pub async fn create(pool: &SqlitePool, project: CreateProject, owner: UserId) -> Result<Project> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "INSERT INTO projects (name, description, user_id) VALUES (?, ?, ?)
         RETURNING id, name, description, user_id",
    )
    .bind(project.name)
    .bind(project.description)
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Apply a partial update
///
/// Fields left as `None` keep their stored value.
///
/// # Errors
///
/// Returns [`StorageError::NotFound`] if no project has this id
pub async fn update(pool: &SqlitePool, id: ProjectId, update: UpdateProject) -> Result<Project> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "UPDATE projects
         SET name = COALESCE(?, name), description = COALESCE(?, description)
         WHERE id = ?
         RETURNING id, name, description, user_id",
    )
    .bind(update.name)
    .bind(update.description)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Project::from)
        .ok_or_else(|| StorageError::not_found("Project", id.to_string()))
}

/// Delete a project
///
/// # Errors
///
/// Returns [`StorageError::NotFound`] if no project has this id; nothing is
/// modified in that case
pub async fn delete(pool: &SqlitePool, id: ProjectId) -> Result<()> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Project", id.to_string()));
    }

    Ok(())
}
