//! Storage traits for users and projects

use crate::error::Result;
use crate::types::{
    CreateProject, NewUser, Project, ProjectId, UpdateProject, User, UserCredentials, UserId,
};
use async_trait::async_trait;

/// Persistence for user accounts
///
/// Implementations must enforce username uniqueness themselves; callers may
/// pre-check, but a concurrent insert of the same name has to surface as
/// [`GateError::Duplicate`](crate::GateError::Duplicate).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with an already-hashed password
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Look up a user's public record by username
    async fn find_user(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user and their password hash by username
    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;

    /// Whether a username is already registered
    async fn username_exists(&self, username: &str) -> Result<bool>;

    /// Get all users, ordered by username
    async fn get_all_users(&self) -> Result<Vec<User>>;
}

/// Persistence for projects
///
/// Lookups, updates and deletes of a missing id fail with
/// [`GateError::NotFound`](crate::GateError::NotFound).
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Get all projects, ordered by id
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Get a project by id
    async fn get_project(&self, id: ProjectId) -> Result<Project>;

    /// Create a new project owned by `owner`
    async fn create_project(&self, project: CreateProject, owner: UserId) -> Result<Project>;

    /// Apply a partial update to a project
    async fn update_project(&self, id: ProjectId, update: UpdateProject) -> Result<Project>;

    /// Delete a project
    async fn delete_project(&self, id: ProjectId) -> Result<()>;
}
