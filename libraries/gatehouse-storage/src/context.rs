use crate::{projects, users};
use async_trait::async_trait;
use gatehouse_core::{
    error::{GateError, Result},
    storage::{ProjectStore, UserStore},
    types::*,
};
use sqlx::SqlitePool;

/// Local storage backed by `SQLite`
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and run migrations
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = crate::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for LocalStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create(&self.pool, &user.username, &user.password_hash, user.role)
            .await
            .map_err(GateError::from)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        users::get_by_username(&self.pool, username)
            .await
            .map_err(GateError::from)
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        users::get_credentials(&self.pool, username)
            .await
            .map_err(GateError::from)
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        users::exists(&self.pool, username)
            .await
            .map_err(GateError::from)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await.map_err(GateError::from)
    }
}

#[async_trait]
impl ProjectStore for LocalStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        projects::get_all(&self.pool).await.map_err(GateError::from)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project> {
        projects::get_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| GateError::not_found("Project", id.to_string()))
    }

    async fn create_project(&self, project: CreateProject, owner: UserId) -> Result<Project> {
        projects::create(&self.pool, project, owner)
            .await
            .map_err(GateError::from)
    }

    async fn update_project(&self, id: ProjectId, update: UpdateProject) -> Result<Project> {
        if update.is_empty() {
            return self.get_project(id).await;
        }
        projects::update(&self.pool, id, update)
            .await
            .map_err(GateError::from)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        projects::delete(&self.pool, id)
            .await
            .map_err(GateError::from)
    }
}
