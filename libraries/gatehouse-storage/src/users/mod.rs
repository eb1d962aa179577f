//! User account queries

use crate::StorageError;
use gatehouse_core::types::{Role, User, UserCredentials, UserId};
use sqlx::SqlitePool;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    role: Role,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            role: row.role,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    username: String,
    role: Role,
    password_hash: String,
}

/// Insert a new user
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `username` - Login name, must be unique
/// * `password_hash` - Already-hashed password (bcrypt)
/// * `role` - Access role
///
/// # Errors
///
/// Returns [`StorageError::Duplicate`] when the username is taken. The UNIQUE
/// constraint is authoritative, so two racing inserts cannot both succeed.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: Role,
) -> Result<User> {
    let now = chrono::Utc::now().timestamp();

    let inserted = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (username, password_hash, role, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING id, username, role",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(row.into()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StorageError::Duplicate(
            format!("username '{}' already exists", username),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Get a user by username
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>("SELECT id, username, role FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(User::from))
}

/// Get a user and their password hash by username
pub async fn get_credentials(pool: &SqlitePool, username: &str) -> Result<Option<UserCredentials>> {
    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, username, role, password_hash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| UserCredentials {
        user: User {
            id: r.id,
            username: r.username,
            role: r.role,
        },
        password_hash: r.password_hash,
    }))
}

/// Check whether a username is registered
pub async fn exists(pool: &SqlitePool, username: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>("SELECT id, username, role FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(User::from).collect())
}
