/// Account registration and credential checks on top of the user store
use crate::{
    error::{Result, ServerError},
    services::password::{check_password_policy, PasswordHasher},
};
use gatehouse_core::{NewUser, Role, User, UserStore};
use std::sync::Arc;

pub const MAX_USERNAME_LENGTH: usize = 64;

/// Verified against when the username is unknown, so both failure paths pay
/// for one bcrypt verification
const TIMING_EQUALIZER_PASSWORD: &str = "gatehouse-timing-equalizer";

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    dummy_hash: Arc<str>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self> {
        let dummy_hash = hasher.hash(TIMING_EQUALIZER_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Create an account
    ///
    /// Username and password policy are checked before anything touches the
    /// store. The password is hashed before persistence and never logged.
    pub async fn register(&self, username: &str, password: &str, role: Role) -> Result<User> {
        validate_username(username)?;
        check_password_policy(password)?;

        if self.users.username_exists(username).await? {
            tracing::warn!(username, "registration rejected: username taken");
            return Err(username_taken(username));
        }

        let password_hash = self.hash_blocking(password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await
            .map_err(|e| match ServerError::from(e) {
                // Lost a race with a concurrent registration of the same name
                ServerError::Conflict(_) => username_taken(username),
                other => other,
            })?;

        tracing::info!(username, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check a username/password pair
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let credentials = self.users.find_credentials(username).await?;

        match credentials {
            Some(credentials) => {
                if self
                    .verify_blocking(password, &credentials.password_hash)
                    .await?
                {
                    Ok(credentials.user)
                } else {
                    Err(ServerError::invalid_credentials())
                }
            }
            None => {
                self.verify_blocking(password, &self.dummy_hash).await?;
                Err(ServerError::invalid_credentials())
            }
        }
    }

    /// Resolve a token subject to its current account
    pub async fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.find_user(username).await?)
    }

    /// All accounts, ordered by username
    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.get_all_users().await?)
    }

    async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = self.hasher;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServerError::Internal(format!("hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool> {
        let hasher = self.hasher;
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ServerError::Internal(format!("verification task failed: {}", e)))?
    }
}

fn username_taken(username: &str) -> ServerError {
    ServerError::Conflict(format!("Username '{}' already registered", username))
}

fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(ServerError::Validation("username must not be empty".to_string()));
    }
    if username.trim() != username {
        return Err(ServerError::Validation(
            "username must not start or end with whitespace".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ServerError::Validation(format!(
            "username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(())
}
