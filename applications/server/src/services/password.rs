/// Password hashing and the registration password policy
use crate::error::{Result, ServerError};
use thiserror::Error;

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the "special character" rule
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// One-way salted password hasher (bcrypt)
///
/// Every hash gets a fresh random salt; `verify` compares in constant time.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost).map_err(ServerError::from)
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`. A malformed stored hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }
}

/// Rule a rejected password broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("password must be at least {} characters long", MIN_PASSWORD_LENGTH)]
    TooShort,

    #[error("password must contain an uppercase letter")]
    MissingUppercase,

    #[error("password must contain a lowercase letter")]
    MissingLowercase,

    #[error("password must contain a digit")]
    MissingDigit,

    #[error("password must contain one of the special characters {}", SPECIAL_CHARACTERS)]
    MissingSpecial,
}

/// Check a candidate password against the registration policy
///
/// Rules are checked in a fixed order and the first violation is reported.
pub fn check_password_policy(password: &str) -> std::result::Result<(), PolicyViolation> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PolicyViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PolicyViolation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PolicyViolation::MissingSpecial);
    }
    Ok(())
}

impl From<PolicyViolation> for ServerError {
    fn from(violation: PolicyViolation) -> Self {
        ServerError::Validation(violation.to_string())
    }
}
