/// Access token issuance and verification (HS256 JWT)
use crate::{
    config::{AuthSettings, MAX_TOKEN_EXPIRATION_MINUTES},
    error::{Result, ServerError},
};
use chrono::{DateTime, Duration, Utc};
use gatehouse_core::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Value of `token_type` in login responses
pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub role: Role,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration time
}

/// Issues and verifies signed, time-limited bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        // Expiry is checked by hand in `verify_at` against an explicit clock
        // with zero leeway, so the library's own wall-clock check is disabled.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        let minutes = settings
            .token_expiration_minutes
            .min(MAX_TOKEN_EXPIRATION_MINUTES);
        Self::new(&settings.jwt_secret, Duration::minutes(minutes as i64))
    }

    /// Create an access token for `subject` valid from now
    pub fn issue(&self, subject: &str, role: Role) -> Result<String> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Create an access token as if the current time were `now`
    pub fn issue_at(&self, subject: &str, role: Role, now: DateTime<Utc>) -> Result<String> {
        let exp = now + self.lifetime;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(ServerError::from)
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, structure and expiry as of `now`
    ///
    /// Every failure yields the same `Unauthorized` error; the cause is only
    /// logged at debug level.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                ServerError::invalid_token()
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            tracing::debug!(sub = %claims.sub, "token rejected: expired");
            return Err(ServerError::invalid_token());
        }

        Ok(claims)
    }
}
