/// Access control: bearer token authentication and role gating
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use gatehouse_core::{RequiredRole, Role, UserId};

/// Identity attached to the request once its token has been verified and
/// its subject resolved to a stored account
///
/// Can be used as an extractor in handlers behind [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

/// Extractor that only admits callers with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

/// Pull the token out of an `Authorization: Bearer <token>` header value
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Role-check predicate: `Forbidden` unless `user` satisfies `required`
pub fn authorize(user: &AuthenticatedUser, required: RequiredRole) -> Result<(), ServerError> {
    if user.role.satisfies(required) {
        return Ok(());
    }

    tracing::warn!(
        username = %user.username,
        role = %user.role,
        "request rejected: insufficient role"
    );
    Err(ServerError::Forbidden(match required {
        RequiredRole::Only(Role::Admin) => "Admin privileges required".to_string(),
        RequiredRole::Only(role) => format!("{} role required", role),
        RequiredRole::Any => "Access denied".to_string(),
    }))
}

/// Middleware that extracts and validates the JWT from the Authorization header
///
/// Missing, malformed, forged and expired tokens, and tokens whose subject no
/// longer exists, are all rejected with the same 401 before the request
/// reaches a handler. The stored role wins over the role in the claims.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(ServerError::invalid_token)?;

    let claims = app_state.tokens.verify(token)?;

    let user = app_state.accounts.find(&claims.sub).await?.ok_or_else(|| {
        tracing::debug!(sub = %claims.sub, "token rejected: unknown subject");
        ServerError::invalid_token()
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: user.id,
        username: user.username,
        role: user.role,
    });

    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(ServerError::invalid_token)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        authorize(&user, RequiredRole::Only(Role::Admin))?;
        Ok(AdminUser(user))
    }
}
