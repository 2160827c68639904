//! Authentication extractor.
//!
//! `Guarded<P>` runs the full chain on every request: token extraction
//! (Authorization header or `jwt` cookie), signature/expiry verification,
//! principal resolution against current user records, then the role check.
//! The principal is resolved fresh each request, so a role change or deleted
//! account takes effect immediately regardless of what the token claims.

use crate::domain::{Role, StringUuid, User};
use crate::jwt::TokenError;
use crate::policy::RolePredicate;
use crate::repository::UserRepository;
use crate::state::AuthState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::marker::PhantomData;
use thiserror::Error;

/// Cookie carrying the access token for browser clients
pub const AUTH_COOKIE: &str = "jwt";

/// Resolved request identity. Always reflects the current database record,
/// never the token payload alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: StringUuid,
    pub role: Role,
    pub agency_id: Option<StringUuid>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            agency_id: user.agency_id,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,

    #[error("Malformed Authorization header")]
    InvalidHeader,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unknown principal")]
    UnknownPrincipal,

    #[error("Access denied: requires {0}")]
    InsufficientRole(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            AuthError::InvalidHeader => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Malformed Authorization header".to_string(),
            ),
            AuthError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Token has expired".to_string(),
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid token".to_string(),
            ),
            AuthError::UnknownPrincipal => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid token".to_string(),
            ),
            AuthError::InsufficientRole(required) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                format!("Access denied. Requires {}.", required),
            ),
            AuthError::Internal(detail) => {
                tracing::error!("Auth resolution error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// An authenticated principal that satisfied the role predicate `P`.
///
/// Adding this extractor to a handler signature is the only way a route
/// becomes authenticated; there is no separate middleware layer to forget.
pub struct Guarded<P: RolePredicate> {
    pub principal: Principal,
    _predicate: PhantomData<P>,
}

/// Pull the raw token out of the request: Authorization header first, then
/// the `jwt` cookie. A present-but-malformed header is an error, not a
/// fallthrough to the cookie.
fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::InvalidHeader)?;
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(AuthError::InvalidHeader),
        };
    }

    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        let token = cookie.value();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    Err(AuthError::MissingToken)
}

impl<S, P> FromRequestParts<S> for Guarded<P>
where
    S: AuthState,
    P: RolePredicate,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims = state
            .jwt_manager()
            .verify_access_token(&token)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::TokenExpired,
                TokenError::Invalid => AuthError::InvalidToken,
            })?;

        let user_id =
            StringUuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = state
            .users()
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UnknownPrincipal)?;

        if !P::allows(user.role) {
            tracing::debug!(
                user_id = %user.id,
                role = %user.role,
                required = P::describe(),
                "Role check failed"
            );
            return Err(AuthError::InsufficientRole(P::describe()));
        }

        Ok(Guarded {
            principal: Principal::from(&user),
            _predicate: PhantomData,
        })
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: AuthState,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guarded = Guarded::<crate::policy::AnyRole>::from_request_parts(parts, state).await?;
        Ok(guarded.principal)
    }
}
