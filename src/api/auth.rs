//! Auth endpoints: registration, login/logout, email verification, profile
//! and settings.

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{
    CreateUserInput, UpdateProfileInput, UpdateSettingsInput, User, UserSettings,
};
use crate::error::Result;
use crate::middleware::auth::AUTH_COOKIE;
use crate::middleware::Principal;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

fn auth_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build()
}

fn cleared_auth_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

pub async fn register<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let (user, token) = state.auth_service().register(input).await?;
    let jar = jar.add(auth_cookie(&token));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse { user, token }),
    ))
}

pub async fn login<S: HasServices>(
    State(state): State<S>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (user, token) = state
        .auth_service()
        .login(&request.email, &request.password)
        .await?;
    let jar = jar.add(auth_cookie(&token));

    Ok((jar, Json(AuthResponse { user, token })))
}

/// Clears the `jwt` cookie. Bearer tokens remain valid until expiry; there
/// is no server-side revocation list.
///
/// The removal cookie is added to the jar rather than `remove`d from it:
/// `CookieJar::remove` only emits a `Set-Cookie` for cookies present in the
/// request, which would leave bearer-only clients without one.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(cleared_auth_cookie());
    (jar, Json(MessageResponse::new("Logged out")))
}

pub async fn verify_email<S: HasServices>(
    State(state): State<S>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .auth_service()
        .verify_email(&request.email, &request.code)
        .await?;
    Ok(Json(MessageResponse::new("Email verified")))
}

pub async fn resend_verification<S: HasServices>(
    State(state): State<S>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .auth_service()
        .resend_verification(&request.email)
        .await?;
    Ok(Json(MessageResponse::new("Verification code sent")))
}

pub async fn reset_password<S: HasServices>(
    State(state): State<S>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .auth_service()
        .reset_password(&request.email, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}

pub async fn me<S: HasServices>(
    State(state): State<S>,
    principal: Principal,
) -> Result<Json<SuccessResponse<User>>> {
    let user = state.user_service().get_profile(&principal).await?;
    Ok(Json(SuccessResponse::new(user)))
}

pub async fn get_profile<S: HasServices>(
    State(state): State<S>,
    principal: Principal,
) -> Result<Json<SuccessResponse<User>>> {
    let user = state.user_service().get_profile(&principal).await?;
    Ok(Json(SuccessResponse::new(user)))
}

pub async fn update_profile<S: HasServices>(
    State(state): State<S>,
    principal: Principal,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<SuccessResponse<User>>> {
    let user = state
        .user_service()
        .update_profile(&principal, input)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

pub async fn get_settings<S: HasServices>(
    State(state): State<S>,
    principal: Principal,
) -> Result<Json<SuccessResponse<UserSettings>>> {
    let settings = state.user_service().get_settings(&principal).await?;
    Ok(Json(SuccessResponse::new(settings)))
}

pub async fn update_settings<S: HasServices>(
    State(state): State<S>,
    principal: Principal,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<Json<SuccessResponse<UserSettings>>> {
    let settings = state
        .user_service()
        .update_settings(&principal, input)
        .await?;
    Ok(Json(SuccessResponse::new(settings)))
}
