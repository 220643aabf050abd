use std::sync::Arc;

use actix_web::{
    delete,
    error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized},
    post, put, web, Error, HttpResponse, Responder,
};
use tracing::{error, info};

use crate::auth::sign_jwt;
use crate::errors::StoreError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::User;
use crate::types::{
    DeleteAccountRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
    UpdateProfileRequest,
};
use crate::AppState;

#[post("/register")]
pub async fn register(
    app_state: web::Data<Arc<AppState>>,
    web::Json(req): web::Json<RegisterRequest>,
) -> Result<impl Responder, Error> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ErrorBadRequest("Please fill in all fields"));
    }

    let user = User::register(&app_state.pool, req.username.trim(), req.email.trim(), &req.password)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateUser => ErrorBadRequest("Username or email already registered"),
            e => {
                error!("Failed to register user: {:?}", e);
                ErrorInternalServerError("An error occurred during registration")
            }
        })?;

    let token = sign_jwt(user.id, &app_state.config.jwt_secret).map_err(|e| {
        error!("Failed to sign JWT: {:?}", e);
        ErrorInternalServerError("An error occurred during registration")
    })?;

    info!("User registered: {}", user.username);
    Ok(web::Json(TokenResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

#[post("/login")]
pub async fn login(
    app_state: web::Data<Arc<AppState>>,
    web::Json(req): web::Json<LoginRequest>,
) -> Result<impl Responder, Error> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ErrorBadRequest("Please fill in all fields"));
    }

    let user = User::authenticate(&app_state.pool, req.email.trim(), &req.password)
        .await
        .map_err(|e| {
            error!("Failed to authenticate user: {:?}", e);
            ErrorInternalServerError("An error occurred during login")
        })?
        // One generic failure for unknown email and wrong password alike.
        .ok_or_else(|| ErrorUnauthorized("Invalid email or password"))?;

    let token = sign_jwt(user.id, &app_state.config.jwt_secret).map_err(|e| {
        error!("Failed to sign JWT: {:?}", e);
        ErrorInternalServerError("An error occurred during login")
    })?;

    Ok(web::Json(TokenResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

/// Tokens are stateless, so logout is a client-side discard.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::NoContent().finish()
}

#[put("/profile")]
pub async fn update_profile(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(req): web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, Error> {
    if req.username.trim().is_empty() {
        return Err(ErrorBadRequest("Username is required"));
    }

    let user = User::change_username(
        &app_state.pool,
        authenticated_user.user_id,
        req.username.trim(),
    )
    .await
    .map_err(|e| match e {
        StoreError::DuplicateUser => ErrorBadRequest("Username already taken"),
        e => {
            error!("Failed to update profile: {:?}", e);
            ErrorInternalServerError("Error updating profile")
        }
    })?;

    Ok(web::Json(user))
}

#[post("/reset_password")]
pub async fn reset_password(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(req): web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, Error> {
    if req.current_password.is_empty() || req.new_password.is_empty() || req.confirm_password.is_empty()
    {
        return Err(ErrorBadRequest("All fields are required"));
    }
    if req.new_password != req.confirm_password {
        return Err(ErrorBadRequest("New passwords do not match"));
    }

    User::change_password(
        &app_state.pool,
        authenticated_user.user_id,
        &req.current_password,
        &req.new_password,
    )
    .await
    .map_err(|e| match e {
        StoreError::InvalidCredentials => ErrorBadRequest("Current password is incorrect"),
        e => {
            error!("Failed to reset password: {:?}", e);
            ErrorInternalServerError("Error resetting password")
        }
    })?;

    Ok(HttpResponse::Ok().finish())
}

#[delete("/account")]
pub async fn delete_account(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(req): web::Json<DeleteAccountRequest>,
) -> Result<impl Responder, Error> {
    if req.password.is_empty() {
        return Err(ErrorBadRequest("Password is required"));
    }

    User::delete(&app_state.pool, authenticated_user.user_id, &req.password)
        .await
        .map_err(|e| match e {
            StoreError::InvalidCredentials => ErrorBadRequest("Incorrect password"),
            e => {
                error!("Failed to delete account: {:?}", e);
                ErrorInternalServerError("Error deleting account")
            }
        })?;

    info!("Account deleted: {}", authenticated_user.user_id);
    Ok(HttpResponse::NoContent().finish())
}
