// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints. Both are public.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    audit_log,
    auth::{
        password::{hash_password, verify_dummy, verify_password},
        AuthError,
    },
    error::ApiError,
    models::{normalize_username, LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    state::AppState,
    storage::{AuditEvent, AuditEventType, StoredUser, UserRepository},
};

/// Create an account.
///
/// Username and email are trimmed and lower-cased; names are capitalised.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Username already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let account = request.normalize()?;
    let password_hash = hash_password(&request.password)?;

    let _guard = state.write_lock().await;
    let repo = UserRepository::new(state.storage());

    if repo.exists(&account.username) {
        return Err(ApiError::conflict("Username already in use."));
    }

    let user = StoredUser {
        username: account.username,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        password_hash,
        created_at: Utc::now(),
    };
    repo.create(&user)?;

    tracing::info!(username = %user.username, "User registered");
    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::UserRegistered).with_user(&user.username)
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;
    let username = normalize_username(&request.username);

    let user = UserRepository::new(state.storage()).find(&username)?;

    let verified = match &user {
        Some(user) => verify_password(&request.password, &user.password_hash)?,
        None => {
            verify_dummy(&request.password);
            false
        }
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::debug!(username = %username, "Login rejected");
        audit_log!(
            state.storage(),
            AuditEvent::new(AuditEventType::LoginFailed)
                .with_user(&username)
                .failed(AuthError::InvalidCredentials.kind())
        );
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = state.auth().issue_for(&user.identity())?;

    tracing::info!(username = %user.username, "Token issued");
    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::AuthSuccess).with_user(&user.username)
    );

    Ok(Json(TokenResponse { token }))
}
