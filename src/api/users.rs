// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{
    auth::{Auth, AuthError},
    error::ApiError,
    models::UserResponse,
    state::AppState,
    storage::UserRepository,
};

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepository::new(state.storage())
        .find(&identity.username)?
        .ok_or(AuthError::UnknownSubject)?;

    Ok(Json(user.into()))
}
