// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every credential failure collapses into the same 401 body at the HTTP
//! boundary. The precise kind is only visible to logs and tests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No bearer token on a route that needs one
    #[error("authentication is required")]
    MissingCredentials,
    /// Token could not be decoded
    #[error("token is malformed")]
    MalformedToken,
    /// Signature does not match the claims
    #[error("token signature is invalid")]
    BadSignature,
    /// Token expiration is not in the future
    #[error("token has expired")]
    Expired,
    /// Token subject no longer names an account
    #[error("token subject does not match any account")]
    UnknownSubject,
    /// Username/password pair rejected at login
    #[error("invalid username or password")]
    InvalidCredentials,
    /// Store or hashing fault
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Machine-readable kind, for logs and audit records only.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::MalformedToken => "malformed_token",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<crate::storage::StorageError> for AuthError {
    fn from(e: crate::storage::StorageError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status == StatusCode::UNAUTHORIZED {
            AuthErrorBody {
                error: "Authentication failed",
                error_code: "authentication_failed",
            }
        } else {
            tracing::error!(error = %self, "Authentication fault");
            AuthErrorBody {
                error: "Internal server error",
                error_code: "internal_error",
            }
        };
        (status, Json(body)).into_response()
    }
}
