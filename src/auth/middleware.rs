// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication middleware.
//!
//! Runs once per request, ahead of body extraction and every handler:
//!
//! - `OPTIONS` (CORS pre-flight) passes straight through.
//! - No `Authorization: Bearer ...` header: the request continues
//!   unauthenticated. Public routes accept it; protected routes reject it
//!   through the [`Auth`](super::Auth) extractor.
//! - A bearer token is present: it must authenticate. On success the
//!   [`Identity`](super::Identity) is stored in the request extensions. On
//!   failure the request ends here with the generic 401. Failures are logged
//!   at `debug`; a signed token whose account is gone is also audited.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate_request));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    audit_log,
    state::AppState,
    storage::{AuditEvent, AuditEventType},
};

use super::AuthError;

/// Extract the bearer token, if the request carries one.
///
/// Headers using another scheme are treated as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Authentication middleware function.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match state.auth().authenticate(token) {
        Ok(identity) => {
            tracing::trace!(username = %identity, "Request authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                kind = e.kind(),
                method = %request.method(),
                path = %request.uri().path(),
                "Authentication failed"
            );
            // Audited only once the signature has verified.
            if e == AuthError::UnknownSubject {
                audit_log!(
                    state.storage(),
                    AuditEvent::new(AuditEventType::AuthFailure)
                        .with_details(serde_json::json!({ "path": request.uri().path() }))
                        .failed(e.kind())
                );
            }
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer  padded ")), Some("padded"));
    }

    #[test]
    fn other_schemes_are_absent() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("bearer lowercase")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
