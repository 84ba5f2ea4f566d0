// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated identity representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The identity a request acts as.
///
/// Produced by [`AuthService::authenticate`](super::AuthService::authenticate)
/// and bound to the request by the authentication middleware. The username
/// is the stable subject key carried in tokens and stored as list owner /
/// collaborator references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Canonical username (lower-case, trimmed).
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Subject key used in tokens.
    pub fn subject(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}
