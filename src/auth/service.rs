// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and authentication.
//!
//! [`AuthService`] ties the stateless [`TokenCodec`] to the identity store:
//! a token only authenticates while its signature verifies, it has not
//! expired, and its subject still names an account.

use std::sync::Arc;

use chrono::Duration;

use super::{AuthError, Clock, Identity, SystemClock, TokenCodec};
use crate::storage::StorageResult;

/// Read path to the accounts a token subject can resolve to.
pub trait IdentityStore: Send + Sync {
    /// Look up an identity by its subject key.
    fn find_by_subject(&self, subject: &str) -> StorageResult<Option<Identity>>;
}

/// Issues and authenticates bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    ttl: Duration,
    identities: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create a service using the wall clock.
    pub fn new(codec: TokenCodec, ttl: Duration, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            codec,
            ttl,
            identities,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a token for an identity that has just proven its credentials.
    pub fn issue_for(&self, identity: &Identity) -> Result<String, AuthError> {
        self.codec.issue(identity.subject(), self.clock.now(), self.ttl)
    }

    /// Resolve a raw bearer token to the identity it was issued for.
    ///
    /// The store is only consulted once the token itself checks out.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let verified = self.codec.verify(token, self.clock.now())?;

        self.identities
            .find_by_subject(&verified.subject)?
            .ok_or(AuthError::UnknownSubject)
    }

    /// Whether `token` currently authenticates as exactly `identity`.
    pub fn is_valid_for(&self, token: &str, identity: &Identity) -> bool {
        matches!(self.authenticate(token), Ok(found) if &found == identity)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
