// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account repository.
//!
//! Each account is stored as `users/{username}.json`. The username is the
//! immutable identity key; everything else is profile data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{is_safe_stem, FileStorage, StorageError, StorageResult};
use crate::auth::{Identity, IdentityStore};

/// User account stored on disk.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Canonical username (lower-case, trimmed), the identity key.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2id PHC string. Only read at login.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// The identity this account authenticates as.
    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone())
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a username is taken.
    pub fn exists(&self, username: &str) -> bool {
        is_safe_stem(username) && self.storage.exists(self.storage.paths().user(username))
    }

    /// Find a user by username, `None` if absent.
    pub fn find(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        if !self.exists(username) {
            return Ok(None);
        }
        match self.storage.read_json(self.storage.paths().user(username)) {
            Ok(user) => Ok(Some(user)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a user by username.
    pub fn get(&self, username: &str) -> StorageResult<StoredUser> {
        self.find(username)?
            .ok_or_else(|| StorageError::NotFound(format!("User {username}")))
    }

    /// Create a new account.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let username = &user.username;

        if !is_safe_stem(username) {
            return Err(StorageError::SerializationError(format!(
                "Invalid username {username}"
            )));
        }

        if self.exists(username) {
            return Err(StorageError::AlreadyExists(format!("User {username}")));
        }

        self.storage
            .write_json(self.storage.paths().user(username), user)
    }
}

impl IdentityStore for FileStorage {
    fn find_by_subject(&self, subject: &str) -> StorageResult<Option<Identity>> {
        Ok(UserRepository::new(self)
            .find(subject)?
            .map(|user| user.identity()))
    }
}
