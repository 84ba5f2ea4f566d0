// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use crate::{
    auth::{password::hash_password, AuthService, TokenCodec},
    state::AppState,
    storage::{FileStorage, StoragePaths, StoredUser, UserRepository},
};

pub const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-sec";

/// Fresh state over an empty temporary data directory.
pub fn test_state() -> (TempDir, AppState) {
    let temp = TempDir::new().unwrap();
    let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
    storage.initialize().unwrap();
    let storage = Arc::new(storage);

    let auth = AuthService::new(
        TokenCodec::new(TEST_SECRET),
        Duration::hours(1),
        storage.clone(),
    );
    (temp, AppState::new(storage, auth))
}

/// Store an account with password `password123`.
pub fn seed_user(state: &AppState, username: &str) -> StoredUser {
    let user = StoredUser {
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password("password123").unwrap(),
        created_at: Utc::now(),
    };
    UserRepository::new(state.storage()).create(&user).unwrap();
    user
}
