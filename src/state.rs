// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    auth::{AuthService, Clock, TokenCodec},
    config::AppConfig,
    storage::{FileStorage, StoragePaths, StorageResult},
};

/// Shared application state.
///
/// The signing secret inside [`AuthService`] is read-only after startup.
/// Mutations that read a record, change it and write it back hold
/// [`AppState::write_lock`] so concurrent requests cannot lose updates.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<FileStorage>,
    auth: Arc<AuthService>,
    writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Arc<FileStorage>, auth: AuthService) -> Self {
        Self {
            storage,
            auth: Arc::new(auth),
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Initialize storage under the configured data directory and wire the
    /// token service to it.
    pub fn from_config(config: &AppConfig) -> StorageResult<Self> {
        let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
        storage.initialize()?;
        let storage = Arc::new(storage);

        let auth = AuthService::new(
            TokenCodec::new(&config.token_secret),
            config.token_ttl,
            storage.clone(),
        );
        Ok(Self::new(storage, auth))
    }

    /// Replace the clock used for token issuance and expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.auth = Arc::new(self.auth.as_ref().clone().with_clock(clock));
        self
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Serialize read-modify-write sequences against storage.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }
}
