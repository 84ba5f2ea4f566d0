// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Task list repository.
//!
//! Each list is stored as `lists/{list_id}.json` and carries its owner and
//! collaborator set. Lookups that are made on behalf of a user go through
//! [`TaskListRepository::find_with_access`], which answers "absent" both when
//! the list does not exist and when the user has no relationship with it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{
    decide_for_list, is_safe_stem, FileStorage, SharedResource, StorageError, StorageResult,
};
use crate::auth::Identity;

/// Task list stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTaskList {
    /// Unique list identifier (UUID)
    pub id: String,
    /// Title, unique per owner
    pub title: String,
    /// Owner username, fixed at creation
    pub owner: String,
    /// Collaborator usernames
    #[serde(default)]
    pub collaborators: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTaskList {
    /// Create a new list owned by `owner`.
    pub fn new(title: impl Into<String>, owner: &Identity) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            owner: owner.username.clone(),
            collaborators: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl SharedResource for StoredTaskList {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn is_collaborator(&self, username: &str) -> bool {
        self.collaborators.contains(username)
    }
}

/// Repository for task list operations.
pub struct TaskListRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> TaskListRepository<'a> {
    /// Create a new TaskListRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a list exists.
    pub fn exists(&self, list_id: &str) -> bool {
        is_safe_stem(list_id) && self.storage.exists(self.storage.paths().list(list_id))
    }

    /// Get a list by ID, without any access check.
    pub fn get(&self, list_id: &str) -> StorageResult<StoredTaskList> {
        if !self.exists(list_id) {
            return Err(StorageError::NotFound(format!("List {list_id}")));
        }
        self.storage.read_json(self.storage.paths().list(list_id))
    }

    /// Find a list the actor owns or collaborates on.
    ///
    /// Returns `None` when the list does not exist or when the actor has no
    /// access; the two cases are indistinguishable to the caller.
    pub fn find_with_access(
        &self,
        list_id: &str,
        actor: &Identity,
    ) -> StorageResult<Option<StoredTaskList>> {
        match self.get(list_id) {
            Ok(list) if decide_for_list(&list, actor).has_access() => Ok(Some(list)),
            Ok(_) | Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new list.
    pub fn create(&self, list: &StoredTaskList) -> StorageResult<()> {
        if self.exists(&list.id) {
            return Err(StorageError::AlreadyExists(format!("List {}", list.id)));
        }

        self.storage.write_json(self.storage.paths().list(&list.id), list)
    }

    /// Update an existing list.
    pub fn update(&self, list: &StoredTaskList) -> StorageResult<()> {
        if !self.exists(&list.id) {
            return Err(StorageError::NotFound(format!("List {}", list.id)));
        }

        self.storage.write_json(self.storage.paths().list(&list.id), list)
    }

    /// Delete a list.
    pub fn delete(&self, list_id: &str) -> StorageResult<()> {
        if !self.exists(list_id) {
            return Err(StorageError::NotFound(format!("List {list_id}")));
        }

        self.storage.delete(self.storage.paths().list(list_id))
    }

    fn list_all(&self) -> StorageResult<Vec<StoredTaskList>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().lists_dir(), "json")?;

        let mut lists = Vec::new();
        for id in ids {
            match self.get(&id) {
                Ok(list) => lists.push(list),
                Err(StorageError::NotFound(_)) => {}
                Err(e) => tracing::warn!(list_id = %id, error = %e, "Failed to read task list"),
            }
        }
        Ok(lists)
    }

    /// All lists the actor owns or collaborates on, oldest first.
    pub fn list_accessible(&self, actor: &Identity) -> StorageResult<Vec<StoredTaskList>> {
        let mut lists: Vec<_> = self
            .list_all()?
            .into_iter()
            .filter(|list| decide_for_list(list, actor).has_access())
            .collect();
        lists.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(lists)
    }

    /// Find a list owned by `owner` with exactly this title.
    pub fn find_by_title_and_owner(
        &self,
        title: &str,
        owner: &str,
    ) -> StorageResult<Option<StoredTaskList>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|list| list.owner == owner && list.title == title))
    }
}
