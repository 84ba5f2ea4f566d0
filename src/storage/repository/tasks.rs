// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Task repository.
//!
//! Tasks are stored as `tasks/{task_id}.json`, each naming its parent list.
//! A task is looked up by its own ID; whether it belongs to the list named
//! in the request is decided by the access guard, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{is_safe_stem, FileStorage, ListScoped, StorageError, StorageResult};

/// Task stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTask {
    /// Unique task identifier (UUID)
    pub id: String,
    /// Parent list ID
    pub list_id: String,
    /// Trimmed description, unique within the list
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTask {
    /// Create a new, incomplete task inside `list_id`.
    pub fn new(list_id: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            list_id: list_id.into(),
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ListScoped for StoredTask {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn parent_list_id(&self) -> &str {
        &self.list_id
    }
}

/// Repository for task operations.
pub struct TaskRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> TaskRepository<'a> {
    /// Create a new TaskRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a task exists.
    pub fn exists(&self, task_id: &str) -> bool {
        is_safe_stem(task_id) && self.storage.exists(self.storage.paths().task(task_id))
    }

    /// Find a task by ID, `None` if absent.
    pub fn find(&self, task_id: &str) -> StorageResult<Option<StoredTask>> {
        if !self.exists(task_id) {
            return Ok(None);
        }
        match self.storage.read_json(self.storage.paths().task(task_id)) {
            Ok(task) => Ok(Some(task)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new task.
    pub fn create(&self, task: &StoredTask) -> StorageResult<()> {
        if self.exists(&task.id) {
            return Err(StorageError::AlreadyExists(format!("Task {}", task.id)));
        }

        self.storage.write_json(self.storage.paths().task(&task.id), task)
    }

    /// Update an existing task.
    pub fn update(&self, task: &StoredTask) -> StorageResult<()> {
        if !self.exists(&task.id) {
            return Err(StorageError::NotFound(format!("Task {}", task.id)));
        }

        self.storage.write_json(self.storage.paths().task(&task.id), task)
    }

    /// All tasks of a list, oldest first.
    pub fn list_by_list(&self, list_id: &str) -> StorageResult<Vec<StoredTask>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().tasks_dir(), "json")?;

        let mut tasks = Vec::new();
        for id in ids {
            match self.find(&id) {
                Ok(Some(task)) if task.list_id == list_id => tasks.push(task),
                Ok(_) => {}
                Err(e) => tracing::warn!(task_id = %id, error = %e, "Failed to read task"),
            }
        }
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    /// Find a task in `list_id` with exactly this description.
    pub fn find_by_description(
        &self,
        list_id: &str,
        description: &str,
    ) -> StorageResult<Option<StoredTask>> {
        Ok(self
            .list_by_list(list_id)?
            .into_iter()
            .find(|task| task.description == description))
    }

    /// Delete every task of a list. Returns how many were removed.
    pub fn delete_by_list(&self, list_id: &str) -> StorageResult<usize> {
        let tasks = self.list_by_list(list_id)?;
        for task in &tasks {
            self.storage.delete(self.storage.paths().task(&task.id))?;
        }
        Ok(tasks.len())
    }
}
