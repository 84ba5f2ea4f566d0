// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

/// Default base directory for all persistent storage.
pub const DATA_ROOT: &str = "./data";

/// Maximum length of any identifier used as a file name.
const MAX_STEM_LEN: usize = 128;

/// Check that an identifier can be used verbatim as a file stem.
///
/// Identifiers reach the filesystem from request paths and bodies, so anything
/// outside `[A-Za-z0-9._-]` (or a leading dot) is refused before a path is built.
pub fn is_safe_stem(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_STEM_LEN
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user accounts.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a user account file, keyed by username.
    pub fn user(&self, username: &str) -> PathBuf {
        self.users_dir().join(format!("{username}.json"))
    }

    // ========== Task List Paths ==========

    /// Directory containing all task lists.
    pub fn lists_dir(&self) -> PathBuf {
        self.root.join("lists")
    }

    /// Path to a specific task list file.
    pub fn list(&self, list_id: &str) -> PathBuf {
        self.lists_dir().join(format!("{list_id}.json"))
    }

    // ========== Task Paths ==========

    /// Directory containing all tasks.
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    /// Path to a specific task file.
    pub fn task(&self, task_id: &str) -> PathBuf {
        self.tasks_dir().join(format!("{task_id}.json"))
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}
