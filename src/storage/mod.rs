// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for accounts, task lists and tasks, plus the access
//! guard that every list- and task-scoped operation goes through.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   users/{username}.json
//!   lists/{list_id}.json     # title, owner, collaborators
//!   tasks/{task_id}.json     # parent list_id, description, completed
//!   audit/{date}/events.jsonl
//! ```

pub mod audit;
pub mod fs;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use fs::{FileStorage, StorageError, StorageResult};
pub use ownership::{
    authorize, decide_for_list, decide_for_task, AccessDecision, AccessEnforcer, AccessError,
    ListScoped, Operation, SharedResource,
};
pub use paths::{is_safe_stem, StoragePaths};
pub use repository::{
    StoredTask, StoredTaskList, StoredUser, TaskListRepository, TaskRepository, UserRepository,
};
