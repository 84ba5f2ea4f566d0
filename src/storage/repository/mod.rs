// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to file storage.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the FileStorage for all file operations.

pub mod lists;
pub mod tasks;
pub mod users;

pub use lists::{StoredTaskList, TaskListRepository};
pub use tasks::{StoredTask, TaskRepository};
pub use users::{StoredUser, UserRepository};
