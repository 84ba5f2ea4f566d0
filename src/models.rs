// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` and/or `Deserialize` plus
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! Requests carry a `validate` (or `normalize`) method that turns raw input
//! into the canonical form stored on disk, or a 400.
//!
//! ## Model Categories
//!
//! - **Auth**: Registration, login, tokens
//! - **Lists**: Task lists and their collaborators
//! - **Tasks**: Items inside a list

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    storage::{is_safe_stem, AccessDecision, StoredTask, StoredTaskList, StoredUser},
};

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Normalization helpers
// =============================================================================

/// Canonical username: trimmed and lower-cased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// First letter upper-case, rest lower-case, surrounding whitespace removed.
pub fn capitalise(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `local@domain.tld` with a 2-3 letter TLD, ASCII only.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = (2..=3).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}

fn require_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{field} cannot be blank.")));
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// At least 8 characters.
    pub password: String,
}

/// A registration request after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl RegisterRequest {
    /// Validate and normalize everything but the password.
    pub fn normalize(&self) -> Result<NewAccount, ApiError> {
        require_text(&self.first_name, "First Name")?;
        require_text(&self.last_name, "Last Name")?;
        require_text(&self.username, "Username")?;
        require_text(&self.email, "Email")?;

        if self.password.trim().is_empty() {
            return Err(ApiError::bad_request("Password cannot be blank."));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(
                "Password must be at least 8 characters long.",
            ));
        }

        let username = normalize_username(&self.username);
        if !is_safe_stem(&username) {
            return Err(ApiError::bad_request(
                "Username may only contain letters, digits, '.', '_' and '-'.",
            ));
        }

        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::bad_request("Please provide a valid email address."));
        }

        Ok(NewAccount {
            first_name: capitalise(&self.first_name),
            last_name: capitalise(&self.last_name),
            username,
            email,
        })
    }
}

/// Login credentials.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.username, "Username")?;
        if self.password.trim().is_empty() {
            return Err(ApiError::bad_request("Password cannot be blank."));
        }
        Ok(())
    }
}

/// Issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Public profile of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// List Models
// =============================================================================

/// Request to create a task list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateListRequest {
    pub title: String,
}

impl CreateListRequest {
    /// Trimmed, non-blank title.
    pub fn validate(&self) -> Result<String, ApiError> {
        require_text(&self.title, "Title")
    }
}

/// Request to rename a task list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateListTitleRequest {
    pub title: String,
}

impl UpdateListTitleRequest {
    pub fn validate(&self) -> Result<String, ApiError> {
        require_text(&self.title, "Title")
    }
}

/// Request to add collaborators to a list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddCollaboratorsRequest {
    pub collaborators: Vec<String>,
}

impl AddCollaboratorsRequest {
    /// Normalized, de-duplicated usernames.
    pub fn validate(&self) -> Result<BTreeSet<String>, ApiError> {
        if self.collaborators.is_empty() {
            return Err(ApiError::bad_request(
                "Please provide at least one collaborator.",
            ));
        }
        self.collaborators
            .iter()
            .map(|name| require_text(name, "Collaborator username").map(|n| normalize_username(&n)))
            .collect()
    }
}

/// Request to remove one collaborator.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemoveCollaboratorRequest {
    pub username: String,
}

impl RemoveCollaboratorRequest {
    pub fn validate(&self) -> Result<String, ApiError> {
        require_text(&self.username, "Collaborator username").map(|n| normalize_username(&n))
    }
}

/// Task list summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub collaborators: Vec<String>,
    /// The caller's relationship with this list.
    pub access: AccessDecision,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskListResponse {
    pub fn new(list: StoredTaskList, access: AccessDecision) -> Self {
        Self {
            id: list.id,
            title: list.title,
            owner: list.owner,
            collaborators: list.collaborators.into_iter().collect(),
            access,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// A task list together with its tasks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskListDetailResponse {
    #[serde(flatten)]
    pub list: TaskListResponse,
    pub tasks: Vec<TaskResponse>,
}

/// Task lists visible to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskListCollection {
    pub lists: Vec<TaskListResponse>,
    pub total: usize,
}

/// Collaborators of a list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorsResponse {
    pub list_id: String,
    pub owner: String,
    pub collaborators: Vec<String>,
}

impl From<StoredTaskList> for CollaboratorsResponse {
    fn from(list: StoredTaskList) -> Self {
        Self {
            list_id: list.id,
            owner: list.owner,
            collaborators: list.collaborators.into_iter().collect(),
        }
    }
}

// =============================================================================
// Task Models
// =============================================================================

/// Request to create a task.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub description: String,
}

impl CreateTaskRequest {
    /// Trimmed, non-blank description.
    pub fn validate(&self) -> Result<String, ApiError> {
        require_text(&self.description, "Description")
    }
}

/// Request to change a task's description.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTaskDescriptionRequest {
    pub description: String,
}

impl UpdateTaskDescriptionRequest {
    pub fn validate(&self) -> Result<String, ApiError> {
        require_text(&self.description, "Description")
    }
}

/// Request to mark a task complete or incomplete.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    pub completed: bool,
}

/// A task.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: String,
    pub list_id: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredTask> for TaskResponse {
    fn from(task: StoredTask) -> Self {
        Self {
            id: task.id,
            list_id: task.list_id,
            description: task.description,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Tasks of one list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskCollection {
    pub list_id: String,
    pub tasks: Vec<TaskResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "  aLICE ".into(),
            last_name: "smith".into(),
            username: "  Alice ".into(),
            email: " Alice@Example.COM ".into(),
            password: "password123".into(),
        }
    }

    #[test]
    fn capitalise_handles_edge_cases() {
        assert_eq!(capitalise("  jOHN "), "John");
        assert_eq!(capitalise("a"), "A");
        assert_eq!(capitalise("   "), "");
    }

    #[test]
    fn registration_is_normalized() {
        let account = registration().normalize().unwrap();
        assert_eq!(
            account,
            NewAccount {
                first_name: "Alice".into(),
                last_name: "Smith".into(),
                username: "alice".into(),
                email: "alice@example.com".into(),
            }
        );
    }

    #[test]
    fn registration_rejects_short_password() {
        let mut req = registration();
        req.password = "short".into();
        let err = req.normalize().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("8 characters"));
    }

    #[test]
    fn registration_rejects_bad_email_and_username() {
        let mut req = registration();
        req.email = "not-an-email".into();
        assert!(req.normalize().is_err());

        let mut req = registration();
        req.username = "../etc".into();
        assert!(req.normalize().is_err());

        let mut req = registration();
        req.first_name = " ".into();
        assert_eq!(req.normalize().unwrap_err().message, "First Name cannot be blank.");
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("bob.smith+tag@mail.example.io"));
        assert!(!is_valid_email("bob@example"));
        assert!(!is_valid_email("bob@example.info"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn titles_and_descriptions_are_trimmed() {
        let title = CreateListRequest { title: "  Groceries ".into() }.validate().unwrap();
        assert_eq!(title, "Groceries");

        assert!(CreateTaskRequest { description: "   ".into() }.validate().is_err());
    }

    #[test]
    fn collaborators_are_normalized_and_deduplicated() {
        let names = AddCollaboratorsRequest {
            collaborators: vec!["Bob".into(), " bob ".into(), "carol".into()],
        }
        .validate()
        .unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["bob", "carol"]);

        assert!(AddCollaboratorsRequest { collaborators: vec![] }.validate().is_err());
    }
}
