// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership and collaboration enforcement for every list and task operation.
//!
//! A task list has exactly one owner and a (possibly empty) set of
//! collaborators. A task has no ownership of its own: its access set is the
//! access set of its parent list. Every handler fetches the resource, asks
//! for an [`AccessDecision`] and checks it against the [`Operation`] policy:
//!
//! | Operation                                   | Owner | Collaborator | Denied |
//! |---------------------------------------------|-------|--------------|--------|
//! | Read list / read task / list tasks          | allow | allow        | reject |
//! | Create task / update task status or text    | allow | allow        | reject |
//! | Delete list                                 | allow | reject       | reject |
//! | Add/remove collaborator, list collaborators | allow | reject       | reject |
//! | Update list title                           | allow | reject       | reject |
//!
//! Decisions are computed from the snapshot handed in by the caller and are
//! never cached, so revoking a collaborator takes effect on the next request.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::Identity;

/// Outcome of an access decision for one actor against one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    /// The actor owns the list.
    Owner,
    /// The actor is a collaborator on the list.
    Collaborator,
    /// The actor has no relationship with the list.
    Denied,
}

impl AccessDecision {
    /// Whether the actor has any access at all.
    pub fn has_access(self) -> bool {
        !matches!(self, AccessDecision::Denied)
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessDecision::Owner => write!(f, "owner"),
            AccessDecision::Collaborator => write!(f, "collaborator"),
            AccessDecision::Denied => write!(f, "denied"),
        }
    }
}

/// Operations gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ReadList,
    ReadTask,
    ListTasks,
    CreateTask,
    UpdateTask,
    DeleteList,
    AddCollaborator,
    RemoveCollaborator,
    ListCollaborators,
    RenameList,
}

impl Operation {
    /// Whether only the owner may perform this operation.
    pub fn requires_owner(self) -> bool {
        match self {
            Operation::ReadList
            | Operation::ReadTask
            | Operation::ListTasks
            | Operation::CreateTask
            | Operation::UpdateTask => false,
            Operation::DeleteList
            | Operation::AddCollaborator
            | Operation::RemoveCollaborator
            | Operation::ListCollaborators
            | Operation::RenameList => true,
        }
    }

    /// Apply the policy table to a decision.
    pub fn permits(self, decision: AccessDecision) -> bool {
        match decision {
            AccessDecision::Owner => true,
            AccessDecision::Collaborator => !self.requires_owner(),
            AccessDecision::Denied => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ReadList => "read_list",
            Operation::ReadTask => "read_task",
            Operation::ListTasks => "list_tasks",
            Operation::CreateTask => "create_task",
            Operation::UpdateTask => "update_task",
            Operation::DeleteList => "delete_list",
            Operation::AddCollaborator => "add_collaborator",
            Operation::RemoveCollaborator => "remove_collaborator",
            Operation::ListCollaborators => "list_collaborators",
            Operation::RenameList => "rename_list",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejections produced by the access guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Actor lacks the relationship the operation requires.
    #[error("user {actor} is not authorised to {operation} on list {list_id}")]
    Denied {
        actor: String,
        list_id: String,
        operation: Operation,
    },
    /// The task named in the request is not a child of the list named in the
    /// request. An integrity error, not a permission decision.
    #[error("task {task_id} does not belong to list {list_id}")]
    TaskListMismatch { task_id: String, list_id: String },
}

/// A resource with one owner and a collaborator set.
pub trait SharedResource {
    /// Identifier of the resource.
    fn resource_id(&self) -> &str;

    /// Username of the owner.
    fn owner(&self) -> &str;

    /// Whether `username` is in the collaborator set.
    fn is_collaborator(&self, username: &str) -> bool;
}

/// A record that lives inside a [`SharedResource`].
pub trait ListScoped {
    /// Identifier of the record.
    fn resource_id(&self) -> &str;

    /// Identifier of the parent list.
    fn parent_list_id(&self) -> &str;
}

/// Decide the actor's relationship with a list.
///
/// Owner wins over collaborator when both hold.
pub fn decide_for_list<L>(list: &L, actor: &Identity) -> AccessDecision
where
    L: SharedResource + ?Sized,
{
    if list.owner() == actor.username {
        AccessDecision::Owner
    } else if list.is_collaborator(&actor.username) {
        AccessDecision::Collaborator
    } else {
        AccessDecision::Denied
    }
}

/// Decide the actor's relationship with a task reached through `list`.
///
/// The parent check runs first and is reported as
/// [`AccessError::TaskListMismatch`] for every actor, never as a denial.
pub fn decide_for_task<L, T>(
    list: &L,
    task: &T,
    actor: &Identity,
) -> Result<AccessDecision, AccessError>
where
    L: SharedResource + ?Sized,
    T: ListScoped + ?Sized,
{
    if task.parent_list_id() != list.resource_id() {
        return Err(AccessError::TaskListMismatch {
            task_id: task.resource_id().to_string(),
            list_id: list.resource_id().to_string(),
        });
    }
    Ok(decide_for_list(list, actor))
}

/// Check a decision against an operation's policy.
pub fn authorize<L>(
    list: &L,
    actor: &Identity,
    decision: AccessDecision,
    operation: Operation,
) -> Result<AccessDecision, AccessError>
where
    L: SharedResource + ?Sized,
{
    if operation.permits(decision) {
        Ok(decision)
    } else {
        Err(AccessError::Denied {
            actor: actor.username.clone(),
            list_id: list.resource_id().to_string(),
            operation,
        })
    }
}

/// Trait for enforcing the access policy directly on a list.
pub trait AccessEnforcer {
    /// Decide the actor's relationship with this resource.
    fn decide_for(&self, actor: &Identity) -> AccessDecision;

    /// Decide and check against `operation`.
    ///
    /// # Errors
    /// Returns `AccessError::Denied` when the policy rejects the decision.
    fn authorize_for(
        &self,
        actor: &Identity,
        operation: Operation,
    ) -> Result<AccessDecision, AccessError>;
}

impl<T: SharedResource> AccessEnforcer for T {
    fn decide_for(&self, actor: &Identity) -> AccessDecision {
        decide_for_list(self, actor)
    }

    fn authorize_for(
        &self,
        actor: &Identity,
        operation: Operation,
    ) -> Result<AccessDecision, AccessError> {
        authorize(self, actor, decide_for_list(self, actor), operation)
    }
}
