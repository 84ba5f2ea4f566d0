// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resource loading with access checks, shared by the list and task handlers.
//!
//! Order of checks for a task addressed as `/list/{list_id}/task/{task_id}`:
//!
//! 1. The list is fetched through the access-aware lookup. Non-members get
//!    the same 404 as for a list that does not exist.
//! 2. The task is fetched by its own ID (404 if absent).
//! 3. The task must belong to the list (403 mismatch, logged at `warn`).
//! 4. The caller's decision is checked against the operation (403).

use crate::{
    audit_log,
    auth::Identity,
    error::ApiError,
    state::AppState,
    storage::{
        authorize, decide_for_task, AccessDecision, AccessEnforcer, AccessError, AuditEvent,
        AuditEventType, Operation, StoredTask, StoredTaskList, TaskListRepository,
        TaskRepository,
    },
};

/// Log and audit an access rejection, then turn it into the HTTP error.
fn reject(state: &AppState, actor: &Identity, error: AccessError) -> ApiError {
    let event = match &error {
        AccessError::Denied {
            list_id, operation, ..
        } => {
            tracing::debug!(
                username = %actor,
                list_id = %list_id,
                operation = %operation,
                "Permission denied"
            );
            AuditEvent::new(AuditEventType::PermissionDenied)
                .with_user(&actor.username)
                .with_resource("list", list_id)
                .with_details(serde_json::json!({ "operation": operation.as_str() }))
        }
        AccessError::TaskListMismatch { task_id, list_id } => {
            tracing::warn!(
                username = %actor,
                task_id = %task_id,
                list_id = %list_id,
                "Task addressed through a list it does not belong to"
            );
            AuditEvent::new(AuditEventType::TaskListMismatch)
                .with_user(&actor.username)
                .with_resource("task", task_id)
                .with_details(serde_json::json!({ "list_id": list_id }))
        }
    };
    audit_log!(state.storage(), event.failed(error.to_string()));
    error.into()
}

/// Fetch a list the actor owns or collaborates on.
pub(crate) fn load_list(
    state: &AppState,
    actor: &Identity,
    list_id: &str,
) -> Result<(StoredTaskList, AccessDecision), ApiError> {
    let list = TaskListRepository::new(state.storage())
        .find_with_access(list_id, actor)?
        .ok_or_else(ApiError::list_not_found)?;
    let decision = list.decide_for(actor);
    Ok((list, decision))
}

/// Fetch a list and check the actor may perform `operation` on it.
pub(crate) fn authorize_list(
    state: &AppState,
    actor: &Identity,
    list_id: &str,
    operation: Operation,
) -> Result<(StoredTaskList, AccessDecision), ApiError> {
    let (list, _) = load_list(state, actor, list_id)?;
    let decision = list
        .authorize_for(actor, operation)
        .map_err(|e| reject(state, actor, e))?;
    Ok((list, decision))
}

/// Fetch a task through its list and check the actor may perform `operation`.
pub(crate) fn authorize_task(
    state: &AppState,
    actor: &Identity,
    list_id: &str,
    task_id: &str,
    operation: Operation,
) -> Result<(StoredTaskList, StoredTask), ApiError> {
    let (list, _) = load_list(state, actor, list_id)?;

    let task = TaskRepository::new(state.storage())
        .find(task_id)?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    let decision = decide_for_task(&list, &task, actor).map_err(|e| reject(state, actor, e))?;
    authorize(&list, actor, decision, operation).map_err(|e| reject(state, actor, e))?;

    Ok((list, task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AuditRepository;
    use crate::test_utils::{seed_user, test_state};
    use axum::http::StatusCode;

    fn seeded() -> (tempfile::TempDir, AppState, StoredTaskList, StoredTask, StoredTask) {
        let (temp, state) = test_state();
        for name in ["alice", "bob", "carol"] {
            seed_user(&state, name);
        }

        let lists = TaskListRepository::new(state.storage());
        let mut groceries = StoredTaskList::new("Groceries", &Identity::new("alice"));
        groceries.collaborators.insert("bob".into());
        lists.create(&groceries).unwrap();
        let chores = StoredTaskList::new("Chores", &Identity::new("alice"));
        lists.create(&chores).unwrap();

        let tasks = TaskRepository::new(state.storage());
        let task42 = StoredTask::new(&groceries.id, "Buy milk");
        let task99 = StoredTask::new(&chores.id, "Mop floor");
        tasks.create(&task42).unwrap();
        tasks.create(&task99).unwrap();

        (temp, state, groceries, task42, task99)
    }

    #[test]
    fn stranger_gets_not_found() {
        let (_temp, state, list, _, _) = seeded();
        let err = load_list(&state, &Identity::new("carol"), &list.id).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = load_list(&state, &Identity::new("carol"), "missing").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn collaborator_denied_owner_only_operations() {
        let (_temp, state, list, _, _) = seeded();
        let bob = Identity::new("bob");

        let (_, decision) = authorize_list(&state, &bob, &list.id, Operation::ReadList).unwrap();
        assert_eq!(decision, AccessDecision::Collaborator);

        let err = authorize_list(&state, &bob, &list.id, Operation::DeleteList).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, crate::error::NOT_AUTHORISED);
    }

    #[test]
    fn task_through_wrong_list_is_mismatch_and_audited() {
        let (_temp, state, list, _, task99) = seeded();
        let alice = Identity::new("alice");

        let err = authorize_task(&state, &alice, &list.id, &task99.id, Operation::ReadTask)
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, crate::error::TASK_NOT_IN_LIST);

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let events = AuditRepository::new(state.storage())
            .search_by_user("alice", &today)
            .unwrap();
        assert!(events
            .iter()
            .any(|e| e.event_type == AuditEventType::TaskListMismatch && !e.success));
    }

    #[test]
    fn collaborator_reads_task_in_list() {
        let (_temp, state, list, task42, _) = seeded();
        let bob = Identity::new("bob");
        let (_, task) =
            authorize_task(&state, &bob, &list.id, &task42.id, Operation::UpdateTask).unwrap();
        assert_eq!(task.id, task42.id);
    }

    #[test]
    fn missing_task_is_not_found() {
        let (_temp, state, list, _, _) = seeded();
        let alice = Identity::new("alice");
        let err =
            authorize_task(&state, &alice, &list.id, "nope", Operation::ReadTask).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
