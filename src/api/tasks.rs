// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Task endpoints.
//!
//! Tasks are always addressed through their parent list. Owners and
//! collaborators may read, create and update tasks; a task named under the
//! wrong list is rejected with a distinct 403.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{
        CreateTaskRequest, TaskCollection, TaskResponse, UpdateTaskDescriptionRequest,
        UpdateTaskStatusRequest,
    },
    state::AppState,
    storage::{AuditEvent, AuditEventType, Operation, StoredTask, TaskRepository},
};

use super::access::{authorize_list, authorize_task};

const DUPLICATE_DESCRIPTION: &str = "A task with this description already exists in this list!";

/// Create a task in a list.
#[utoipa::path(
    post,
    path = "/list/{list_id}/task/create",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Blank description"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found or you don't have access to it"),
        (status = 409, description = "Description already used in this list")
    )
)]
pub async fn create_task(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let description = request.validate()?;

    let _guard = state.write_lock().await;
    let (list, _) = authorize_list(&state, &identity, &list_id, Operation::CreateTask)?;
    let repo = TaskRepository::new(state.storage());

    if repo.find_by_description(&list.id, &description)?.is_some() {
        return Err(ApiError::conflict(DUPLICATE_DESCRIPTION));
    }

    let task = StoredTask::new(&list.id, description);
    repo.create(&task)?;

    tracing::info!(username = %identity, list_id = %list.id, task_id = %task.id, "Task created");
    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::TaskCreated)
            .with_user(&identity.username)
            .with_resource("task", &task.id)
            .with_details(serde_json::json!({ "list_id": list.id }))
    );

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get one task.
#[utoipa::path(
    get,
    path = "/list/{list_id}/task/{task_id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("list_id" = String, Path, description = "List ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Task does not belong to the specified list"),
        (status = 404, description = "List or task not found")
    )
)]
pub async fn get_task(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path((list_id, task_id)): Path<(String, String)>,
) -> Result<Json<TaskResponse>, ApiError> {
    let (_, task) = authorize_task(&state, &identity, &list_id, &task_id, Operation::ReadTask)?;
    Ok(Json(task.into()))
}

/// List the tasks of a list, oldest first.
#[utoipa::path(
    get,
    path = "/list/{list_id}/tasks",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    responses(
        (status = 200, description = "Tasks", body = TaskCollection),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found or you don't have access to it")
    )
)]
pub async fn list_tasks(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<TaskCollection>, ApiError> {
    let (list, _) = authorize_list(&state, &identity, &list_id, Operation::ListTasks)?;

    let tasks: Vec<TaskResponse> = TaskRepository::new(state.storage())
        .list_by_list(&list.id)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = tasks.len();

    Ok(Json(TaskCollection {
        list_id: list.id,
        tasks,
        total,
    }))
}

/// Mark a task complete or incomplete.
#[utoipa::path(
    patch,
    path = "/list/{list_id}/task/{task_id}/status",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("list_id" = String, Path, description = "List ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Task does not belong to the specified list"),
        (status = 404, description = "List or task not found")
    )
)]
pub async fn update_status(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path((list_id, task_id)): Path<(String, String)>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let _guard = state.write_lock().await;
    let (_, mut task) =
        authorize_task(&state, &identity, &list_id, &task_id, Operation::UpdateTask)?;

    task.completed = request.completed;
    task.updated_at = Utc::now();
    TaskRepository::new(state.storage()).update(&task)?;

    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::TaskUpdated)
            .with_user(&identity.username)
            .with_resource("task", &task.id)
            .with_details(serde_json::json!({ "completed": task.completed }))
    );

    Ok(Json(task.into()))
}

/// Change a task's description.
#[utoipa::path(
    patch,
    path = "/list/{list_id}/task/{task_id}/description",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("list_id" = String, Path, description = "List ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskDescriptionRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Blank description"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Task does not belong to the specified list"),
        (status = 404, description = "List or task not found"),
        (status = 409, description = "Description already used in this list")
    )
)]
pub async fn update_description(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path((list_id, task_id)): Path<(String, String)>,
    Json(request): Json<UpdateTaskDescriptionRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let description = request.validate()?;

    let _guard = state.write_lock().await;
    let (list, mut task) =
        authorize_task(&state, &identity, &list_id, &task_id, Operation::UpdateTask)?;
    let repo = TaskRepository::new(state.storage());

    if let Some(existing) = repo.find_by_description(&list.id, &description)? {
        if existing.id != task.id {
            return Err(ApiError::conflict(DUPLICATE_DESCRIPTION));
        }
    }

    task.description = description;
    task.updated_at = Utc::now();
    repo.update(&task)?;

    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::TaskUpdated)
            .with_user(&identity.username)
            .with_resource("task", &task.id)
            .with_details(serde_json::json!({ "description": task.description }))
    );

    Ok(Json(task.into()))
}
