// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Task list endpoints.
//!
//! Every list is reached through the access-aware lookup, so a caller who
//! is neither owner nor collaborator sees the same 404 as for a missing
//! list. Renaming, deleting and collaborator management are owner-only.

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
        AddCollaboratorsRequest, CollaboratorsResponse, CreateListRequest,
        RemoveCollaboratorRequest, TaskListCollection, TaskListDetailResponse, TaskListResponse,
        UpdateListTitleRequest,
    },
    state::AppState,
    storage::{
        decide_for_list, AccessDecision, AuditEvent, AuditEventType, Operation, StoredTaskList,
        TaskListRepository, TaskRepository, UserRepository,
    },
};

use super::access::authorize_list;

/// List all task lists the caller owns or collaborates on.
#[utoipa::path(
    get,
    path = "/list/all",
    tag = "Lists",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accessible task lists", body = TaskListCollection),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_all(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<TaskListCollection>, ApiError> {
    let lists: Vec<TaskListResponse> = TaskListRepository::new(state.storage())
        .list_accessible(&identity)?
        .into_iter()
        .map(|list| {
            let access = decide_for_list(&list, &identity);
            TaskListResponse::new(list, access)
        })
        .collect();
    let total = lists.len();

    Ok(Json(TaskListCollection { lists, total }))
}

/// Create a task list owned by the caller.
#[utoipa::path(
    post,
    path = "/list/create",
    tag = "Lists",
    security(("bearer_auth" = [])),
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = TaskListResponse),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Caller already owns a list with this title")
    )
)]
pub async fn create_list(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<TaskListResponse>), ApiError> {
    let title = request.validate()?;

    let _guard = state.write_lock().await;
    let repo = TaskListRepository::new(state.storage());

    if repo
        .find_by_title_and_owner(&title, &identity.username)?
        .is_some()
    {
        return Err(ApiError::conflict("Title is already being used!"));
    }

    let list = StoredTaskList::new(title, &identity);
    repo.create(&list)?;

    tracing::info!(username = %identity, list_id = %list.id, "Task list created");
    audit_log!(state.storage(), AuditEventType::ListCreated, &identity, "list", &list.id);

    Ok((
        StatusCode::CREATED,
        Json(TaskListResponse::new(list, AccessDecision::Owner)),
    ))
}

/// Get a task list with its tasks.
#[utoipa::path(
    get,
    path = "/list/{list_id}",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    responses(
        (status = 200, description = "List details", body = TaskListDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found or you don't have access to it")
    )
)]
pub async fn get_list(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<TaskListDetailResponse>, ApiError> {
    let (list, access) = authorize_list(&state, &identity, &list_id, Operation::ReadList)?;

    let tasks = TaskRepository::new(state.storage())
        .list_by_list(&list.id)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(TaskListDetailResponse {
        list: TaskListResponse::new(list, access),
        tasks,
    }))
}

/// Delete a task list and all of its tasks. Owner only.
#[utoipa::path(
    delete,
    path = "/list/{list_id}",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    responses(
        (status = 204, description = "List deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner may delete the list"),
        (status = 404, description = "List not found or you don't have access to it")
    )
)]
pub async fn delete_list(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock().await;
    let (list, _) = authorize_list(&state, &identity, &list_id, Operation::DeleteList)?;

    let removed = TaskRepository::new(state.storage()).delete_by_list(&list.id)?;
    TaskListRepository::new(state.storage()).delete(&list.id)?;

    tracing::info!(username = %identity, list_id = %list.id, tasks = removed, "Task list deleted");
    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::ListDeleted)
            .with_user(&identity.username)
            .with_resource("list", &list.id)
            .with_details(serde_json::json!({ "tasks_removed": removed }))
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Rename a task list. Owner only.
#[utoipa::path(
    patch,
    path = "/list/{list_id}/title",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    request_body = UpdateListTitleRequest,
    responses(
        (status = 200, description = "List renamed", body = TaskListResponse),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner may rename the list"),
        (status = 404, description = "List not found or you don't have access to it"),
        (status = 409, description = "Owner already has a list with this title")
    )
)]
pub async fn update_title(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(request): Json<UpdateListTitleRequest>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let title = request.validate()?;

    let _guard = state.write_lock().await;
    let (mut list, access) = authorize_list(&state, &identity, &list_id, Operation::RenameList)?;
    let repo = TaskListRepository::new(state.storage());

    if let Some(existing) = repo.find_by_title_and_owner(&title, &list.owner)? {
        if existing.id != list.id {
            return Err(ApiError::conflict("Task list title already exists!"));
        }
    }

    list.title = title;
    list.updated_at = Utc::now();
    repo.update(&list)?;

    audit_log!(state.storage(), AuditEventType::ListRenamed, &identity, "list", &list.id);

    Ok(Json(TaskListResponse::new(list, access)))
}

/// Add collaborators to a task list. Owner only.
///
/// Every username must name an existing account; otherwise nothing is added.
#[utoipa::path(
    post,
    path = "/list/{list_id}/collaborator/add",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    request_body = AddCollaboratorsRequest,
    responses(
        (
            status = 200,
            description = "Collaborators after the change",
            body = CollaboratorsResponse
        ),
        (status = 400, description = "No collaborators given"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner may add collaborators"),
        (status = 404, description = "List or collaborator username not found")
    )
)]
pub async fn add_collaborators(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(request): Json<AddCollaboratorsRequest>,
) -> Result<Json<CollaboratorsResponse>, ApiError> {
    let usernames = request.validate()?;

    let _guard = state.write_lock().await;
    let (mut list, _) =
        authorize_list(&state, &identity, &list_id, Operation::AddCollaborator)?;

    let users = UserRepository::new(state.storage());
    if let Some(unknown) = usernames.iter().find(|name| !users.exists(name)) {
        tracing::debug!(list_id = %list.id, collaborator = %unknown, "Unknown collaborator");
        return Err(ApiError::not_found("Collaborator username not found!"));
    }

    list.collaborators.extend(usernames.iter().cloned());
    list.updated_at = Utc::now();
    TaskListRepository::new(state.storage()).update(&list)?;

    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::CollaboratorAdded)
            .with_user(&identity.username)
            .with_resource("list", &list.id)
            .with_details(serde_json::json!({ "collaborators": usernames }))
    );

    Ok(Json(list.into()))
}

/// Remove a collaborator from a task list. Owner only.
#[utoipa::path(
    delete,
    path = "/list/{list_id}/collaborator/remove",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    request_body = RemoveCollaboratorRequest,
    responses(
        (status = 204, description = "Collaborator removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner may remove collaborators"),
        (status = 404, description = "List or collaborator username not found")
    )
)]
pub async fn remove_collaborator(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(request): Json<RemoveCollaboratorRequest>,
) -> Result<StatusCode, ApiError> {
    let username = request.validate()?;

    let _guard = state.write_lock().await;
    let (mut list, _) =
        authorize_list(&state, &identity, &list_id, Operation::RemoveCollaborator)?;

    if !UserRepository::new(state.storage()).exists(&username) {
        return Err(ApiError::not_found("Collaborator username not found!"));
    }

    if list.collaborators.remove(&username) {
        list.updated_at = Utc::now();
        TaskListRepository::new(state.storage()).update(&list)?;
    }

    audit_log!(
        state.storage(),
        AuditEvent::new(AuditEventType::CollaboratorRemoved)
            .with_user(&identity.username)
            .with_resource("list", &list.id)
            .with_details(serde_json::json!({ "collaborator": username }))
    );

    Ok(StatusCode::NO_CONTENT)
}

/// List the collaborators of a task list. Owner only.
#[utoipa::path(
    get,
    path = "/list/{list_id}/collaborator/all",
    tag = "Lists",
    security(("bearer_auth" = [])),
    params(("list_id" = String, Path, description = "List ID")),
    responses(
        (status = 200, description = "Collaborators", body = CollaboratorsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner may list collaborators"),
        (status = 404, description = "List not found or you don't have access to it")
    )
)]
pub async fn list_collaborators(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<CollaboratorsResponse>, ApiError> {
    let (list, _) = authorize_list(&state, &identity, &list_id, Operation::ListCollaborators)?;
    Ok(Json(list.into()))
}
