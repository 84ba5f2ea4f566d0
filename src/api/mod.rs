// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate_request, Identity},
    models::{
        AddCollaboratorsRequest, CollaboratorsResponse, CreateListRequest, CreateTaskRequest,
        LoginRequest, RegisterRequest, RemoveCollaboratorRequest, TaskCollection,
        TaskListCollection, TaskListDetailResponse, TaskListResponse, TaskResponse,
        TokenResponse, UpdateListTitleRequest, UpdateTaskDescriptionRequest,
        UpdateTaskStatusRequest, UserResponse,
    },
    state::AppState,
    storage::AccessDecision,
};

mod access;
pub mod auth;
pub mod health;
pub mod lists;
pub mod tasks;
pub mod users;

/// Build the application router.
///
/// The authentication middleware wraps every API route. Swagger UI is merged
/// outside it so the docs stay reachable without a token. Every response
/// carries an `x-request-id`, generated when the client did not send one.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::get_current_user))
        .route("/list/all", get(lists::list_all))
        .route("/list/create", post(lists::create_list))
        .route(
            "/list/{list_id}",
            get(lists::get_list).delete(lists::delete_list),
        )
        .route("/list/{list_id}/title", patch(lists::update_title))
        .route(
            "/list/{list_id}/collaborator/add",
            post(lists::add_collaborators),
        )
        .route(
            "/list/{list_id}/collaborator/remove",
            delete(lists::remove_collaborator),
        )
        .route(
            "/list/{list_id}/collaborator/all",
            get(lists::list_collaborators),
        )
        .route("/list/{list_id}/task/create", post(tasks::create_task))
        .route("/list/{list_id}/tasks", get(tasks::list_tasks))
        .route("/list/{list_id}/task/{task_id}", get(tasks::get_task))
        .route(
            "/list/{list_id}/task/{task_id}/status",
            patch(tasks::update_status),
        )
        .route(
            "/list/{list_id}/task/{task_id}/description",
            patch(tasks::update_description),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_request,
        ))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        auth::register,
        auth::login,
        users::get_current_user,
        lists::list_all,
        lists::create_list,
        lists::get_list,
        lists::delete_list,
        lists::update_title,
        lists::add_collaborators,
        lists::remove_collaborator,
        lists::list_collaborators,
        tasks::create_task,
        tasks::get_task,
        tasks::list_tasks,
        tasks::update_status,
        tasks::update_description
    ),
    components(
        schemas(
            Identity,
            AccessDecision,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            CreateListRequest,
            UpdateListTitleRequest,
            AddCollaboratorsRequest,
            RemoveCollaboratorRequest,
            TaskListResponse,
            TaskListDetailResponse,
            TaskListCollection,
            CollaboratorsResponse,
            CreateTaskRequest,
            UpdateTaskDescriptionRequest,
            UpdateTaskStatusRequest,
            TaskResponse,
            TaskCollection
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Registration and token issuance"),
        (name = "Users", description = "Current user"),
        (name = "Lists", description = "Task lists and collaborators"),
        (name = "Tasks", description = "Tasks inside a list")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_state;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (_temp, state) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/list/{list_id}/task/{task_id}"));
    }
}
