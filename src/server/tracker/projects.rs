use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::OptionalUser;
use crate::error::{Error, Result as StoreResult};
use crate::server::AppState;
use crate::server::dto::ProjectQuery;
use crate::server::response::{
    ApiError, ApiResponse, ApiResult, StoreOptionExt, StoreResultExt, json_body, parse_id,
};
use crate::types::{NewProject, Project, ProjectPatch, User, Validate};

const NAME_TAKEN: &str = "project name must be unique";

/// Rejects `name` when a project other than `except` already carries it.
fn ensure_unique_name(state: &AppState, name: &str, except: Option<i64>) -> ApiResult<()> {
    let existing = state
        .store
        .get_project_by_name(name)
        .api_err("failed to check the project name")?;

    match existing {
        Some(project) if Some(project.id) != except => Err(ApiError::bad_request(NAME_TAKEN)),
        _ => Ok(()),
    }
}

/// A project with an owner may only be changed by that owner. Projects
/// created anonymously stay open to anyone.
fn ensure_owner(project: &Project, caller: Option<&User>, denied: &'static str) -> ApiResult<()> {
    if project.owner_id.is_empty() {
        return Ok(());
    }
    match caller {
        None => Err(ApiError::unauthorized("authentication is required")),
        Some(user) if user.id == project.owner_id => Ok(()),
        Some(_) => Err(ApiError::forbidden(denied)),
    }
}

/// The unique index still catches a name claimed between the check and
/// the write.
fn name_taken_or<T>(result: StoreResult<T>, message: &'static str) -> ApiResult<T> {
    match result {
        Err(Error::DuplicateKey) => Err(ApiError::bad_request(NAME_TAKEN)),
        other => other.api_err_or_not_found("project not found", message),
    }
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    OptionalUser(caller): OptionalUser,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> impl IntoResponse {
    let mut req = json_body(payload, "failed to parse the project")?;
    req.validate()?;
    ensure_unique_name(&state, &req.name, None)?;
    req.owner_id = caller.map(|user| user.id).unwrap_or_default();

    let project = name_taken_or(
        state.store.create_project(&req),
        "failed to create the project",
    )?;

    tracing::info!(id = project.id, name = %project.name, "Project created");

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "project is created successfully",
            project,
        )),
    ))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "project")?;

    let project = state
        .store
        .get_project(id)
        .api_err("failed to get the project")?
        .or_not_found("project not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "project is retrieved successfully",
        project,
    )))
}

pub async fn filter_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProjectQuery>,
) -> impl IntoResponse {
    let filter = params.into_filter()?;

    let projects = state
        .store
        .filter_projects(&filter)
        .api_err("failed to filter the projects")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "projects are retrieved successfully",
        projects,
    )))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    OptionalUser(caller): OptionalUser,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = parse_id(&id, "project")?;

    let existing = state
        .store
        .get_project(id)
        .api_err("failed to get the project")?
        .or_not_found("project not found")?;
    ensure_owner(&existing, caller.as_ref(), "have not access to update project")?;

    let patch = json_body(payload, "failed to parse the project")?;
    patch.validate()?;
    if let Some(name) = &patch.name {
        ensure_unique_name(&state, name, Some(id))?;
    }

    let project = name_taken_or(
        state.store.update_project(id, &patch),
        "failed to update the project",
    )?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "project is updated successfully",
        project,
    )))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    OptionalUser(caller): OptionalUser,
) -> impl IntoResponse {
    let id = parse_id(&id, "project")?;

    let existing = state
        .store
        .get_project(id)
        .api_err("failed to get the project")?
        .or_not_found("project not found")?;
    ensure_owner(&existing, caller.as_ref(), "have not access to delete project")?;

    let deleted = state
        .store
        .delete_project(id)
        .api_err("failed to delete the project")?;

    if !deleted {
        return Err(ApiError::not_found("project not found"));
    }

    tracing::info!(id, "Project deleted");

    Ok::<_, ApiError>(Json(ApiResponse::message("project is deleted successfully")))
}
