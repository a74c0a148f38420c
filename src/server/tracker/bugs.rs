use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::BugQuery;
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt, json_body, parse_id,
};
use crate::types::{BugPatch, NewBug, Validate};

pub async fn create_bug(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBug>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the bug")?;
    req.validate()?;

    let bug = state
        .store
        .create_bug(&req)
        .api_err("failed to create the bug")?;

    tracing::info!(id = bug.id, component_id = bug.component_id, "Bug opened");

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success("bug is created successfully", bug)),
    ))
}

pub async fn get_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "bug")?;

    let bug = state
        .store
        .get_bug(id)
        .api_err("failed to get the bug")?
        .or_not_found("bug not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "bug is retrieved successfully",
        bug,
    )))
}

pub async fn filter_bugs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BugQuery>,
) -> impl IntoResponse {
    let filter = params.into_filter()?;

    let bugs = state
        .store
        .filter_bugs(&filter)
        .api_err("failed to filter the bugs")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "bugs are retrieved successfully",
        bugs,
    )))
}

pub async fn update_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<BugPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = parse_id(&id, "bug")?;

    state
        .store
        .get_bug(id)
        .api_err("failed to get the bug")?
        .or_not_found("bug not found")?;

    let patch = json_body(payload, "failed to parse the bug")?;
    patch.validate()?;

    let bug = state
        .store
        .update_bug(id, &patch)
        .api_err_or_not_found("bug not found", "failed to update the bug")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "bug is updated successfully",
        bug,
    )))
}

pub async fn delete_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "bug")?;

    let deleted = state
        .store
        .delete_bug(id)
        .api_err("failed to delete the bug")?;

    if !deleted {
        return Err(ApiError::not_found("bug not found"));
    }

    tracing::info!(id, "Bug deleted");

    Ok::<_, ApiError>(Json(ApiResponse::message("bug is deleted successfully")))
}
