use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::CommentQuery;
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt, json_body, parse_id,
};
use crate::types::{CommentPatch, NewComment, Validate};

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the comment")?;
    req.validate()?;

    let comment = state
        .store
        .create_comment(&req)
        .api_err("failed to create the comment")?;

    tracing::info!(id = comment.id, bug_id = comment.bug_id, "Comment added");

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "comment is created successfully",
            comment,
        )),
    ))
}

pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "comment")?;

    let comment = state
        .store
        .get_comment(id)
        .api_err("failed to get the comment")?
        .or_not_found("comment not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "comment is found successfully",
        comment,
    )))
}

pub async fn filter_comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommentQuery>,
) -> impl IntoResponse {
    let filter = params.into_filter()?;

    let comments = state
        .store
        .filter_comments(&filter)
        .api_err("failed to filter the comments")?;

    if comments.is_empty() {
        return Err(ApiError::not_found("no comments are found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "comments are retrieved successfully",
        comments,
    )))
}

pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CommentPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = parse_id(&id, "comment")?;

    state
        .store
        .get_comment(id)
        .api_err("failed to get the comment")?
        .or_not_found("comment not found")?;

    let patch = json_body(payload, "failed to parse the comment")?;
    patch.validate()?;

    let comment = state
        .store
        .update_comment(id, &patch)
        .api_err_or_not_found("comment not found", "failed to update the comment")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "comment is updated successfully",
        comment,
    )))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "comment")?;

    let deleted = state
        .store
        .delete_comment(id)
        .api_err("failed to delete the comment")?;

    if !deleted {
        return Err(ApiError::not_found("comment not found"));
    }

    Ok::<_, ApiError>(Json(ApiResponse::message(
        "comment is deleted successfully",
    )))
}
