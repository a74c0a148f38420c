mod bugs;
mod comments;
mod components;
mod members;
mod projects;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn tracker_router() -> Router<Arc<AppState>> {
    Router::new()
        // Project routes
        .route("/project", post(projects::create_project))
        .route("/project/filters", get(projects::filter_projects))
        .route(
            "/project/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Component routes
        .route("/component", post(components::create_component))
        .route("/component/filters", get(components::filter_components))
        .route(
            "/component/{id}",
            get(components::get_component)
                .put(components::update_component)
                .delete(components::delete_component),
        )
        // Bug routes
        .route("/bugs", post(bugs::create_bug))
        .route("/bugs/filters", get(bugs::filter_bugs))
        .route(
            "/bugs/{id}",
            get(bugs::get_bug)
                .put(bugs::update_bug)
                .delete(bugs::delete_bug),
        )
        // Comment routes
        .route("/comment", post(comments::create_comment))
        .route("/comment/filters", get(comments::filter_comments))
        .route(
            "/comment/{id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        // Member routes
        .route(
            "/member",
            post(members::create_member).get(members::list_members),
        )
        .route("/members", get(members::list_members))
        .route(
            "/member/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
}
