mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn account_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/signup", post(users::signup))
        .route("/user/signup/verify", post(users::verify))
        .route("/user/signin", post(users::signin))
        .route("/user/refresh_token", post(users::refresh_token))
        .route("/user", get(users::get_current_user).put(users::update_current_user))
}
