use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{RequireUser, TokenError, TokenKind, generate_code};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    AccessTokenResponse, RefreshTokenRequest, SignInRequest, SignInResponse, VerifyRequest,
};
use crate::server::response::{ApiError, ApiResponse, ApiResult, StoreResultExt, json_body};
use crate::types::{NewUser, User, UserPatch, Validate};

const EMAIL_TAKEN: &str = "email is already registered";
const BAD_CREDENTIALS: &str = "invalid email or password";
const WRONG_CODE: &str = "wrong verification code";

fn signing_failed(err: TokenError) -> ApiError {
    tracing::error!("Failed to issue token: {err}");
    ApiError::internal("failed to issue a token")
}

/// Hands a code to the notifier. Delivery problems are logged, never
/// surfaced to the caller.
fn send_code(state: &AppState, user: &User, code: i64) {
    if let Err(e) = state.notifier.send_code(&user.email, code) {
        tracing::warn!(user_id = %user.id, "Failed to send verification code: {e}");
    }
}

fn ensure_email_free(state: &AppState, email: &str, except: Option<&str>) -> ApiResult<()> {
    let existing = state
        .store
        .get_user_by_email(email)
        .api_err("failed to check the email")?;

    match existing {
        Some(user) if Some(user.id.as_str()) != except => Err(ApiError::conflict(EMAIL_TAKEN)),
        _ => Ok(()),
    }
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the user")?;
    req.validate()?;
    ensure_email_free(&state, &req.email, None)?;

    let password = state
        .passwords
        .hash(&req.password)
        .api_err("failed to hash the password")?;
    let code = generate_code(state.store.as_ref())
        .api_err("failed to generate a verification code")?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        email: req.email,
        password,
        verification_code: code,
        verification_code_expires_at: Some(now + state.verification_ttl),
        verified: false,
        created_at: now,
    };

    match state.store.create_user(&user) {
        Ok(()) => {}
        Err(Error::DuplicateKey) => return Err(ApiError::conflict(EMAIL_TAKEN)),
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            return Err(ApiError::internal("failed to create the user"));
        }
    }

    tracing::info!(user_id = %user.id, "User signed up");
    send_code(&state, &user, code);

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "a verification code has been sent to your email",
            user,
        )),
    ))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the verification code")?;

    let code = req
        .verification_code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("verification code is required"))?
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(WRONG_CODE))?;

    let user = state
        .store
        .get_user_by_verification_code(code)
        .api_err("failed to look up the verification code")?
        .ok_or_else(|| ApiError::bad_request(WRONG_CODE))?;

    if user.verified {
        return Err(ApiError::bad_request("account is already verified"));
    }

    let expired = user
        .verification_code_expires_at
        .is_some_and(|expires_at| expires_at < Utc::now());

    if expired {
        let code = generate_code(state.store.as_ref())
            .api_err("failed to generate a verification code")?;
        state
            .store
            .replace_verification_code(&user.id, code, Utc::now() + state.verification_ttl)
            .api_err("failed to store the verification code")?;
        send_code(&state, &user, code);

        return Err(ApiError::bad_request(
            "verification code has expired, a new code has been sent to your email",
        ));
    }

    state
        .store
        .mark_user_verified(&user.id)
        .api_err("failed to verify the account")?;

    tracing::info!(user_id = %user.id, "User verified");

    Ok::<_, ApiError>(Json(ApiResponse::message(
        "account is verified successfully",
    )))
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the credentials")?;

    let user = state
        .store
        .get_user_by_email(&req.email)
        .api_err("failed to look up the user")?
        .ok_or_else(|| ApiError::not_found(BAD_CREDENTIALS))?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password)
        .api_err("failed to check the password")?;

    if !valid {
        return Err(ApiError::not_found(BAD_CREDENTIALS));
    }

    if !user.verified {
        return Err(ApiError::forbidden("account is not verified"));
    }

    let access_token = state.tokens.access_token(&user).map_err(signing_failed)?;
    let refresh_token = state.tokens.refresh_token(&user).map_err(signing_failed)?;

    tracing::info!(user_id = %user.id, "User signed in");

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "logged in successfully",
        SignInResponse {
            access_token,
            refresh_token,
            user,
        },
    )))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the refresh token")?;

    if req.refresh_token.is_empty() {
        return Err(ApiError::bad_request("refresh token is required"));
    }

    let claims = state
        .tokens
        .validate(&req.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            tracing::debug!("Rejected refresh token: {e}");
            ApiError::unauthorized("invalid or expired refresh token")
        })?;

    let user = state
        .store
        .get_user(&claims.sub)
        .api_err("failed to look up the user")?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    let access_token = state.tokens.access_token(&user).map_err(signing_failed)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "token has been refreshed successfully",
            AccessTokenResponse { access_token },
        )),
    ))
}

pub async fn get_current_user(auth: RequireUser) -> impl IntoResponse {
    Json(ApiResponse::success("user is retrieved successfully", auth.user))
}

pub async fn update_current_user(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> impl IntoResponse {
    let patch = json_body(payload, "failed to parse the user")?;
    patch.validate()?;

    if let Some(email) = &patch.email {
        ensure_email_free(&state, email, Some(&auth.user.id))?;
    }

    let user = match state.store.update_user(&auth.user.id, &patch) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(ApiError::not_found("user not found")),
        Err(Error::DuplicateKey) => return Err(ApiError::conflict(EMAIL_TAKEN)),
        Err(e) => {
            tracing::error!("Failed to update user {}: {e}", auth.user.id);
            return Err(ApiError::internal("failed to update the user"));
        }
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "user is updated successfully",
        user,
    )))
}
