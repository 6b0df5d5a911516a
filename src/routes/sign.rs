// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Sign-in, sign-up, sign-out and session status route handlers.

use crate::error::{
    SignError, ACCOUNT_EXISTS, INVALID_ACCOUNT, INVALID_CREDENTIALS, NOT_LOGGED_IN,
};
use crate::models::sign::{
    MessageResponse, SessionUser, SessionUserResponse, SignInRequest, SignUpRequest,
};
use crate::services::admin::AdminService;
use crate::services::logging::anonymize_username;
use crate::services::session::{Session, SessionStore};
use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

/// State for sign routes.
#[derive(Clone)]
pub struct SignState {
    pub admin: Arc<dyn AdminService>,
    pub sessions: SessionStore,
}

impl SignState {
    /// The admin service is required up front; there is no uninitialized router.
    pub fn new(admin: Arc<dyn AdminService>, sessions: SessionStore) -> Self {
        Self { admin, sessions }
    }
}

impl FromRef<SignState> for SessionStore {
    fn from_ref(state: &SignState) -> Self {
        state.sessions.clone()
    }
}

/// Create the sign router. Paths are relative to the mount prefix.
pub fn sign_router() -> Router<SignState> {
    Router::new()
        .route("/in", post(sign_in_handler))
        .route("/up", post(sign_up_handler))
        .route("/out", get(logout_handler))
        .route("/status", get(status_handler))
}

#[derive(OpenApi)]
#[openapi(
    paths(sign_in_handler, sign_up_handler, logout_handler, status_handler),
    components(schemas(
        SignInRequest,
        SignUpRequest,
        SessionUser,
        SessionUserResponse,
        MessageResponse
    )),
    tags((name = "sign", description = "Session sign-in, sign-up and sign-out"))
)]
pub struct SignApiDoc;

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /in - Check credentials and store the user in the session.
#[utoipa::path(
    post,
    path = "/in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionUserResponse),
        (status = 401, description = "Account or password error", body = MessageResponse),
        (status = 500, description = "Admin service failure", body = MessageResponse),
    ),
    tag = "sign"
)]
async fn sign_in_handler(
    State(state): State<SignState>,
    mut session: Session,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SessionUserResponse>, SignError> {
    // Any previous sign-in is dropped whatever the outcome of this attempt,
    // including a body that cannot be read
    session.set_user(None).await;
    let Json(payload) = payload?;

    let record = state
        .admin
        .get_id_by_username_and_password(&payload.username, &payload.password)
        .await?;

    let Some(record) = record else {
        info!(username = %anonymize_username(&payload.username), "sign-in rejected");
        return Err(SignError::Authentication(INVALID_CREDENTIALS));
    };

    let user = SessionUser::from(&record);
    session.set_user(Some(user.clone())).await;

    info!(user_id = %user.id, username = %anonymize_username(&user.username), "user signed in");

    Ok(Json(SessionUserResponse::ok(user)))
}

/// POST /up - Create an account.
#[utoipa::path(
    post,
    path = "/up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 404, description = "Admin service did not create the account"),
        (status = 422, description = "Duplicate account or invalid input", body = MessageResponse),
        (status = 500, description = "Admin service failure", body = MessageResponse),
    ),
    tag = "sign"
)]
async fn sign_up_handler(
    State(state): State<SignState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<MessageResponse>, SignError> {
    if state.admin.is_duplicate(&payload.username).await? {
        return Err(SignError::Validation(ACCOUNT_EXISTS));
    }

    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(SignError::Validation(INVALID_ACCOUNT));
    }

    let created = state
        .admin
        .add_user(&payload.username, &payload.password, &payload.nickname)
        .await?;

    let Some(record) = created else {
        warn!(username = %anonymize_username(&payload.username), "admin service created no user");
        return Err(SignError::CreationFailed);
    };

    info!(user_id = %record.id, username = %anonymize_username(&record.username), "user signed up");

    Ok(Json(MessageResponse::ok()))
}

/// GET /out - Clear the session user.
#[utoipa::path(
    get,
    path = "/out",
    responses((status = 200, description = "Signed out", body = MessageResponse)),
    tag = "sign"
)]
async fn logout_handler(mut session: Session) -> Json<MessageResponse> {
    if let Some(user) = session.user() {
        info!(user_id = %user.id, "user signed out");
    }
    session.set_user(None).await;

    Json(MessageResponse::ok())
}

/// GET /status - Return the signed-in user.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Signed-in user", body = SessionUserResponse),
        (status = 401, description = "Not logged in", body = MessageResponse),
    ),
    tag = "sign"
)]
async fn status_handler(session: Session) -> Result<Json<SessionUserResponse>, SignError> {
    let user = session
        .user()
        .cloned()
        .ok_or(SignError::Authentication(NOT_LOGGED_IN))?;

    Ok(Json(SessionUserResponse::ok(user)))
}
