// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route error type and the centralized error-reporting middleware.
//!
//! Handlers return [`SignError`]. Client errors become their status and a JSON
//! message directly. Admin service failures only set the 500 status and ride
//! along in the response extensions; [`report_errors`] logs them and writes the
//! response body, so every collaborator failure passes through one place.

use crate::models::sign::MessageResponse;
use crate::services::admin::AdminError;
use axum::extract::rejection::JsonRejection;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::error;

pub const INVALID_CREDENTIALS: &str = "account or password error";
pub const ACCOUNT_EXISTS: &str = "account already exists";
pub const INVALID_ACCOUNT: &str = "invalid account or password";
pub const NOT_LOGGED_IN: &str = "not logged in";
pub const INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// Rejected request input (422).
    #[error("{0}")]
    Validation(&'static str),
    /// Wrong credentials or no signed-in user (401).
    #[error("{0}")]
    Authentication(&'static str),
    /// The admin service declined to create the user without failing (404, no body).
    #[error("user creation returned no record")]
    CreationFailed,
    /// The request body could not be read as JSON; axum's rejection is returned as-is.
    #[error(transparent)]
    Body(#[from] JsonRejection),
    /// The admin service call itself failed (500).
    #[error(transparent)]
    Collaborator(#[from] AdminError),
}

/// Admin failure attached to a 500 response for [`report_errors`].
#[derive(Debug, Clone)]
pub struct ReportedError(pub Arc<AdminError>);

impl IntoResponse for SignError {
    fn into_response(self) -> Response {
        match self {
            SignError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MessageResponse::new(message)),
            )
                .into_response(),
            SignError::Authentication(message) => {
                (StatusCode::UNAUTHORIZED, Json(MessageResponse::new(message))).into_response()
            }
            SignError::CreationFailed => StatusCode::NOT_FOUND.into_response(),
            SignError::Body(rejection) => rejection.into_response(),
            SignError::Collaborator(err) => {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response
                    .extensions_mut()
                    .insert(ReportedError(Arc::new(err)));
                response
            }
        }
    }
}

/// Middleware that logs collaborator failures and renders their response body.
pub async fn report_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;
    let Some(ReportedError(err)) = response.extensions_mut().remove::<ReportedError>() else {
        return response;
    };

    let status = response.status();
    error!(%method, %uri, status = status.as_u16(), error = %err, "request failed");

    (status, Json(MessageResponse::new(INTERNAL_ERROR))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_validation_is_422_with_message() {
        let response = SignError::Validation(ACCOUNT_EXISTS).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body, serde_json::json!({"message": "account already exists"}));
    }

    #[tokio::test]
    async fn test_authentication_is_401() {
        let response = SignError::Authentication(NOT_LOGGED_IN).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_creation_failed_is_404_without_body() {
        let response = SignError::CreationFailed.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_body_rejection_keeps_axum_status() {
        use axum::extract::FromRequest;

        let request = Request::builder()
            .uri("/in")
            .body(axum::body::Body::from("username=alice"))
            .unwrap();
        let rejection = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        let response = SignError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(response.extensions().get::<ReportedError>().is_none());
    }

    #[tokio::test]
    async fn test_collaborator_error_is_attached_for_reporting() {
        let response =
            SignError::from(AdminError::Backend("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let reported = response.extensions().get::<ReportedError>().unwrap();
        assert_eq!(reported.0.to_string(), "user store failure: connection reset");
    }
}
