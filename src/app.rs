// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Router construction: the sign routes under their mount prefix plus the
//! service endpoints around them.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::report_errors;
use crate::models::version::VersionResponse;
use crate::routes::{sign_router, SignApiDoc, SignState};
use axum::{middleware, routing::get, Json, Router};
use tower_cookies::CookieManagerLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SIGN_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SIGN_VERSION");

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "sign-agent".to_string(),
        version: VERSION.to_string(),
    })
}

/// Build the Axum application router.
///
/// The sign routes are nested under `mount_prefix`, or merged at the root when
/// it is `None`.
pub fn create_router(state: SignState, mount_prefix: Option<&str>) -> Router {
    let sign_routes = sign_router().with_state(state);

    let app = Router::new().route("/version", get(version_handler));
    let app = match mount_prefix {
        Some(prefix) => app.nest(prefix, sign_routes),
        None => app.merge(sign_routes),
    };

    app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", SignApiDoc::openapi()))
        .layer(middleware::from_fn(report_errors))
        .layer(CookieManagerLayer::new())
}
