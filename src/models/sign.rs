// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// User Models
// ============================================================================

/// User record owned by the admin service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque identifier assigned by the admin service
    pub id: String,
    pub username: String,
    pub nickname: String,
}

/// Minimal user projection stored in the session after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub nickname: String,
}

impl From<&UserRecord> for SessionUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            nickname: record.nickname.clone(),
        }
    }
}

// ============================================================================
// API Request Models
// ============================================================================

/// Request body for `POST /in`. Missing fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /up`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
}

// ============================================================================
// API Response Models
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new("ok")
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionUserResponse {
    pub message: String,
    pub data: SessionUser,
}

impl SessionUserResponse {
    pub fn ok(data: SessionUser) -> Self {
        Self {
            message: "ok".to_string(),
            data,
        }
    }
}
