// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! The admin collaborator: credential lookup, duplicate check and user creation.
//!
//! Route handlers only see the [`AdminService`] trait object, so the user store
//! behind it can be swapped without touching the routes.

use crate::models::sign::UserRecord;
use async_trait::async_trait;

/// Failure reported by an admin service backend.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("user store failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait AdminService: Send + Sync {
    /// Look up the user matching both username and password.
    /// `Ok(None)` means the credentials do not match any user.
    async fn get_id_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, AdminError>;

    /// Whether an account with this username already exists.
    async fn is_duplicate(&self, username: &str) -> Result<bool, AdminError>;

    /// Create a user. `Ok(None)` means the store declined to create it.
    async fn add_user(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> Result<Option<UserRecord>, AdminError>;
}
