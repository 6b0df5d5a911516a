// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! In-memory [`AdminService`] backend, optionally seeded from a JSON file.

use crate::models::sign::UserRecord;
use crate::services::admin::{AdminError, AdminService};
use crate::services::logging::anonymize_username;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration the admin service is built from.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// JSON array of `{username, password, nickname}` accounts created at startup
    pub seed_file: Option<PathBuf>,
}

/// One account entry in the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub nickname: String,
}

struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

/// Admin service keeping accounts in a process-local map keyed by username.
#[derive(Default)]
pub struct InMemoryAdmin {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the admin service from configuration, loading the seed file if set.
    pub async fn from_config(config: &AdminConfig) -> Result<Self> {
        let admin = Self::new();

        let Some(path) = &config.seed_file else {
            return Ok(admin);
        };

        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read admin seed file {}", path.display()))?;
        let seeds: Vec<SeedUser> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse admin seed file {}", path.display()))?;

        let mut inserted = 0usize;
        for (index, seed) in seeds.iter().enumerate() {
            if seed.username.is_empty() || seed.password.is_empty() {
                warn!(index, "skipping seed entry with empty username or password");
                continue;
            }
            if admin
                .insert(&seed.username, &seed.password, &seed.nickname)
                .await
                .is_none()
            {
                warn!(index, username = %anonymize_username(&seed.username), "skipping duplicate seed entry");
                continue;
            }
            inserted += 1;
        }

        info!(
            count = inserted,
            skipped = seeds.len() - inserted,
            path = %path.display(),
            "admin seed loaded"
        );
        Ok(admin)
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn hash_password(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Insert unless the username is taken. Returns the new record.
    async fn insert(&self, username: &str, password: &str, nickname: &str) -> Option<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return None;
        }

        let record = UserRecord {
            id: Uuid::now_v7().to_string(),
            username: username.to_string(),
            nickname: nickname.to_string(),
        };
        users.insert(
            username.to_string(),
            StoredUser {
                record: record.clone(),
                password_hash: Self::hash_password(password),
            },
        );
        Some(record)
    }
}

#[async_trait]
impl AdminService for InMemoryAdmin {
    async fn get_id_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, AdminError> {
        let users = self.users.read().await;
        let password_hash = Self::hash_password(password);

        Ok(users
            .get(username)
            .filter(|stored| stored.password_hash == password_hash)
            .map(|stored| stored.record.clone()))
    }

    async fn is_duplicate(&self, username: &str) -> Result<bool, AdminError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn add_user(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> Result<Option<UserRecord>, AdminError> {
        let record = self.insert(username, password, nickname).await;
        if record.is_none() {
            debug!(username = %anonymize_username(username), "username already taken");
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_add_then_lookup() {
        let admin = InMemoryAdmin::new();
        let created = admin.add_user("alice", "pw1", "Al").await.unwrap().unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.nickname, "Al");

        let found = admin
            .get_id_by_username_and_password("alice", "pw1")
            .await
            .unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_wrong_password_is_absent() {
        let admin = InMemoryAdmin::new();
        admin.add_user("alice", "pw1", "Al").await.unwrap();

        let found = admin
            .get_id_by_username_and_password("alice", "nope")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_absent() {
        let admin = InMemoryAdmin::new();
        let found = admin
            .get_id_by_username_and_password("ghost", "pw")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_add_returns_none() {
        let admin = InMemoryAdmin::new();
        assert!(!admin.is_duplicate("alice").await.unwrap());
        admin.add_user("alice", "pw1", "Al").await.unwrap();
        assert!(admin.is_duplicate("alice").await.unwrap());
        assert!(admin.add_user("alice", "pw2", "Other").await.unwrap().is_none());
        assert_eq!(admin.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let admin = InMemoryAdmin::new();
        let a = admin.add_user("a", "x", "").await.unwrap().unwrap();
        let b = admin.add_user("b", "x", "").await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_from_config_without_seed_is_empty() {
        let admin = InMemoryAdmin::from_config(&AdminConfig::default())
            .await
            .unwrap();
        assert!(admin.is_empty().await);
    }

    #[tokio::test]
    async fn test_from_config_loads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"username":"alice","password":"pw1","nickname":"Al"}},{{"username":"bob","password":"pw2"}}]"#
        )
        .unwrap();

        let config = AdminConfig {
            seed_file: Some(file.path().to_path_buf()),
        };
        let admin = InMemoryAdmin::from_config(&config).await.unwrap();
        assert_eq!(admin.len().await, 2);

        let bob = admin
            .get_id_by_username_and_password("bob", "pw2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob.nickname, "");
    }

    #[tokio::test]
    async fn test_from_config_skips_duplicate_and_empty_seed_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"username":"alice","password":"pw1"}},{{"username":"alice","password":"pw2"}},{{"username":"","password":"pw3"}},{{"username":"carol","password":""}}]"#
        )
        .unwrap();

        let config = AdminConfig {
            seed_file: Some(file.path().to_path_buf()),
        };
        let admin = InMemoryAdmin::from_config(&config).await.unwrap();
        assert_eq!(admin.len().await, 1);

        // First entry wins
        let alice = admin
            .get_id_by_username_and_password("alice", "pw1")
            .await
            .unwrap();
        assert!(alice.is_some());
        assert!(!admin.is_duplicate("carol").await.unwrap());
    }

    #[tokio::test]
    async fn test_from_config_rejects_malformed_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let config = AdminConfig {
            seed_file: Some(file.path().to_path_buf()),
        };
        assert!(InMemoryAdmin::from_config(&config).await.is_err());
    }
}
