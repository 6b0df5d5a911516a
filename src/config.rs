// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Command-line and environment configuration.

use crate::services::memory_admin::AdminConfig;
use crate::services::session::SessionConfig;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for `--session-max-age-days` (about a century).
pub const MAX_SESSION_AGE_DAYS: u64 = 36_500;

#[derive(Debug, Clone, Parser)]
#[command(name = "sign-agent", version = env!("SIGN_VERSION"), about = "Session sign-in service")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SIGN_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Path prefix the sign routes are mounted under
    #[arg(long, env = "SIGN_MOUNT_PREFIX", default_value = "/sign")]
    pub mount_prefix: String,

    /// Session lifetime in days
    #[arg(
        long,
        env = "SESSION_MAX_AGE_DAYS",
        default_value_t = 7,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_AGE_DAYS)
    )]
    pub session_max_age_days: u64,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "SESSION_COOKIE_SECURE")]
    pub session_cookie_secure: bool,

    /// Seconds between expired-session sweeps
    #[arg(long, env = "SESSION_SWEEP_INTERVAL_SECS", default_value_t = 300)]
    pub session_sweep_interval_secs: u64,

    /// JSON file with accounts to create at startup
    #[arg(long, env = "ADMIN_SEED_FILE")]
    pub admin_seed_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "SIGN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig {
            seed_file: self.admin_seed_file.clone(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_age_days: self.session_max_age_days,
            cookie_secure: self.session_cookie_secure,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    /// Mount prefix with a leading slash and no trailing slash.
    /// `None` means the routes are mounted at the root.
    pub fn mount_prefix(&self) -> Option<String> {
        normalize_prefix(&self.mount_prefix)
    }
}

fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["sign-agent"]).unwrap();
        assert_eq!(config.listen, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.mount_prefix().as_deref(), Some("/sign"));
        assert_eq!(config.session_max_age_days, 7);
        assert!(!config.session_cookie_secure);
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
        assert!(config.admin_seed_file.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "sign-agent",
            "--listen",
            "127.0.0.1:8080",
            "--mount-prefix",
            "/api/sign/",
            "--session-max-age-days",
            "30",
            "--session-cookie-secure",
            "--admin-seed-file",
            "/etc/sign/users.json",
        ])
        .unwrap();

        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.mount_prefix().as_deref(), Some("/api/sign"));

        let session = config.session_config();
        assert_eq!(session.max_age_days, 30);
        assert!(session.cookie_secure);

        assert_eq!(
            config.admin_config().seed_file,
            Some(PathBuf::from("/etc/sign/users.json"))
        );
    }

    #[test]
    fn test_invalid_listen_address_is_rejected() {
        assert!(Config::try_parse_from(["sign-agent", "--listen", "nowhere"]).is_err());
    }

    #[test]
    fn test_session_max_age_out_of_range_is_rejected() {
        for days in ["0", "36501", "150000000000", "1000000000000"] {
            assert!(
                Config::try_parse_from(["sign-agent", "--session-max-age-days", days]).is_err(),
                "accepted {days}"
            );
        }

        let config =
            Config::try_parse_from(["sign-agent", "--session-max-age-days", "36500"]).unwrap();
        assert_eq!(config.session_max_age_days, MAX_SESSION_AGE_DAYS);
    }

    #[test]
    fn test_sweep_interval_never_zero() {
        let config =
            Config::try_parse_from(["sign-agent", "--session-sweep-interval-secs", "0"]).unwrap();
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/sign"), Some("/sign".to_string()));
        assert_eq!(normalize_prefix("sign"), Some("/sign".to_string()));
        assert_eq!(normalize_prefix("/sign/"), Some("/sign".to_string()));
        assert_eq!(normalize_prefix("/"), None);
        assert_eq!(normalize_prefix(""), None);
    }
}
