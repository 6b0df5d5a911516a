// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tracing setup and log anonymization helpers.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `default_level` is used when `RUST_LOG` is not set, e.g. `"info"` or
/// `"sign_agent=debug,tower_http=info"`.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("Invalid log filter '{default_level}': {e}"))?;

    let fmt_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

/// Anonymize a username for logging.
/// Shows the first character only: "a***"
pub fn anonymize_username(username: &str) -> String {
    match username.chars().next() {
        Some(first) => format!("{}***", first),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_username() {
        assert_eq!(anonymize_username("alice"), "a***");
        assert_eq!(anonymize_username("bob"), "b***");
    }

    #[test]
    fn test_anonymize_username_single_char() {
        assert_eq!(anonymize_username("x"), "x***");
    }

    #[test]
    fn test_anonymize_username_empty() {
        assert_eq!(anonymize_username(""), "***");
    }

    #[test]
    fn test_anonymize_username_multibyte() {
        assert_eq!(anonymize_username("学号"), "学***");
    }
}
