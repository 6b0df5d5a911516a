// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use sign_agent::app::{create_router, VERSION};
use sign_agent::config::Config;
use sign_agent::routes::SignState;
use sign_agent::services::logging::init_tracing;
use sign_agent::services::memory_admin::InMemoryAdmin;
use sign_agent::services::session::SessionStore;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level)?;

    let admin = InMemoryAdmin::from_config(&config.admin_config()).await?;
    let sessions = SessionStore::new(config.session_config());
    let _sweeper = sessions.spawn_sweeper(config.sweep_interval());

    let mount_prefix = config.mount_prefix();
    let app = create_router(
        SignState::new(Arc::new(admin), sessions),
        mount_prefix.as_deref(),
    );

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    info!(
        version = VERSION,
        addr = %config.listen,
        prefix = mount_prefix.as_deref().unwrap_or("/"),
        "sign-agent listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}
