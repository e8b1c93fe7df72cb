//! EMWOS allocator server.
//!
//! Loads the resource pool, then serves allocate/release requests until Ctrl+C.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use emwos_allocator::builders::build_scheduler;
use emwos_allocator::config::ServerConfig;
use emwos_allocator::core::AppResult;
use emwos_allocator::runtime;
use emwos_allocator::util::init_tracing;
use tracing::{error, info};

#[tokio::main]
async fn main() -> AppResult<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env().map_err(|e| anyhow!("configuration invalid: {e}"))?;
    let log_file = init_tracing(&config.log_level, config.log_dir.as_deref())?;
    match &log_file {
        Some(path) => info!(log_file = %path.display(), "server starting"),
        None => info!("server starting"),
    }

    let scheduler = match build_scheduler(&config) {
        Ok(scheduler) => Arc::new(scheduler),
        Err(e) => {
            error!(error = %e, "error reading resources file");
            return Err(e.into());
        }
    };
    info!(
        resources = scheduler.pool().len(),
        groups = ?scheduler.pool().groups(),
        "resource pool ready"
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "server running");

    runtime::serve(listener, scheduler, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("received shutdown signal");
    })
    .await?;

    info!("server stopped");
    Ok(())
}
