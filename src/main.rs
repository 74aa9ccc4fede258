//! Hugo gateway - publish Markdown content over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hugo_gateway::{
    api::{self, AppState},
    config::Config,
    site::date,
};

/// HTTP gateway that publishes posts into a Hugo site.
#[derive(Parser)]
#[command(name = "hugo-gateway", about = "Publish Markdown content to a Hugo site over HTTP")]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long, env = "HUGO_GATEWAY_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Listen address, overriding `listen_addr` from the config file.
    #[arg(long, env = "HUGO_GATEWAY_LISTEN")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hugo_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(listen) = cli.listen {
        config = config.with_listen_addr(listen);
    }

    // Every timestamp depends on the fixed zone; refuse to start without it.
    date::site_timezone().context("time zone unavailable")?;

    tracing::info!(
        content_dir = %config.content_dir.display(),
        moment_dir = %config.moment_dir.display(),
        project_dir = %config.project_dir.display(),
        build_exec = %config.build_exec.display(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config));
    api::serve(state).await?;

    Ok(())
}
