//! # Axiom Site - form and feed services
//!
//! Back end of the Axiom Legal Data website. Accepts contact and pilot
//! program submissions, verifies their CAPTCHA tokens, sends notification
//! emails, and publishes the blog's RSS feed.
//!
//! ## Architecture
//! ```text
//! Browser → axiom-site ──► CAPTCHA verification API
//!               │ ├──────► Email API
//!               │ └──────► CMS query API
//!               └─ /api/contact, /api/pilot-program, /api/rss, /api/posts
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod captcha;
mod cms;
mod config;
mod error;
mod mail;
mod routes;
mod rss;
mod state;

use config::AppConfig;
use state::AppState;

/// Axiom site services
#[derive(Parser, Debug, Default)]
#[command(name = "axiom-site")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/axiom-site.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Public site URL used in feed links
    #[arg(long, env = "NEXT_PUBLIC_SITE_URL")]
    site_url: Option<String>,

    /// CAPTCHA verification secret
    #[arg(long, env = "RECAPTCHA_SECRET_KEY", hide_env_values = true)]
    recaptcha_secret: Option<String>,

    /// Email API key
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    email_api_key: Option<String>,

    /// Notification sender address
    #[arg(long, env = "FROM_EMAIL")]
    from_email: Option<String>,

    /// Notification recipient address
    #[arg(long, env = "TO_EMAIL")]
    to_email: Option<String>,

    /// CMS project id
    #[arg(long, env = "SANITY_PROJECT_ID")]
    cms_project_id: Option<String>,

    /// CMS dataset
    #[arg(long, env = "SANITY_DATASET")]
    cms_dataset: Option<String>,

    /// CMS read token
    #[arg(long, env = "SANITY_API_TOKEN", hide_env_values = true)]
    cms_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env feeds the environment before clap reads it
    let dotenv = dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Axiom site services v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = AppConfig::load(&args.config, &args)?;
    info!("Configuration loaded from {}", args.config);
    config.warn_missing_secrets();

    let state = AppState::new(config.clone())?;

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Axiom site listening on {}", config.listen_addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Axiom site shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()?;
    }

    Ok(())
}
