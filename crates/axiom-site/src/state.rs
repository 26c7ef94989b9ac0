//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::captcha::CaptchaVerifier;
use crate::cms::CmsClient;
use crate::config::AppConfig;
use crate::mail::Mailer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// CAPTCHA token verifier
    pub captcha_verifier: Arc<CaptchaVerifier>,

    /// Notification email sender
    pub mailer: Arc<Mailer>,

    /// CMS query client
    pub cms: Arc<CmsClient>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create application state with one pooled HTTP client for every upstream
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(format!("axiom-site/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let captcha_verifier = Arc::new(CaptchaVerifier::new(http.clone(), &config.recaptcha));
        let mailer = Arc::new(Mailer::new(http.clone(), &config.email));
        let cms = Arc::new(CmsClient::new(http, &config.cms));

        Ok(Self {
            config,
            captcha_verifier,
            mailer,
            cms,
            started_at: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
