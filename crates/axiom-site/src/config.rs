//! Configuration management for the site services.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use axiom_common::constants::{
    CMS_API_VERSION, CMS_DEFAULT_DATASET, DEFAULT_EMAIL_API_URL, DEFAULT_FROM_EMAIL,
    DEFAULT_LISTEN_ADDR, DEFAULT_SITE_URL, DEFAULT_TO_EMAIL, MIN_CAPTCHA_SCORE,
    RECAPTCHA_VERIFY_URL, UPSTREAM_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Public site URL (feed links, CORS origin)
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for calls to external services, in seconds
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,

    /// CAPTCHA verification configuration
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,

    /// Notification email configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Headless CMS configuration
    #[serde(default)]
    pub cms: CmsConfig,
}

/// CAPTCHA verification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaConfig {
    /// Server-side verification secret
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Verification endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// Scores must be strictly above this to pass
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            verify_url: default_verify_url(),
            min_score: default_min_score(),
        }
    }
}

/// Email API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_email_api_url")]
    pub api_url: String,

    #[serde(default = "default_from")]
    pub from: String,

    #[serde(default = "default_to")]
    pub to: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_email_api_url(),
            from: default_from(),
            to: default_to(),
        }
    }
}

/// CMS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    #[serde(default = "default_project_id")]
    pub project_id: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Read token for private datasets
    #[serde(default)]
    pub token: Option<String>,

    /// Query the edge cache instead of the live API
    #[serde(default)]
    pub use_cdn: bool,

    /// Full base URL, replacing the one derived from the project id
    #[serde(default)]
    pub api_host: Option<String>,
}

impl CmsConfig {
    /// Base URL of the query API
    pub fn base_url(&self) -> String {
        match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => {
                let api = if self.use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{}.sanity.io", self.project_id, api)
            }
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: None,
            use_cdn: false,
            api_host: None,
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_site_url() -> String { DEFAULT_SITE_URL.to_string() }
fn default_request_timeout() -> u64 { 30 }
fn default_upstream_timeout() -> u64 { UPSTREAM_TIMEOUT_SECS }
fn default_verify_url() -> String { RECAPTCHA_VERIFY_URL.to_string() }
fn default_min_score() -> f64 { MIN_CAPTCHA_SCORE }
fn default_email_api_url() -> String { DEFAULT_EMAIL_API_URL.to_string() }
fn default_from() -> String { DEFAULT_FROM_EMAIL.to_string() }
fn default_to() -> String { DEFAULT_TO_EMAIL.to_string() }
fn default_project_id() -> String { "dummy-project-id".to_string() }
fn default_dataset() -> String { CMS_DEFAULT_DATASET.to_string() }
fn default_api_version() -> String { CMS_API_VERSION.to_string() }

impl AppConfig {
    /// Load configuration from file and `AXIOM__` environment, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut builder = config::Config::builder();

        if Path::new(config_path).exists() {
            builder = builder.add_source(config::File::with_name(config_path));
        } else {
            tracing::warn!(path = config_path, "Config file not found, using defaults");
        }

        let mut config: Self = builder
            .add_source(config::Environment::with_prefix("AXIOM").separator("__"))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.apply_overrides(args);
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &super::Args) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value.as_ref().filter(|v| !v.trim().is_empty()) {
                *target = value.clone();
            }
        };
        let set_opt = |target: &mut Option<String>, value: &Option<String>| {
            if let Some(value) = value.as_ref().filter(|v| !v.trim().is_empty()) {
                *target = Some(value.clone());
            }
        };

        set(&mut self.listen_addr, &args.listen);
        set(&mut self.site_url, &args.site_url);
        set_opt(&mut self.recaptcha.secret_key, &args.recaptcha_secret);
        set_opt(&mut self.email.api_key, &args.email_api_key);
        set(&mut self.email.from, &args.from_email);
        set(&mut self.email.to, &args.to_email);
        set(&mut self.cms.project_id, &args.cms_project_id);
        set(&mut self.cms.dataset, &args.cms_dataset);
        set_opt(&mut self.cms.token, &args.cms_token);
    }

    /// Submissions fail at request time without these; say so at startup
    pub fn warn_missing_secrets(&self) {
        if self.recaptcha.secret_key.is_none() {
            tracing::warn!("RECAPTCHA_SECRET_KEY is not configured; form submissions will fail");
        }
        if self.email.api_key.is_none() {
            tracing::warn!("RESEND_API_KEY is not configured; notification emails will fail");
        }
    }

    /// Site URL without a trailing slash
    pub fn site_root(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            site_url: default_site_url(),
            request_timeout_secs: default_request_timeout(),
            upstream_timeout_secs: default_upstream_timeout(),
            recaptcha: RecaptchaConfig::default(),
            email: EmailConfig::default(),
            cms: CmsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Args;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.recaptcha.min_score, 0.5);
        assert_eq!(config.email.to, "contact@axiomlegaldata.com");
        assert_eq!(config.cms.api_version, "2024-09-04");
        assert_eq!(config.cms.base_url(), "https://dummy-project-id.api.sanity.io");
    }

    #[test]
    fn test_cdn_and_host_override() {
        let mut cms = CmsConfig {
            project_id: "abc123".into(),
            use_cdn: true,
            ..Default::default()
        };
        assert_eq!(cms.base_url(), "https://abc123.apicdn.sanity.io");

        cms.api_host = Some("http://127.0.0.1:9999/".into());
        assert_eq!(cms.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args {
            listen: Some("0.0.0.0:8080".into()),
            recaptcha_secret: Some("secret".into()),
            to_email: Some("  ".into()),
            ..Default::default()
        };
        let mut config = AppConfig::default();
        config.apply_overrides(&args);

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.recaptcha.secret_key.as_deref(), Some("secret"));
        // Blank values do not clobber defaults
        assert_eq!(config.email.to, DEFAULT_TO_EMAIL);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml", &Args::default()).unwrap();
        assert_eq!(config.site_root(), "https://axiomlegaldata.com");
    }
}
