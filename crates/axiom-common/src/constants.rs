//! Shared constants for the Axiom site crates.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Public site URL used for feed links
pub const DEFAULT_SITE_URL: &str = "https://axiomlegaldata.com";

/// Remote CAPTCHA verification endpoint
pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Widget script, loaded with explicit rendering
pub const RECAPTCHA_SCRIPT_URL: &str = "https://www.google.com/recaptcha/api.js?render=explicit";

/// Substring identifying stale widget script tags
pub const RECAPTCHA_SCRIPT_PATTERN: &str = "recaptcha";

/// Verification scores must be strictly greater than this to pass
pub const MIN_CAPTCHA_SCORE: f64 = 0.5;

/// Seconds a form waits for a widget token before giving up
pub const TOKEN_WAIT_TIMEOUT_SECS: u64 = 10;

/// Minimum length of free-text form fields (message, data needs)
pub const MIN_DETAIL_LEN: usize = 10;

/// Transactional email API
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";

/// Sender used when none is configured
pub const DEFAULT_FROM_EMAIL: &str = "onboarding@resend.dev";

/// Notification recipient used when none is configured
pub const DEFAULT_TO_EMAIL: &str = "contact@axiomlegaldata.com";

/// CMS query API version
pub const CMS_API_VERSION: &str = "2024-09-04";

/// Default CMS dataset
pub const CMS_DEFAULT_DATASET: &str = "production";

/// Number of posts in the RSS feed
pub const RSS_ITEM_LIMIT: usize = 20;

/// Related posts shown under a single post
pub const RELATED_POST_LIMIT: usize = 3;

/// Cache for 24 hours, allow stale for 12 hours
pub const RSS_CACHE_CONTROL: &str = "public, s-maxage=86400, stale-while-revalidate=43200";

/// Outbound HTTP timeout (seconds)
pub const UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Feed channel metadata
pub mod feed {
    pub const TITLE: &str = "Axiom Legal Data Blog";

    pub const DESCRIPTION: &str = "Insights into legal AI, synthetic data generation, and the future of legal technology from Axiom Legal Data.";

    pub const LANGUAGE: &str = "en-US";

    pub const EDITOR: &str = "noreply@axiomlegaldata.com (Axiom Legal Data)";

    /// Address shown in each item's author line
    pub const AUTHOR_EMAIL: &str = "noreply@axiomlegaldata.com";

    /// Logo path, relative to the site URL
    pub const LOGO_PATH: &str = "/axiom-logo.svg";
}
