//! Common error types for the Axiom site crates.

use thiserror::Error;

/// Common errors across Axiom components
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxiomError {
    /// Malformed or missing form fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote verification rejected the token or scored it too low
    #[error("CAPTCHA verification failed: {0}")]
    CaptchaVerificationFailed(String),

    /// Widget script loaded but its API never appeared
    #[error("CAPTCHA integration unavailable: {0}")]
    IntegrationUnavailable(String),

    /// Widget script failed at the network level
    #[error("CAPTCHA script failed to load: {0}")]
    ScriptLoadFailed(String),

    /// Remote render call failed or returned a malformed handle
    #[error("CAPTCHA widget creation failed: {0}")]
    WidgetCreationFailed(String),

    /// Email, verification, or CMS service failed
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Pending operation abandoned by a reset or destroy
    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl AxiomError {
    /// Returns true if the caller sent something we rejected
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::CaptchaVerificationFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(AxiomError::Validation("email".into()).is_client_error());
        assert!(AxiomError::CaptchaVerificationFailed("low score".into()).is_client_error());
        assert!(!AxiomError::Upstream("email API unreachable".into()).is_client_error());
        assert!(!AxiomError::Config("no key".into()).is_client_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AxiomError::Timeout("token".into()).to_string(),
            "Operation timed out: token"
        );
    }
}
