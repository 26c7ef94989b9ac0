//! CAPTCHA verification against the remote service.

use axiom_common::{AxiomError, CaptchaVerdict};

use crate::config::RecaptchaConfig;

/// CAPTCHA verifier service
pub struct CaptchaVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret_key: Option<String>,
    min_score: f64,
}

impl CaptchaVerifier {
    pub fn new(client: reqwest::Client, config: &RecaptchaConfig) -> Self {
        Self {
            client,
            verify_url: config.verify_url.clone(),
            secret_key: config.secret_key.clone(),
            min_score: config.min_score,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Verify a widget token.
    ///
    /// Returns the verdict when it passes. A rejected token or a score at
    /// or below the threshold is `CaptchaVerificationFailed`; transport and
    /// decode failures are `Upstream`.
    pub async fn verify(&self, token: &str) -> Result<CaptchaVerdict, AxiomError> {
        let secret = self
            .secret_key
            .as_deref()
            .ok_or_else(|| AxiomError::Config("RECAPTCHA_SECRET_KEY is not configured".into()))?;

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| AxiomError::Upstream(format!("verification request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AxiomError::Upstream(format!(
                "verification service returned {status}"
            )));
        }

        let verdict: CaptchaVerdict = response
            .json()
            .await
            .map_err(|e| AxiomError::Upstream(format!("invalid verification response: {e}")))?;

        if verdict.passes(self.min_score) {
            tracing::debug!(score = ?verdict.score, "CAPTCHA verified successfully");
            Ok(verdict)
        } else {
            tracing::info!(
                success = verdict.success,
                score = ?verdict.score,
                error_codes = ?verdict.error_codes,
                "CAPTCHA verification failed"
            );
            Err(AxiomError::CaptchaVerificationFailed(match verdict.score {
                Some(score) if verdict.success => format!("score {score} below threshold"),
                _ => "token rejected".to_string(),
            }))
        }
    }
}
