//! Field-level validation of inbound form submissions.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_DETAIL_LEN;
use crate::types::{ContactSubmission, FieldError, PilotApplication};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// Something that can be checked before it reaches an external service
pub trait Validate {
    /// Returns every failing field, not just the first
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Returns true for a syntactically valid address
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && !email.contains("..") && EMAIL_RE.is_match(email)
}

/// Collects field errors for one submission
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_valid_email(value.trim()) {
            self.errors.push(FieldError::new(field, "Valid email is required"));
        }
        self
    }

    fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) -> &mut Self {
        if value.chars().count() < min {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

impl Validate for ContactSubmission {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::default()
            .required("firstName", &self.first_name, "First name is required")
            .required("lastName", &self.last_name, "Last name is required")
            .email("email", &self.email)
            .required("subject", &self.subject, "Subject is required")
            .min_len(
                "message",
                &self.message,
                MIN_DETAIL_LEN,
                "Please provide more detail in your message",
            )
            .required("recaptchaToken", &self.recaptcha_token, "Please complete the CAPTCHA")
            .finish()
    }
}

impl Validate for PilotApplication {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::default()
            .required("fullName", &self.full_name, "Full name is required")
            .email("workEmail", &self.work_email)
            .required("companyName", &self.company_name, "Company name is required")
            .required("role", &self.role, "Role is required")
            .min_len(
                "dataNeeds",
                &self.data_needs,
                MIN_DETAIL_LEN,
                "Please describe your data needs in more detail",
            )
            .required("recaptchaToken", &self.recaptcha_token, "Please complete the CAPTCHA")
            .finish()
    }
}
