//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use axiom_common::{ApiErrorBody, AxiomError, FieldError};

/// An error on its way back to the browser
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body failed to parse or validate
    #[error("Invalid form data")]
    InvalidForm(Vec<FieldError>),

    /// Verification service rejected the token
    #[error("CAPTCHA verification failed")]
    Captcha,

    /// Anything else on a submission; the message is route-specific
    #[error("{0}")]
    Failed(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// The CMS could not answer
    #[error("Content unavailable")]
    BadGateway,
}

impl ApiError {
    /// Map a submission pipeline error, hiding upstream detail from the client
    pub fn from_submission(err: AxiomError, failure: &'static str) -> Self {
        match err {
            AxiomError::Validation(message) => {
                Self::InvalidForm(vec![FieldError::new("body", message)])
            }
            AxiomError::CaptchaVerificationFailed(_) => Self::Captcha,
            _ => Self::Failed(failure),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidForm(_) | Self::Captcha => StatusCode::BAD_REQUEST,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let details = match self {
            Self::InvalidForm(details) => Some(details),
            _ => None,
        };
        (status, Json(ApiErrorBody { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_mapping() {
        assert!(matches!(
            ApiError::from_submission(
                AxiomError::CaptchaVerificationFailed("low".into()),
                "Failed to send message"
            ),
            ApiError::Captcha
        ));

        let err = ApiError::from_submission(
            AxiomError::Upstream("email API returned 500".into()),
            "Failed to send message",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to send message");

        let err = ApiError::from_submission(AxiomError::Config("no key".into()), "Failed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
