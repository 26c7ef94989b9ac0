//! Contact and pilot program submission endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use axiom_common::{
    ApiMessage, AxiomError, ContactSubmission, EmailMessage, FieldError, PilotApplication,
    Validate,
};
use crate::error::ApiError;
use crate::mail::{contact_email, pilot_email};
use crate::state::AppState;

const CONTACT_FAILURE: &str = "Failed to send message";
const PILOT_FAILURE: &str = "Failed to submit application";

/// Contact form submission
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<ApiMessage>, ApiError> {
    let Json(submission) = payload.map_err(rejected)?;

    process(
        &state,
        "contact",
        &submission,
        &submission.recaptcha_token,
        contact_email,
        CONTACT_FAILURE,
    )
    .await?;

    Ok(Json(ApiMessage {
        message: "Message sent successfully".to_string(),
    }))
}

/// Pilot program application
pub async fn submit_pilot_application(
    State(state): State<AppState>,
    payload: Result<Json<PilotApplication>, JsonRejection>,
) -> Result<Json<ApiMessage>, ApiError> {
    let Json(application) = payload.map_err(rejected)?;

    process(
        &state,
        "pilot-program",
        &application,
        &application.recaptcha_token,
        pilot_email,
        PILOT_FAILURE,
    )
    .await?;

    Ok(Json(ApiMessage {
        message: "Application submitted successfully".to_string(),
    }))
}

/// Validate, verify the CAPTCHA token, then send the notification.
/// Nothing is sent unless verification passes.
async fn process<T: Validate>(
    state: &AppState,
    form: &'static str,
    submission: &T,
    token: &str,
    build: fn(&str, &str, &T) -> EmailMessage,
    failure: &'static str,
) -> Result<(), ApiError> {
    if let Err(details) = submission.validate() {
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        tracing::info!(form, ?fields, "Rejected invalid submission");
        return Err(ApiError::InvalidForm(details));
    }

    state
        .captcha_verifier
        .verify(token)
        .await
        .map_err(|e| report(form, e, failure))?;

    let email = build(
        state.mailer.from_address(),
        state.mailer.to_address(),
        submission,
    );
    state
        .mailer
        .send(&email)
        .await
        .map_err(|e| report(form, e, failure))?;

    tracing::info!(form, "Submission accepted");
    Ok(())
}

fn report(form: &'static str, err: AxiomError, failure: &'static str) -> ApiError {
    if err.is_client_error() {
        tracing::info!(form, error = %err, "Submission refused");
    } else {
        tracing::error!(form, error = %err, "Submission failed");
    }
    ApiError::from_submission(err, failure)
}

fn rejected(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Malformed submission body");
    ApiError::InvalidForm(vec![FieldError::new("body", rejection.body_text())])
}
