//! Transactional email API client.

use axiom_common::{AxiomError, EmailMessage};
use serde::Deserialize;

use crate::config::EmailConfig;

/// Email API acknowledgement
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Sends notification emails through the email API
pub struct Mailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
    to: String,
}

impl Mailer {
    pub fn new(client: reqwest::Client, config: &EmailConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn to_address(&self) -> &str {
        &self.to
    }

    /// Send one message.
    ///
    /// Only a missing key or a transport failure is an error. A response
    /// the API rejects is logged and still counts as sent.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), AxiomError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AxiomError::Config("RESEND_API_KEY is not configured".into()))?;

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| AxiomError::Upstream(format!("email request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unknown error"));
            tracing::error!(
                status = status.as_u16(),
                detail = %detail,
                subject = %message.subject,
                "Email API rejected message"
            );
            return Ok(());
        }

        let id = response
            .json::<SendResponse>()
            .await
            .ok()
            .and_then(|r| r.id);
        tracing::info!(email_id = ?id, subject = %message.subject, "Notification email sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn mailer(url: &str, key: Option<&str>) -> Mailer {
        let config = EmailConfig {
            api_key: key.map(str::to_string),
            api_url: format!("{url}/"),
            from: "from@example.com".into(),
            to: "to@example.com".into(),
        };
        Mailer::new(reqwest::Client::new(), &config)
    }

    fn message() -> EmailMessage {
        EmailMessage {
            from: "from@example.com".into(),
            to: vec!["to@example.com".into()],
            subject: "Contact Form: Hello".into(),
            html: "<p>Hello</p>".into(),
            reply_to: Some("ada@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_send_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::PartialJson(json!({
                "from": "from@example.com",
                "to": ["to@example.com"],
                "subject": "Contact Form: Hello",
                "reply_to": "ada@example.com",
            })))
            .with_status(200)
            .with_body(r#"{"id": "email_123"}"#)
            .create_async()
            .await;

        mailer(&server.url(), Some("re_test"))
            .send(&message())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_message_counts_as_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(r#"{"message": "Invalid `from` field"}"#)
            .create_async()
            .await;

        let result = mailer(&server.url(), Some("re_test")).send(&message()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream() {
        let result = mailer("http://127.0.0.1:1", Some("re_test"))
            .send(&message())
            .await;
        assert!(matches!(result, Err(AxiomError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let result = mailer("http://127.0.0.1:9", None).send(&message()).await;
        assert!(matches!(result, Err(AxiomError::Config(_))));
    }
}
