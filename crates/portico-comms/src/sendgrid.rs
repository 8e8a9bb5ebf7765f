//! SendGrid REST client — outbound transactional email.

use serde_json::json;
use tracing::{debug, error};

use crate::error::CommsError;
use crate::provider::{EmailProvider, OutboundEmail};

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SendGridClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
        }
    }

    /// Point the client at a different API root (test servers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl EmailProvider for SendGridClient {
    async fn send_email(&self, email: OutboundEmail) -> Result<(), CommsError> {
        let mut payload = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": email.from },
            "subject": email.subject,
            "content": [{ "type": "text/plain", "value": email.body }],
        });
        if let Some(reply_to) = email.reply_to {
            payload["reply_to"] = json!({ "email": reply_to });
        }

        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "SendGrid dispatch rejected");
            return Err(CommsError::Provider(format!(
                "SendGrid mail API returned {status}: {body}"
            )));
        }

        debug!("SendGrid dispatch accepted");
        Ok(())
    }
}
