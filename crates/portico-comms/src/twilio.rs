//! Twilio REST client — outbound calls and chat messages.
//!
//! Only the two resource-creation endpoints the broker needs are
//! covered. Authentication is HTTP basic with the account SID and
//! auth token; responses are the documented JSON resources, of which
//! only `sid` is read.

use serde::Deserialize;
use tracing::{debug, error};

use crate::error::CommsError;
use crate::provider::{DispatchReceipt, MessagingProvider, OutboundCall, OutboundMessage};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Minimal projection of a created call/message resource.
#[derive(Debug, Deserialize)]
struct ResourceResponse {
    sid: Option<String>,
}

#[derive(Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            account_sid,
            auth_token,
        }
    }

    /// Point the client at a different API root (test servers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{resource}.json",
            self.base_url, self.account_sid
        )
    }

    async fn post_form(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<DispatchReceipt, CommsError> {
        let response = self
            .http
            .post(self.endpoint(resource))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, resource, "Twilio dispatch rejected");
            return Err(CommsError::Provider(format!(
                "Twilio {resource} API returned {status}: {body}"
            )));
        }

        let resource_body: ResourceResponse = response.json().await?;
        debug!(sid = ?resource_body.sid, resource, "Twilio dispatch accepted");
        Ok(DispatchReceipt {
            provider_id: resource_body.sid,
        })
    }
}

impl MessagingProvider for TwilioClient {
    async fn place_call(&self, call: OutboundCall) -> Result<DispatchReceipt, CommsError> {
        let mut params = vec![("To", call.to.as_str()), ("From", call.from.as_str())];
        // The call needs instructions to execute once answered; the
        // status callback additionally receives lifecycle events.
        if let Some(url) = call.status_callback.as_deref() {
            params.push(("Url", url));
            params.push(("StatusCallback", url));
        }
        self.post_form("Calls", &params).await
    }

    async fn send_message(
        &self,
        message: OutboundMessage,
    ) -> Result<DispatchReceipt, CommsError> {
        let mut params = vec![
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];
        if let Some(url) = message.status_callback.as_deref() {
            params.push(("StatusCallback", url));
        }
        self.post_form("Messages", &params).await
    }
}
