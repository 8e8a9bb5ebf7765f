//! Communications configuration.

/// Configuration for the communications service.
#[derive(Debug, Clone)]
pub struct CommsConfig {
    /// The system's single shared outbound phone identity
    /// (E.164). Used as the virtual address for call and chat
    /// inquiries and as the `From` of outbound dispatches.
    pub phone_number: String,
    /// Domain for per-listing email aliases
    /// (`agent-<listingId>@<domain>`).
    pub email_domain: String,
    /// `From` address for outbound email.
    pub email_from: String,
    /// Absolute URL the provider posts call/message status events to.
    pub status_callback_url: Option<String>,
}

impl Default for CommsConfig {
    fn default() -> Self {
        Self {
            phone_number: String::new(),
            email_domain: "portico.example".into(),
            email_from: "noreply@portico.example".into(),
            status_callback_url: None,
        }
    }
}
