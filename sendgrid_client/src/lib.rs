//! Thin outbound-email client over the SendGrid v3 mail-send API.
//!
//! Callers treat email as best-effort: failures are logged at the call
//! site and never fail the operation that triggered the email.

mod send_email;

use models_pool_notifications::EmailMessage;

/// Anything that can deliver an [`EmailMessage`].
pub trait EmailSender: Send + Sync + 'static {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Clone, Debug)]
pub struct SendGridClient {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
    base_url: String,
}

impl SendGridClient {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            from_email,
            base_url: "https://api.sendgrid.com".to_string(),
        }
    }

    /// Overrides the API base URL. Used against a stub server in tests.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl EmailSender for SendGridClient {
    #[tracing::instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        send_email::send_email(
            &self.http,
            &self.base_url,
            &self.api_key,
            &self.from_email,
            message,
        )
        .await
    }
}
