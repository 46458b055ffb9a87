use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Notify request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} from notify endpoint: {body}")]
    Rejected { status: u16, body: String },
}

/// Destination for the composed cost message.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Form-encoded bearer-token webhook (LINE Notify compatible).
pub struct LineNotifier {
    endpoint: reqwest::Url,
    token: String,
}

impl LineNotifier {
    pub fn new(endpoint: reqwest::Url, token: String) -> Self {
        Self { endpoint, token }
    }
}

impl std::fmt::Debug for LineNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineNotifier")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl NotifyChannel for LineNotifier {
    fn name(&self) -> &'static str {
        "line"
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(NotifyError::Client)?;

        debug!(endpoint = %self.endpoint, bytes = message.len(), "posting notification");

        let response = client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = rejection_body(response.text().await);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(status = status.as_u16(), "notification sent");
        Ok(())
    }
}

/// Body of a rejected response, or the read failure in its place.
fn rejection_body(read: Result<String, reqwest::Error>) -> String {
    match read {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
