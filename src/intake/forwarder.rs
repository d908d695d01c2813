//! Outbound delivery of accepted applications to the spreadsheet webhook.

use serde_json::{Map, Value};

use super::domain::TeacherApplication;

/// Error raised by a forwarding attempt. The proxy never retries; callers map
/// both variants to the same bad-gateway outcome.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for the operator-configured webhook.
pub struct SheetForwarder {
    client: reqwest::Client,
}

const UPSTREAM_TIMEOUT_SECS: u64 = 15;

impl Default for SheetForwarder {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("reqwest client builds with static configuration");
        Self { client }
    }
}

impl SheetForwarder {
    /// POST the normalized record, merged with the shared secret, as a single
    /// JSON object. The upstream body is ignored; only the status matters.
    pub async fn forward(
        &self,
        url: &str,
        secret: &str,
        record: &TeacherApplication,
    ) -> Result<(), ForwardError> {
        let mut payload = Map::new();
        payload.insert("secret".to_string(), Value::String(secret.to_string()));
        if let Ok(Value::Object(fields)) = serde_json::to_value(record) {
            payload.extend(fields);
        }

        let response = self
            .client
            .post(url)
            .json(&Value::Object(payload))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ForwardError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
