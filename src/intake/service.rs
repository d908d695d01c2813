//! Trust-boundary pipeline for one submission: rate gate, parse, full
//! validation, configuration check, single upstream forward.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::{ForwarderConfig, RateLimitConfig};

use super::forwarder::SheetForwarder;
use super::ratelimit::{FixedWindowLimiter, RateLimitOptions};
use super::schema::{self, FieldErrors};

/// Caller-facing result of one submission attempt. Every variant maps to a
/// stable HTTP status + JSON contract in the router.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Accepted,
    RateLimited {
        retry_after_secs: i64,
        limit: u32,
        remaining: u32,
        reset_at_ms: i64,
    },
    Malformed,
    Invalid(FieldErrors),
    Misconfigured,
    UpstreamFailed,
}

/// Service owning the limiter, the outbound client, and the delivery settings.
pub struct SubmissionService {
    limiter: FixedWindowLimiter,
    forwarder: SheetForwarder,
    forwarder_config: ForwarderConfig,
    rate_limit: RateLimitConfig,
}

impl SubmissionService {
    pub fn new(forwarder_config: ForwarderConfig, rate_limit: RateLimitConfig) -> Self {
        Self {
            limiter: FixedWindowLimiter::default(),
            forwarder: SheetForwarder::default(),
            forwarder_config,
            rate_limit,
        }
    }

    /// Run the full pipeline for one request body from `client_key`.
    pub async fn submit(&self, client_key: &str, body: &[u8]) -> SubmissionOutcome {
        let options = RateLimitOptions {
            window_ms: self.rate_limit.window_ms,
            max_requests: self.rate_limit.max_requests,
        };
        let decision = self.limiter.check(client_key, options);
        if !decision.allowed {
            let now_ms = chrono::Utc::now().timestamp_millis();
            let retry_after_secs = ((decision.reset_at_ms - now_ms).max(0) + 999) / 1000;
            warn!(client = %client_key, "submission rate limit exceeded");
            return SubmissionOutcome::RateLimited {
                retry_after_secs: retry_after_secs.max(1),
                limit: self.rate_limit.max_requests,
                remaining: decision.remaining,
                reset_at_ms: decision.reset_at_ms,
            };
        }

        let record = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => return SubmissionOutcome::Malformed,
        };

        let application = match schema::parse_full(&record) {
            Ok(application) => application,
            Err(errors) => return SubmissionOutcome::Invalid(errors),
        };

        let (url, secret) = match (
            self.forwarder_config.webapp_url.as_deref(),
            self.forwarder_config.secret.as_deref(),
        ) {
            (Some(url), Some(secret)) => (url, secret),
            _ => {
                error!("webhook URL or shared secret missing from configuration");
                return SubmissionOutcome::Misconfigured;
            }
        };

        match self.forwarder.forward(url, secret, &application).await {
            Ok(()) => {
                info!(client = %client_key, "application forwarded to webhook");
                SubmissionOutcome::Accepted
            }
            Err(err) => {
                warn!(client = %client_key, error = %err, "upstream delivery failed");
                SubmissionOutcome::UpstreamFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(config: ForwarderConfig) -> SubmissionService {
        SubmissionService::new(
            config,
            RateLimitConfig {
                window_ms: 600_000,
                max_requests: 10,
            },
        )
    }

    #[tokio::test]
    async fn malformed_body_short_circuits() {
        let service = service(ForwarderConfig::default());
        let outcome = service.submit("t-1", b"not json").await;
        assert!(matches!(outcome, SubmissionOutcome::Malformed));

        // A well-formed body that is not an object is malformed too.
        let outcome = service.submit("t-1", b"[1,2,3]").await;
        assert!(matches!(outcome, SubmissionOutcome::Malformed));
    }

    #[tokio::test]
    async fn invalid_record_reports_field_errors() {
        let service = service(ForwarderConfig::default());
        let outcome = service.submit("t-2", b"{}").await;
        match outcome {
            SubmissionOutcome::Invalid(errors) => {
                assert!(errors.contains("agree_all_conditions"));
                assert!(errors.contains("session_plan"));
            }
            other => panic!("expected validation outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_applies_before_parsing() {
        let service = service(ForwarderConfig::default());
        for _ in 0..10 {
            service.submit("t-3", b"garbage").await;
        }
        let outcome = service.submit("t-3", b"garbage").await;
        match outcome {
            SubmissionOutcome::RateLimited {
                retry_after_secs,
                limit,
                remaining,
                ..
            } => {
                assert!(retry_after_secs >= 1);
                assert_eq!(limit, 10);
                assert_eq!(remaining, 0);
            }
            other => panic!("expected rate-limited outcome, got {other:?}"),
        }
    }
}
