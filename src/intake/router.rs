use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::service::{SubmissionOutcome, SubmissionService};

/// Router builder exposing the submission endpoint.
pub fn intake_router(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/submit", post(submit_endpoint))
        .with_state(service)
}

/// Rate-limit key: first forwarded-for hop, then the real-ip header, then a
/// shared sentinel. The limiter itself is agnostic to this policy.
pub(crate) fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

// The body arrives as raw bytes so a JSON parse failure stays distinguishable
// from a schema failure; axum's Json extractor would fold both into one
// rejection.
pub(crate) async fn submit_endpoint(
    State(service): State<Arc<SubmissionService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let key = client_key(&headers);

    match service.submit(&key, &body).await {
        SubmissionOutcome::Accepted => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        SubmissionOutcome::RateLimited {
            retry_after_secs,
            limit,
            remaining,
            reset_at_ms,
        } => {
            let payload = json!({
                "ok": false,
                "message": "تم تجاوز الحد المسموح من المحاولات. الرجاء المحاولة لاحقًا.",
            });
            let mut response =
                (StatusCode::TOO_MANY_REQUESTS, Json(payload)).into_response();
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-reset"),
                HeaderValue::from(reset_at_ms),
            );
            response
        }
        SubmissionOutcome::Malformed => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "message": "تعذر قراءة البيانات المرسلة. الرجاء إعادة المحاولة.",
            })),
        )
            .into_response(),
        SubmissionOutcome::Invalid(errors) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "message": "هناك بعض الحقول تحتاج مراجعة بسيطة قبل الإرسال.",
                "errors": errors,
            })),
        )
            .into_response(),
        SubmissionOutcome::Misconfigured => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "ok": false,
                "message": "إعدادات الخادم غير مكتملة. الرجاء المحاولة لاحقًا.",
            })),
        )
            .into_response(),
        SubmissionOutcome::UpstreamFailed => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "ok": false,
                "message": "تعذر إرسال البيانات إلى Google Sheet. الرجاء المحاولة لاحقًا.",
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_key_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_key(&headers), "203.0.113.9");
    }

    #[test]
    fn client_key_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static(" 198.51.100.2 "));
        assert_eq!(client_key(&headers), "198.51.100.2");
    }

    #[test]
    fn client_key_defaults_to_unknown() {
        assert_eq!(client_key(&HeaderMap::new()), "unknown");

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        assert_eq!(client_key(&headers), "unknown");
    }
}
