//! Contact form submission gateway

use crate::{
    error::{AppError, Result},
    models::{ContactPayload, MessageResponse, SubmissionDisposition},
    rate_limit::RateLimitDecision,
    validation::is_valid_email,
    AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

/// Handles `POST /api/contact`.
///
/// The steps run in a fixed order: identity resolution, rate limiting, body
/// parse, honeypot filter, validation, sanitization, notification hand-off.
/// Rate limiting comes before the body parse, so a malformed body still
/// consumes a window slot. The server never trusts the client's validation.
pub async fn handle_contact_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let identity = resolve_caller_identity(&headers);

    if let RateLimitDecision::Limited { retry_after_seconds } =
        state.rate_limiter.check(&identity)
    {
        info!(identity = %identity, disposition = ?SubmissionDisposition::RejectedRateLimited,
            "contact submission rejected");
        return Err(AppError::RateLimited { retry_after_seconds });
    }

    let payload: ContactPayload = serde_json::from_slice(&body).map_err(|err| {
        info!(identity = %identity, disposition = ?SubmissionDisposition::RejectedMalformedBody,
            error = %err, "contact submission rejected");
        AppError::MalformedBody
    })?;

    // Bots fill the hidden field. Answer exactly like a real success so
    // detection is indistinguishable from acceptance, and forward nothing.
    if !payload.honeypot.is_empty() {
        info!(identity = %identity, disposition = ?SubmissionDisposition::SilentlyDiscarded,
            "contact submission discarded");
        return Ok(Json(MessageResponse::sent()));
    }

    if payload.has_empty_required_field() {
        info!(identity = %identity, disposition = ?SubmissionDisposition::RejectedValidation,
            "contact submission rejected");
        return Err(AppError::missing_fields());
    }

    // Validated as received: the client sends trimmed values, so a padded
    // email only ever comes from a non-conforming caller.
    if !is_valid_email(&payload.email) {
        info!(identity = %identity, disposition = ?SubmissionDisposition::RejectedValidation,
            "contact submission rejected");
        return Err(AppError::invalid_email());
    }

    let record = payload.sanitize();

    // Best-effort hand-off: a delivery failure is logged, never surfaced.
    if let Err(err) = state.notifier.deliver(&record).await {
        warn!(identity = %identity, error = %err, "notification delivery failed");
    }

    info!(identity = %identity, disposition = ?SubmissionDisposition::Accepted,
        "contact submission accepted");
    Ok(Json(MessageResponse::sent()))
}

/// Resolves the caller identity from the first of: the first comma-separated
/// entry of `x-forwarded-for`, then `x-real-ip`, else `"unknown"`.
fn resolve_caller_identity(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let map = headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(resolve_caller_identity(&map), "203.0.113.7");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let map = headers(&[("x-real-ip", "198.51.100.1")]);
        assert_eq!(resolve_caller_identity(&map), "198.51.100.1");
    }

    #[test]
    fn empty_forwarded_entry_falls_through() {
        let map = headers(&[("x-forwarded-for", " ,10.0.0.1"), ("x-real-ip", "198.51.100.1")]);
        assert_eq!(resolve_caller_identity(&map), "198.51.100.1");
    }

    #[test]
    fn no_headers_means_unknown() {
        assert_eq!(resolve_caller_identity(&HeaderMap::new()), "unknown");
    }
}
