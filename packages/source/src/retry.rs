//! HTTP retry helper for transient errors.
//!
//! The gateway goes through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets the
//! configured attempt ceiling and backoff for transient failures
//! (timeouts, connection resets, unreadable bodies, HTTP 5xx and 429).
//!
//! ```ignore
//! let response = retry::send_json(|| client.get(&url).query(&params), &policy).await?;
//! ```

use agri_data_source_models::RetryPolicy;

use crate::SourceError;

/// Maximum length of the response body preview included in logs.
const BODY_PREVIEW_LEN: usize = 300;

/// A decoded JSON response.
#[derive(Debug)]
pub struct JsonResponse {
    /// Final request URL, query string included.
    pub url: reqwest::Url,
    /// HTTP status.
    pub status: reqwest::StatusCode,
    /// Parsed body.
    pub body: serde_json::Value,
}

/// Sends a request and parses the response body as JSON.
///
/// `build_request` is called once per attempt because builders are
/// consumed by `.send()`.
///
/// Transient failures are retried until `policy.max_attempts` attempts
/// have been made. Any response whose body is valid JSON is returned
/// as-is, whatever its status, so the caller can classify well-formed
/// API errors without retrying them. HTTP 4xx (other than 429) with a
/// non-JSON body is permanent.
///
/// Error values never carry the request URL, since it includes the API
/// key.
///
/// # Errors
///
/// Returns [`SourceError`] with the last failure reason once attempts
/// are exhausted, or immediately for non-transient failures.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F, policy: &RetryPolicy) -> Result<JsonResponse, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error: Option<SourceError> = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = policy.backoff.delay(attempt - 1);
            log::warn!("  retry {}/{} in {delay:?}...", attempt - 1, attempts - 1);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if is_transient(&e) => {
                let e = e.without_url();
                log::warn!("  transient error: {e}");
                last_error = Some(SourceError::Http(e));
                continue;
            }
            Err(e) => return Err(SourceError::Http(e.without_url())),
        };

        let url = response.url().clone();
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            log::warn!("  HTTP {status} (retryable)");
            last_error = Some(SourceError::Status {
                status: status.as_u16(),
            });
            continue;
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let e = e.without_url();
                log::warn!("  response body read failed: {e}");
                last_error = Some(SourceError::Http(e));
                continue;
            }
        };

        match serde_json::from_str(&text) {
            Ok(body) => return Ok(JsonResponse { url, status, body }),
            Err(_) if status.is_client_error() => {
                return Err(SourceError::Status {
                    status: status.as_u16(),
                });
            }
            Err(e) => {
                log::warn!(
                    "  JSON parse failed (status={status}, {} bytes): {e}\n  body preview: {}",
                    text.len(),
                    preview(&text),
                );
                last_error = Some(SourceError::Json(e));
            }
        }
    }

    Err(last_error.unwrap_or(SourceError::RetriesExhausted { attempts }))
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
