//! Shared HTTP plumbing for every adapter. One blocking client is built
//! once and reused across workers (§9 — "a single shared HTTP client is
//! safe and preferred"); the per-station state that genuinely needs to be
//! worker-local (benchmark latency samples) lives on the reader instance,
//! never here.

use std::sync::OnceLock;
use std::time::Duration;
use weather_core::{CollectorError, CollectorResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const ALLOWED_STATUSES: [u16; 3] = [200, 201, 204];

/// User-Agent string for sources that reject Rust/Python default agents
/// (Meteoclimatic, Realtime).
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

fn shared_client() -> &'static reqwest::blocking::Client {
    static CLIENT: OnceLock<reqwest::blocking::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build shared HTTP client")
    })
}

fn status_allowed(status: reqwest::StatusCode) -> bool {
    ALLOWED_STATUSES.contains(&status.as_u16())
}

/// GET `url`, returning `Ok(None)` (logged at error) for any status
/// outside `{200, 201, 204}`.
pub fn get_text(url: &str, user_agent: Option<&str>) -> CollectorResult<Option<String>> {
    let mut request = shared_client().get(url);
    if let Some(ua) = user_agent {
        request = request.header(reqwest::header::USER_AGENT, ua);
    }
    let response = request.send().map_err(|e| CollectorError::HttpFailure(e.to_string()))?;
    let status = response.status();
    if !status_allowed(status) {
        tracing::error!(url, %status, "no response: unexpected status from source");
        return Ok(None);
    }
    response.text().map(Some).map_err(|e| CollectorError::HttpFailure(e.to_string()))
}

pub fn get_json(url: &str, headers: &[(&str, &str)]) -> CollectorResult<Option<serde_json::Value>> {
    let mut request = shared_client().get(url);
    for (key, value) in headers {
        request = request.header(*key, *value);
    }
    let response = request.send().map_err(|e| CollectorError::HttpFailure(e.to_string()))?;
    let status = response.status();
    if !status_allowed(status) {
        tracing::error!(url, %status, "no response: unexpected status from source");
        return Ok(None);
    }
    let body = response.text().map_err(|e| CollectorError::HttpFailure(e.to_string()))?;
    serde_json::from_str(&body).map(Some).map_err(|e| CollectorError::InvalidJson(e.to_string()))
}

/// POST helper, used by sources that exchange an auth token before
/// reading (not exercised by any adapter this crate ships, but kept as a
/// first-class library function for parity with the base reader's public
/// surface).
pub fn post_form(url: &str, form: &[(&str, &str)]) -> CollectorResult<Option<serde_json::Value>> {
    let response = shared_client().post(url).form(form).send().map_err(|e| CollectorError::HttpFailure(e.to_string()))?;
    let status = response.status();
    if !status_allowed(status) {
        tracing::error!(url, %status, "no response: unexpected status from source");
        return Ok(None);
    }
    let body = response.text().map_err(|e| CollectorError::HttpFailure(e.to_string()))?;
    serde_json::from_str(&body).map(Some).map_err(|e| CollectorError::InvalidJson(e.to_string()))
}
