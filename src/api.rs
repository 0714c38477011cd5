use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT as USER_AGENT_HEADER};
use thiserror::Error;
use tracing::error;

use crate::types::{Listing, ListingsPayload};
use crate::{DISCOGS_API_BASE, USER_AGENT};

/// Discogs rate-limit response headers.
const RATELIMIT_REMAINING: &str = "X-Discogs-Ratelimit-Remaining";
const RATELIMIT_TOTAL: &str = "X-Discogs-Ratelimit";

/// A failed marketplace fetch.
///
/// `Transport` and `Status` are recovered by the caller on its normal
/// schedule; `Decode` escapes the poll cycle as an unexpected error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("marketplace request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("marketplace returned HTTP {status}")]
    Status { status: StatusCode },
    #[error("malformed marketplace response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Minimal Discogs API client for marketplace listing searches.
pub struct DiscogsClient {
    http: reqwest::Client,
}

impl DiscogsClient {
    /// Build a client with the fixed User-Agent and token auth headers.
    pub fn new(api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
        let auth = HeaderValue::from_str(&format!("Discogs token={api_key}"))
            .context("Discogs API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http })
    }

    /// Fetch current for-sale vinyl listings of `release_id`, up to one page.
    ///
    /// Non-success statuses are logged here together with the response body
    /// and rate-limit headers before the error is returned.
    pub async fn fetch_listings(&self, release_id: &str) -> Result<Vec<Listing>, FetchError> {
        let url = format!("{DISCOGS_API_BASE}/marketplace/search");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("release_id", release_id),
                ("status", "For Sale"),
                ("format", "Vinyl"),
                ("per_page", "100"),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let rate_remaining = header_str(response.headers(), RATELIMIT_REMAINING);
            let rate_total = header_str(response.headers(), RATELIMIT_TOTAL);
            let body = response.text().await.unwrap_or_default();
            error!("Marketplace request rejected: HTTP {status}, body: {body}");
            if let (Some(remaining), Some(total)) = (rate_remaining, rate_total) {
                error!("Rate limit: {remaining}/{total} requests remaining");
            }
            return Err(FetchError::Status { status });
        }

        let payload: ListingsPayload =
            response.json().await.map_err(FetchError::Decode)?;
        Ok(payload.into_listings())
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
