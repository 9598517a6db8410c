use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BatchSource, SourceFuture, decode_batch};
use crate::FeedError;
use crate::paper::Paper;

/// Default address of the feed backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// [`BatchSource`] backed by the feed HTTP service:
///
/// - `GET  /feed?limit=N`
/// - `POST /recommendations` with `{positivePaperIds, negativePaperIds}`
/// - `POST /reset-fallback`
pub struct HttpBatchSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationRequest<'a> {
    positive_paper_ids: &'a [String],
    negative_paper_ids: &'a [String],
}

impl HttpBatchSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Per-request timeout. `None` (the default) waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("User-Agent", "paperfeed");
        match self.timeout {
            Some(t) => req.timeout(t),
            None => req,
        }
    }
}

impl Default for HttpBatchSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BatchSource for HttpBatchSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_fallback(&self, limit: usize) -> SourceFuture<'_, Vec<Paper>> {
        Box::pin(async move {
            let req = self
                .client
                .get(self.endpoint("feed"))
                .query(&[("limit", limit)]);
            let resp = self.prepare(req).send().await?;
            read_batch(resp).await
        })
    }

    fn fetch_recommendations<'a>(
        &'a self,
        positive_ids: &'a [String],
        negative_ids: &'a [String],
    ) -> SourceFuture<'a, Vec<Paper>> {
        Box::pin(async move {
            let body = RecommendationRequest {
                positive_paper_ids: positive_ids,
                negative_paper_ids: negative_ids,
            };
            let req = self
                .client
                .post(self.endpoint("recommendations"))
                .json(&body);
            let resp = self.prepare(req).send().await?;
            read_batch(resp).await
        })
    }

    fn reset_session(&self) -> SourceFuture<'_, ()> {
        Box::pin(async move {
            let req = self.client.post(self.endpoint("reset-fallback"));
            let resp = self.prepare(req).send().await?;
            check_status(&resp)
        })
    }
}

async fn read_batch(resp: reqwest::Response) -> Result<Vec<Paper>, FeedError> {
    check_status(&resp)?;
    let bytes = resp.bytes().await?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    decode_batch(value)
}

/// Map a non-success response to an error, extracting `Retry-After` on 429.
pub fn check_status(resp: &reqwest::Response) -> Result<(), FeedError> {
    let status = resp.status();
    if status.as_u16() == 429 {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| retry_delay(v, Utc::now()));
        return Err(FeedError::RateLimited { retry_after });
    }
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }
    Ok(())
}

/// How long a `Retry-After` value asks us to wait. Accepts delta-seconds
/// and HTTP-dates; a date already in the past means no wait.
fn retry_delay(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    Some((at.with_timezone(&Utc) - now).to_std().unwrap_or(Duration::ZERO))
}
