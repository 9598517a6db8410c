//! Scripted batch source for tests.

use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{BatchSource, SourceFuture};
use crate::FeedError;
use crate::paper::Paper;

/// A configurable mock response for [`MockSource`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return these papers.
    Papers(Vec<Paper>),
    /// Simulate the backend answering `{"error": ...}`.
    Backend(String),
    /// Simulate a non-success HTTP status.
    Status(u16),
    /// Simulate a 429 with an optional `Retry-After` wait.
    RateLimited(Option<Duration>),
}

impl MockResponse {
    /// Papers carrying only the given ids.
    pub fn ids(ids: &[&str]) -> Self {
        Self::Papers(ids.iter().map(|id| Paper::new(*id)).collect())
    }

    fn into_result(self) -> Result<Vec<Paper>, FeedError> {
        match self {
            Self::Papers(papers) => Ok(papers),
            Self::Backend(msg) => Err(FeedError::Backend(msg)),
            Self::Status(code) => Err(FeedError::Status(code)),
            Self::RateLimited(retry_after) => Err(FeedError::RateLimited { retry_after }),
        }
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Responses handed out in order; the last one repeats once exhausted.
struct Script {
    pending: Mutex<Vec<MockResponse>>,
    last: Mutex<MockResponse>,
}

impl Script {
    fn new(mut responses: Vec<MockResponse>) -> Self {
        let last = responses
            .last()
            .cloned()
            .unwrap_or(MockResponse::Papers(Vec::new()));
        // Reversed so pop() yields them front to back.
        responses.reverse();
        Self {
            pending: Mutex::new(responses),
            last: Mutex::new(last),
        }
    }

    fn next(&self) -> MockResponse {
        let mut pending = guard(&self.pending);
        match pending.pop() {
            Some(resp) => {
                *guard(&self.last) = resp.clone();
                resp
            }
            None => guard(&self.last).clone(),
        }
    }
}

/// A hand-rolled [`BatchSource`] for tests.
///
/// Fallback and recommendation calls each follow their own script. Every
/// call is counted, and the id lists passed to `fetch_recommendations` are
/// recorded for later inspection.
pub struct MockSource {
    fallback: Script,
    recommendations: Script,
    fallback_delay: Option<Duration>,
    recommendation_delay: Option<Duration>,
    reset_status: Option<u16>,
    fallback_calls: AtomicUsize,
    recommendation_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    fallback_limits: Mutex<Vec<usize>>,
    recommendation_args: Mutex<Vec<(Vec<String>, Vec<String>)>>,
}

impl MockSource {
    pub fn new(fallback: Vec<MockResponse>, recommendations: Vec<MockResponse>) -> Self {
        Self {
            fallback: Script::new(fallback),
            recommendations: Script::new(recommendations),
            fallback_delay: None,
            recommendation_delay: None,
            reset_status: None,
            fallback_calls: AtomicUsize::new(0),
            recommendation_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
            fallback_limits: Mutex::new(Vec::new()),
            recommendation_args: Mutex::new(Vec::new()),
        }
    }

    /// Fallback batches in order, and no recommendations.
    pub fn fallback_only(fallback: Vec<MockResponse>) -> Self {
        Self::new(fallback, Vec::new())
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = Some(delay);
        self
    }

    pub fn with_recommendation_delay(mut self, delay: Duration) -> Self {
        self.recommendation_delay = Some(delay);
        self
    }

    /// Make `reset_session` fail with the given HTTP status.
    pub fn with_failing_reset(mut self, status: u16) -> Self {
        self.reset_status = Some(status);
        self
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }

    pub fn recommendation_calls(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_limits(&self) -> Vec<usize> {
        guard(&self.fallback_limits).clone()
    }

    /// `(positive, negative)` id lists of every recommendation call so far.
    pub fn recommendation_args(&self) -> Vec<(Vec<String>, Vec<String>)> {
        guard(&self.recommendation_args).clone()
    }
}

impl BatchSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_fallback(&self, limit: usize) -> SourceFuture<'_, Vec<Paper>> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        guard(&self.fallback_limits).push(limit);
        let response = self.fallback.next();
        let delay = self.fallback_delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            response.into_result().map(|mut papers| {
                papers.truncate(limit);
                papers
            })
        })
    }

    fn fetch_recommendations<'a>(
        &'a self,
        positive_ids: &'a [String],
        negative_ids: &'a [String],
    ) -> SourceFuture<'a, Vec<Paper>> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        guard(&self.recommendation_args).push((positive_ids.to_vec(), negative_ids.to_vec()));
        let response = self.recommendations.next();
        let delay = self.recommendation_delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            response.into_result()
        })
    }

    fn reset_session(&self) -> SourceFuture<'_, ()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        let status = self.reset_status;
        Box::pin(async move {
            match status {
                Some(code) => Err(FeedError::Status(code)),
                None => Ok(()),
            }
        })
    }
}
