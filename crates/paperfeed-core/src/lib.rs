use std::time::Duration;
use thiserror::Error;

pub mod config_file;
pub mod controller;
pub mod lock;
pub mod paper;
pub mod queue;
pub mod source;

// Re-export for convenience
pub use controller::{ActionOutcome, FeedController, FeedSnapshot, RecommendationArrival};
pub use lock::InteractionLock;
pub use paper::Paper;
pub use queue::{QueueState, Verdict};
pub use source::{BatchSource, HttpBatchSource};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("{}", rate_limit_message(.retry_after))]
    RateLimited { retry_after: Option<Duration> },
    /// The backend answered with an `{"error": ...}` payload.
    #[error("{0}")]
    Backend(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn rate_limit_message(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(
            "Rate limit exceeded. Try again in {}s.",
            wait.as_secs().max(1)
        ),
        None => "Rate limit exceeded. Please wait and try again shortly.".to_string(),
    }
}

/// Default number of papers requested per fallback batch.
pub const DEFAULT_FALLBACK_LIMIT: usize = 5;
/// Default action cadence for recommendation fetches.
pub const DEFAULT_RECOMMEND_EVERY: u64 = 5;
/// Default interaction lock hold time.
pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_millis(600);

/// Tuning for the feed controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// `limit` sent with every fallback request.
    pub fallback_limit: usize,
    /// A recommendation fetch is dispatched whenever the action count hits a
    /// multiple of this. Zero disables recommendations.
    pub recommend_every: u64,
    /// How long the interaction lock is held after an accepted action.
    pub lock_duration: Duration,
    /// Re-check recommendations against the seen-set when they are promoted,
    /// not only when they arrive.
    pub refilter_on_promotion: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            recommend_every: DEFAULT_RECOMMEND_EVERY,
            lock_duration: DEFAULT_LOCK_DURATION,
            refilter_on_promotion: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = FeedSettings::default();
        assert_eq!(s.fallback_limit, 5);
        assert_eq!(s.recommend_every, 5);
        assert_eq!(s.lock_duration, Duration::from_millis(600));
        assert!(s.refilter_on_promotion);
    }

    #[test]
    fn backend_error_displays_verbatim() {
        let e = FeedError::Backend("No papers found.".into());
        assert_eq!(e.to_string(), "No papers found.");
    }

    #[test]
    fn rate_limit_message_carries_wait() {
        let e = FeedError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(e.to_string(), "Rate limit exceeded. Try again in 30s.");
        let e = FeedError::RateLimited { retry_after: None };
        assert_eq!(
            e.to_string(),
            "Rate limit exceeded. Please wait and try again shortly."
        );
    }
}
