//! Batch sources: where the feed gets its papers from.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::FeedError;
use crate::paper::Paper;

pub use http::HttpBatchSource;

/// Boxed future returned by [`BatchSource`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FeedError>> + Send + 'a>>;

/// The backend the feed controller pulls papers from.
///
/// Implementations must be safe to call repeatedly; the controller never
/// deduplicates in-flight calls and never cancels them.
pub trait BatchSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Fetch a non-personalized batch of at most `limit` papers.
    fn fetch_fallback(&self, limit: usize) -> SourceFuture<'_, Vec<Paper>>;

    /// Fetch a personalized batch seeded by the liked and disliked ids.
    fn fetch_recommendations<'a>(
        &'a self,
        positive_ids: &'a [String],
        negative_ids: &'a [String],
    ) -> SourceFuture<'a, Vec<Paper>>;

    /// Drop whatever per-session personalization the backend keeps.
    fn reset_session(&self) -> SourceFuture<'_, ()>;
}

/// Decode a batch response body.
///
/// The body must be a JSON array of papers. An object carrying an `error`
/// field is the backend reporting a failure; anything else is malformed.
/// Array entries that aren't usable papers (no `paperId`) are dropped.
pub fn decode_batch(value: serde_json::Value) -> Result<Vec<Paper>, FeedError> {
    match value {
        serde_json::Value::Array(items) => {
            let total = items.len();
            let papers: Vec<Paper> = items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<Paper>(item) {
                    Ok(paper) if !paper.paper_id.is_empty() => Some(paper),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!(error = %e, "dropping undecodable paper");
                        None
                    }
                })
                .collect();
            if papers.len() < total {
                tracing::debug!(kept = papers.len(), total, "dropped unusable entries from batch");
            }
            Ok(papers)
        }
        serde_json::Value::Object(map) if map.contains_key("error") => {
            let message = match &map["error"] {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Err(FeedError::Backend(message))
        }
        other => Err(FeedError::Malformed(format!(
            "expected a list of papers, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_papers_decodes() {
        let batch = decode_batch(json!([
            {"paperId": "a", "title": "A"},
            {"paperId": "b"}
        ]))
        .unwrap();
        let ids: Vec<_> = batch.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn entries_without_id_are_dropped() {
        let batch = decode_batch(json!([
            {"title": "no id"},
            {"paperId": ""},
            {"paperId": "ok"}
        ]))
        .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].paper_id, "ok");
    }

    #[test]
    fn error_object_is_backend_error() {
        let err = decode_batch(json!({"error": "Rate limit exceeded."})).unwrap_err();
        match err {
            FeedError::Backend(msg) => assert_eq!(msg, "Rate limit exceeded."),
            other => panic!("expected Backend, got {other:?}"),
        }
    }

    #[test]
    fn non_list_payload_is_malformed() {
        let err = decode_batch(json!({"paperId": "single"})).unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
        let err = decode_batch(json!("nope")).unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
    }
}
