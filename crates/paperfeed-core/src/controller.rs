//! The feed queue controller.
//!
//! Owns the current paper, the fallback and recommendation queues, the
//! interaction history and the action counter. All mutation happens on the
//! task that owns the controller: recommendation fetches run detached, but
//! their results come back through a channel and are merged here, never from
//! the fetching task itself.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::lock::InteractionLock;
use crate::paper::Paper;
use crate::queue::{QueueState, Verdict};
use crate::source::BatchSource;
use crate::{FeedError, FeedSettings};

/// Result of a background recommendation fetch, tagged with the reset
/// generation it was dispatched in.
#[derive(Debug)]
pub struct RecommendationArrival {
    pub generation: u64,
    pub result: Result<Vec<Paper>, FeedError>,
}

/// What happened to a feedback or skip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted,
    /// The interaction lock was held.
    Locked,
    /// Nothing to act on (loading, failed, or exhausted feed).
    NoCurrent,
}

/// Read-only view of the controller, cheap enough to ship to a renderer.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub current: Option<Paper>,
    pub fallback_len: usize,
    pub recommendation_len: usize,
    pub liked: Vec<Paper>,
    pub disliked: Vec<Paper>,
    pub skipped_ids: Vec<String>,
    pub action_count: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub locked_until: Option<Instant>,
    pub recommendation_requests: u64,
    pub generation: u64,
}

impl FeedSnapshot {
    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|t| Instant::now() < t)
    }

    /// Initialized, not loading, no error, and nothing left to show.
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none() && !self.loading && self.error.is_none()
    }
}

type Observer = Arc<dyn Fn(FeedSnapshot) + Send + Sync>;

pub struct FeedController {
    source: Arc<dyn BatchSource>,
    settings: FeedSettings,
    lock: Arc<InteractionLock>,
    state: QueueState,
    loading: bool,
    error: Option<String>,
    generation: u64,
    recommendation_requests: u64,
    arrivals_tx: mpsc::UnboundedSender<RecommendationArrival>,
    arrivals_rx: mpsc::UnboundedReceiver<RecommendationArrival>,
    observer: Option<Observer>,
}

impl FeedController {
    pub fn new(source: Arc<dyn BatchSource>, settings: FeedSettings) -> Self {
        let (arrivals_tx, arrivals_rx) = mpsc::unbounded_channel();
        Self {
            source,
            settings,
            lock: Arc::new(InteractionLock::new()),
            state: QueueState::default(),
            loading: false,
            error: None,
            generation: 0,
            recommendation_requests: 0,
            arrivals_tx,
            arrivals_rx,
            observer: None,
        }
    }

    /// Use a lock shared with the input layer instead of a private one.
    pub fn with_lock(mut self, lock: Arc<InteractionLock>) -> Self {
        self.lock = lock;
        self
    }

    /// Called with a fresh snapshot after every state change, including the
    /// moment a blocking fallback fetch starts.
    pub fn with_observer(mut self, observer: impl Fn(FeedSnapshot) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn state(&self) -> &QueueState {
        &self.state
    }

    pub fn current(&self) -> Option<&Paper> {
        self.state.current()
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn lock(&self) -> Arc<InteractionLock> {
        Arc::clone(&self.lock)
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_active()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of recommendation fetches dispatched since the last reset.
    pub fn recommendation_requests(&self) -> u64 {
        self.recommendation_requests
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            current: self.state.current().cloned(),
            fallback_len: self.state.fallback_queue().len(),
            recommendation_len: self.state.recommendation_queue().len(),
            liked: self.state.liked_papers().to_vec(),
            disliked: self.state.disliked_papers().to_vec(),
            skipped_ids: self.state.skipped_ids().to_vec(),
            action_count: self.state.action_count(),
            loading: self.loading,
            error: self.error.clone(),
            locked_until: self.lock.expires_at(),
            recommendation_requests: self.recommendation_requests,
            generation: self.generation,
        }
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer(self.snapshot());
        }
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Load the first fallback batch. On failure the error is kept in
    /// [`error()`](Self::error) and nothing is retried.
    pub async fn initialize(&mut self) {
        self.refill_fallback().await;
    }

    /// Like or dislike the current paper and move on.
    pub async fn submit_feedback(&mut self, liked: bool) -> ActionOutcome {
        self.act(Verdict::from_feedback(liked)).await
    }

    /// Pass on the current paper without expressing a preference.
    pub async fn skip(&mut self) -> ActionOutcome {
        self.act(Verdict::Skipped).await
    }

    /// Clear the backend session and every piece of local state, then load a
    /// fresh fallback batch. Recommendation fetches still in flight are
    /// discarded when they land.
    pub async fn reset(&mut self) {
        if let Err(e) = self.source.reset_session().await {
            tracing::warn!(source = self.source.name(), error = %e, "session reset failed, clearing local state anyway");
        }
        self.generation += 1;
        self.state = QueueState::default();
        self.error = None;
        self.recommendation_requests = 0;
        self.lock.release();
        tracing::info!(generation = self.generation, "feed reset");
        self.refill_fallback().await;
    }

    async fn act(&mut self, verdict: Verdict) -> ActionOutcome {
        self.drain_arrivals();

        if self.state.current().is_none() {
            return ActionOutcome::NoCurrent;
        }
        if !self.lock.try_acquire(self.settings.lock_duration) {
            tracing::trace!(verdict = verdict.label(), "action ignored: interaction locked");
            return ActionOutcome::Locked;
        }
        let Some(paper) = self.state.fallback_queue.front().cloned() else {
            return ActionOutcome::NoCurrent;
        };

        tracing::debug!(paper_id = %paper.paper_id, verdict = verdict.label(), "recorded");
        self.state.record(paper, verdict);
        self.advance().await;
        ActionOutcome::Accepted
    }

    async fn advance(&mut self) {
        self.state.action_count += 1;
        let every = self.settings.recommend_every;
        if every > 0 && self.state.action_count % every == 0 {
            self.dispatch_recommendations();
        }

        if self.state.fallback_queue.len() > 1 {
            self.state.fallback_queue.pop_front();
            self.notify();
            return;
        }

        if !self.state.recommendation_queue.is_empty() && self.promote() {
            self.notify();
            return;
        }

        self.refill_fallback().await;
    }

    /// Replace the fallback queue with the recommendation queue. Returns
    /// `false` if nothing promotable was left.
    fn promote(&mut self) -> bool {
        let mut promoted = std::mem::take(&mut self.state.recommendation_queue);
        if self.settings.refilter_on_promotion {
            let before = promoted.len();
            promoted.retain(|p| !self.state.has_seen(&p.paper_id));
            if promoted.len() < before {
                tracing::debug!(dropped = before - promoted.len(), "dropped papers seen since arrival");
            }
        }
        if promoted.is_empty() {
            return false;
        }
        tracing::info!(count = promoted.len(), "promoted recommendations");
        self.state.fallback_queue = promoted;
        true
    }

    /// Fetch a fallback batch and wait for it. Replaces the fallback queue.
    async fn refill_fallback(&mut self) {
        self.loading = true;
        self.state.fallback_queue.clear();
        self.notify();

        let limit = self.settings.fallback_limit;
        let result = self.source.fetch_fallback(limit).await;
        self.loading = false;

        match result {
            Ok(batch) => {
                let fetched = batch.len();
                self.state.fallback_queue = self.state.filter_unseen(batch);
                self.error = None;
                tracing::debug!(
                    fetched,
                    kept = self.state.fallback_queue.len(),
                    "fallback batch loaded"
                );
                if self.state.fallback_queue.is_empty() {
                    tracing::info!("fallback batch had no unseen papers");
                }
            }
            Err(e) => {
                tracing::error!(source = self.source.name(), error = %e, "fallback fetch failed");
                self.error = Some(e.to_string());
            }
        }
        self.notify();
    }

    fn dispatch_recommendations(&mut self) {
        self.recommendation_requests += 1;
        let source = Arc::clone(&self.source);
        let positive = self.state.liked_ids().to_vec();
        let negative = self.state.disliked_ids().to_vec();
        let generation = self.generation;
        let tx = self.arrivals_tx.clone();

        tracing::debug!(
            generation,
            positive = positive.len(),
            negative = negative.len(),
            "dispatching recommendation fetch"
        );
        tokio::spawn(async move {
            let result = source.fetch_recommendations(&positive, &negative).await;
            // The receiver lives as long as the controller.
            let _ = tx.send(RecommendationArrival { generation, result });
        });
    }

    // ── Recommendation arrivals ────────────────────────────────────────

    /// Merge a finished recommendation fetch. Returns `true` if the
    /// recommendation queue changed.
    pub fn apply_arrival(&mut self, arrival: RecommendationArrival) -> bool {
        if arrival.generation != self.generation {
            tracing::debug!(
                stale = arrival.generation,
                current = self.generation,
                "discarding recommendations from before reset"
            );
            return false;
        }
        match arrival.result {
            Ok(batch) => {
                let fetched = batch.len();
                self.state.recommendation_queue = self.state.filter_unseen(batch);
                tracing::debug!(
                    fetched,
                    kept = self.state.recommendation_queue.len(),
                    "recommendation batch ready"
                );
                self.notify();
                true
            }
            Err(e) => {
                tracing::warn!(source = self.source.name(), error = %e, "recommendation fetch failed");
                false
            }
        }
    }

    /// Merge every recommendation fetch that has already finished.
    pub fn drain_arrivals(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(arrival) = self.arrivals_rx.try_recv() {
            if self.apply_arrival(arrival) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next recommendation fetch to finish, without merging it.
    /// Meant for `select!` loops; pass the result to
    /// [`apply_arrival`](Self::apply_arrival).
    pub async fn next_arrival(&mut self) -> Option<RecommendationArrival> {
        self.arrivals_rx.recv().await
    }

    /// Wait for the next recommendation fetch to finish and merge it.
    pub async fn settle_next(&mut self) -> bool {
        match self.arrivals_rx.recv().await {
            Some(arrival) => self.apply_arrival(arrival),
            None => false,
        }
    }
}
