//! Queue and history state owned by the feed controller.

use std::collections::{HashSet, VecDeque};

use crate::paper::Paper;

/// What the user did with a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Liked,
    Disliked,
    Skipped,
}

impl Verdict {
    pub fn from_feedback(liked: bool) -> Self {
        if liked { Self::Liked } else { Self::Disliked }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Disliked => "disliked",
            Self::Skipped => "skipped",
        }
    }
}

/// Queues and interaction history.
///
/// The head of `fallback_queue` is the current paper. `seen` always equals
/// the union of the liked, disliked and skipped id lists; the only way to
/// grow any of them is [`QueueState::record`].
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    pub(crate) fallback_queue: VecDeque<Paper>,
    pub(crate) recommendation_queue: VecDeque<Paper>,
    liked_ids: Vec<String>,
    liked_papers: Vec<Paper>,
    disliked_ids: Vec<String>,
    disliked_papers: Vec<Paper>,
    skipped_ids: Vec<String>,
    seen: HashSet<String>,
    pub(crate) action_count: u64,
}

impl QueueState {
    pub fn current(&self) -> Option<&Paper> {
        self.fallback_queue.front()
    }

    pub fn fallback_queue(&self) -> &VecDeque<Paper> {
        &self.fallback_queue
    }

    pub fn recommendation_queue(&self) -> &VecDeque<Paper> {
        &self.recommendation_queue
    }

    pub fn liked_ids(&self) -> &[String] {
        &self.liked_ids
    }

    pub fn liked_papers(&self) -> &[Paper] {
        &self.liked_papers
    }

    pub fn disliked_ids(&self) -> &[String] {
        &self.disliked_ids
    }

    pub fn disliked_papers(&self) -> &[Paper] {
        &self.disliked_papers
    }

    pub fn skipped_ids(&self) -> &[String] {
        &self.skipped_ids
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn has_seen(&self, paper_id: &str) -> bool {
        self.seen.contains(paper_id)
    }

    pub fn action_count(&self) -> u64 {
        self.action_count
    }

    /// Add `paper` to the history matching `verdict`.
    pub(crate) fn record(&mut self, paper: Paper, verdict: Verdict) {
        self.seen.insert(paper.paper_id.clone());
        match verdict {
            Verdict::Liked => {
                self.liked_ids.push(paper.paper_id.clone());
                self.liked_papers.push(paper);
            }
            Verdict::Disliked => {
                self.disliked_ids.push(paper.paper_id.clone());
                self.disliked_papers.push(paper);
            }
            Verdict::Skipped => self.skipped_ids.push(paper.paper_id),
        }
    }

    /// Keep only papers whose ids are not in the seen-set, in order. Repeats
    /// within the batch keep their first occurrence.
    pub(crate) fn filter_unseen(&self, batch: Vec<Paper>) -> VecDeque<Paper> {
        let mut kept = HashSet::new();
        batch
            .into_iter()
            .filter(|p| !self.seen.contains(&p.paper_id) && kept.insert(p.paper_id.clone()))
            .collect()
    }
}
