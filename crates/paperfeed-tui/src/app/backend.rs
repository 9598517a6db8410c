use paperfeed_core::{FeedSnapshot, Verdict};

use super::App;
use crate::model::card::SwipeFlash;
use crate::tui_event::FeedEvent;

impl App {
    /// Apply an event from the feed task.
    pub fn handle_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Snapshot(snapshot) => {
                let snapshot = *snapshot;
                if snapshot.generation != self.snapshot.generation {
                    // A reset went through.
                    self.status = None;
                    self.flash = None;
                    self.history_scroll = 0;
                } else if let Some(verdict) = accepted_verdict(&self.snapshot, &snapshot) {
                    self.flash = Some(SwipeFlash::new(verdict, self.lock_duration));
                }
                let current_id = snapshot.current.as_ref().map(|p| p.paper_id.as_str());
                if self.card.follow(current_id) {
                    self.status = None;
                }
                self.snapshot = snapshot;
                self.received_first = true;
            }
        }
    }
}

/// The action the controller accepted between two snapshots, read off
/// whichever history grew.
fn accepted_verdict(before: &FeedSnapshot, after: &FeedSnapshot) -> Option<Verdict> {
    if after.action_count <= before.action_count {
        None
    } else if after.liked.len() > before.liked.len() {
        Some(Verdict::Liked)
    } else if after.disliked.len() > before.disliked.len() {
        Some(Verdict::Disliked)
    } else if after.skipped_ids.len() > before.skipped_ids.len() {
        Some(Verdict::Skipped)
    } else {
        None
    }
}
