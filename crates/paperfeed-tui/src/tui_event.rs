use paperfeed_core::FeedSnapshot;

/// Commands sent from the TUI to the feed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    Feedback { liked: bool },
    Skip,
    /// Clear the backend session and all local history.
    Reset,
}

/// Events flowing from the feed task to the TUI.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Controller state after a change.
    Snapshot(Box<FeedSnapshot>),
}
