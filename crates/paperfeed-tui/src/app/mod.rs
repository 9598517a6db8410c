mod backend;
mod update;

use std::sync::Arc;
use std::time::Duration;

use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use paperfeed_core::{FeedSnapshot, InteractionLock};

use crate::model::card::{CardState, SwipeFlash};
use crate::theme::Theme;
use crate::tui_event::FeedCommand;

/// Main application state.
///
/// The app never touches the queues itself: it renders the latest
/// [`FeedSnapshot`] and turns keys into [`FeedCommand`]s for the feed task.
pub struct App {
    /// Latest controller state received from the feed task.
    pub snapshot: FeedSnapshot,
    /// Set once the first snapshot arrives; before that the feed is loading.
    pub received_first: bool,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub show_history: bool,
    pub history_scroll: u16,
    pub card: CardState,
    pub flash: Option<SwipeFlash>,
    /// One-line message shown in the footer (paper link, reset notice).
    pub status: Option<String>,
    pub abstract_preview_chars: usize,
    /// Height of the body area (set on resize, used for paging).
    pub visible_rows: u16,
    /// Shared with the controller; swipes are dropped here while it is held.
    pub lock: Arc<InteractionLock>,
    pub lock_duration: Duration,
    pub feed_cmd_tx: Option<mpsc::UnboundedSender<FeedCommand>>,
}

impl App {
    pub fn new(
        theme: Theme,
        lock: Arc<InteractionLock>,
        lock_duration: Duration,
        abstract_preview_chars: usize,
    ) -> Self {
        Self {
            snapshot: FeedSnapshot::default(),
            received_first: false,
            theme,
            tick: 0,
            should_quit: false,
            show_help: false,
            show_history: false,
            history_scroll: 0,
            card: CardState::default(),
            flash: None,
            status: None,
            abstract_preview_chars,
            visible_rows: 20,
            lock,
            lock_duration,
            feed_cmd_tx: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_active()
    }

    /// Loading until the first snapshot, and while a fallback fetch is out.
    pub fn is_loading(&self) -> bool {
        !self.received_first || self.snapshot.loading
    }

    /// The swipe marker, if it is still showing.
    pub fn visible_flash(&self) -> Option<&SwipeFlash> {
        self.flash.as_ref().filter(|f| f.is_visible())
    }

    fn send(&self, cmd: FeedCommand) {
        match &self.feed_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!(?cmd, "feed task is gone, command dropped");
                }
            }
            None => tracing::debug!(?cmd, "no feed task attached"),
        }
    }

    pub fn view(&self, f: &mut ratatui::Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Min(3),    // card or history
            Constraint::Length(1), // footer
        ])
        .split(f.area());

        crate::view::render_header(f, self, chunks[0]);
        if self.show_history {
            crate::view::history::render_in(f, self, chunks[1]);
        } else {
            crate::view::card::render_in(f, self, chunks[1]);
        }
        crate::view::render_footer(f, self, chunks[2]);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
