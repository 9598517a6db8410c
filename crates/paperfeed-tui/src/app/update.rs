use paperfeed_core::Verdict;

use super::App;
use crate::action::Action;
use crate::tui_event::FeedCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Help overlay swallows everything except closing and quitting
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Tick => self.on_tick(),
                Action::Resize(_w, h) => self.on_resize(h),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Like => self.swipe(Verdict::Liked),
            Action::Dislike => self.swipe(Verdict::Disliked),
            Action::Skip => self.swipe(Verdict::Skipped),
            Action::Reset => {
                self.send(FeedCommand::Reset);
                self.flash = None;
                self.status = Some("Resetting session\u{2026}".to_string());
            }
            Action::ToggleHistory => {
                self.show_history = !self.show_history;
                self.history_scroll = 0;
            }
            Action::ToggleAuthors => {
                if self
                    .snapshot
                    .current
                    .as_ref()
                    .is_some_and(|p| p.has_collapsible_authors())
                {
                    self.card.authors_expanded = !self.card.authors_expanded;
                }
            }
            Action::ToggleAbstract => {
                let limit = self.abstract_preview_chars;
                if self
                    .snapshot
                    .current
                    .as_ref()
                    .is_some_and(|p| p.has_long_abstract(limit))
                {
                    self.card.abstract_expanded = !self.card.abstract_expanded;
                    self.card.scroll = 0;
                }
            }
            Action::ShowUrl => {
                if let Some(paper) = &self.snapshot.current {
                    self.status = Some(match paper.display_url() {
                        Some(url) => format!("Link: {url}"),
                        None => "No link available for this paper".to_string(),
                    });
                }
            }
            Action::ToggleHelp => self.show_help = true,
            Action::NavigateBack => {
                if self.show_history {
                    self.show_history = false;
                } else {
                    self.status = None;
                }
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                if self.show_history {
                    self.history_scroll = self.history_scroll.saturating_add(page);
                } else {
                    self.card.scroll = self.card.scroll.saturating_add(page);
                }
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                if self.show_history {
                    self.history_scroll = self.history_scroll.saturating_sub(page);
                } else {
                    self.card.scroll = self.card.scroll.saturating_sub(page);
                }
            }
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => self.on_tick(),
            Action::Resize(_w, h) => self.on_resize(h),
            Action::None => {}
        }
        false
    }

    /// Ask the feed task to act on the current paper. Dropped while the
    /// interaction lock is held, while loading, and when there is nothing to
    /// act on; the controller applies the same lock check on its side.
    fn swipe(&mut self, verdict: Verdict) {
        if self.show_history {
            return;
        }
        if self.is_locked() {
            tracing::trace!(verdict = verdict.label(), "swipe ignored: interaction locked");
            return;
        }
        if self.is_loading() || self.snapshot.current.is_none() {
            return;
        }
        let cmd = match verdict {
            Verdict::Liked => FeedCommand::Feedback { liked: true },
            Verdict::Disliked => FeedCommand::Feedback { liked: false },
            Verdict::Skipped => FeedCommand::Skip,
        };
        self.send(cmd);
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.flash.is_some_and(|f| !f.is_visible()) {
            self.flash = None;
        }
    }

    fn on_resize(&mut self, height: u16) {
        // header + footer + card borders
        self.visible_rows = height.saturating_sub(4);
    }
}
