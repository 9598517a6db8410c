use std::time::{Duration, Instant};

use paperfeed_core::Verdict;

/// View toggles for the paper card. They belong to one paper and are
/// cleared whenever a different paper becomes current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    pub paper_id: Option<String>,
    pub authors_expanded: bool,
    pub abstract_expanded: bool,
    pub scroll: u16,
}

impl CardState {
    /// Point the card at `paper_id`. Returns `true` (and clears the toggles)
    /// if that is a different paper than before.
    pub fn follow(&mut self, paper_id: Option<&str>) -> bool {
        if self.paper_id.as_deref() == paper_id {
            return false;
        }
        *self = Self {
            paper_id: paper_id.map(str::to_string),
            ..Self::default()
        };
        true
    }
}

/// Swipe marker shown after an accepted action.
#[derive(Debug, Clone, Copy)]
pub struct SwipeFlash {
    pub verdict: Verdict,
    pub until: Instant,
}

impl SwipeFlash {
    pub fn new(verdict: Verdict, duration: Duration) -> Self {
        Self {
            verdict,
            until: Instant::now() + duration,
        }
    }

    pub fn is_visible(&self) -> bool {
        Instant::now() < self.until
    }

    pub fn label(&self) -> &'static str {
        match self.verdict {
            Verdict::Liked => "\u{2665} Liked",
            Verdict::Disliked => "\u{2715} Disliked",
            Verdict::Skipped => "\u{21b7} Skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_resets_toggles_on_new_paper() {
        let mut card = CardState::default();
        assert!(card.follow(Some("a")));
        card.authors_expanded = true;
        card.abstract_expanded = true;

        assert!(!card.follow(Some("a")));
        assert!(card.authors_expanded);

        assert!(card.follow(Some("b")));
        assert!(!card.authors_expanded);
        assert!(!card.abstract_expanded);
        assert_eq!(card.paper_id.as_deref(), Some("b"));

        assert!(card.follow(None));
        assert!(card.paper_id.is_none());
    }

    #[test]
    fn flash_expires() {
        let flash = SwipeFlash::new(Verdict::Liked, Duration::ZERO);
        assert!(!flash.is_visible());
        let flash = SwipeFlash::new(Verdict::Skipped, Duration::from_secs(60));
        assert!(flash.is_visible());
        assert_eq!(flash.label(), "\u{21b7} Skipped");
    }
}
