use super::*;
use crate::action::Action;
use crate::tui_event::FeedEvent;

use paperfeed_core::{Paper, Verdict};
use tokio::sync::mpsc::error::TryRecvError;

const LOCK: Duration = Duration::from_millis(600);

/// Create an App wired to a command channel, with no feed task behind it.
fn test_app() -> (App, mpsc::UnboundedReceiver<FeedCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(Theme::paper(), Arc::new(InteractionLock::new()), LOCK, 40);
    app.feed_cmd_tx = Some(tx);
    (app, rx)
}

fn snapshot_with(current: Option<Paper>) -> FeedSnapshot {
    FeedSnapshot {
        current,
        fallback_len: 3,
        ..Default::default()
    }
}

/// Deliver a snapshot showing `paper` as current.
fn show(app: &mut App, paper: Paper) {
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snapshot_with(Some(paper)))));
}

fn long_abstract_paper(id: &str) -> Paper {
    let mut paper = Paper::new(id).with_title("A long one");
    paper.abstract_text = Some("word ".repeat(40));
    paper
}

// ── Swipes ──────────────────────────────────────────────────────

/// Deliver the snapshot the controller would send after liking `liked`
/// papers and disliking `disliked`, with `current` up next.
fn show_after(app: &mut App, current: Paper, liked: usize, disliked: usize) {
    let mut snap = snapshot_with(Some(current));
    snap.liked = (0..liked).map(|i| Paper::new(format!("l{i}"))).collect();
    snap.disliked = (0..disliked).map(|i| Paper::new(format!("d{i}"))).collect();
    snap.action_count = (liked + disliked) as u64;
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snap)));
}

#[test]
fn like_sends_feedback_and_flashes_once_counted() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));

    app.update(Action::Like);
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Feedback { liked: true }));
    assert!(app.visible_flash().is_none());

    show_after(&mut app, Paper::new("b"), 1, 0);
    assert_eq!(app.visible_flash().map(|f| f.verdict), Some(Verdict::Liked));
}

#[test]
fn rejected_second_swipe_does_not_flash() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));

    app.update(Action::Like);
    app.update(Action::Dislike);
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Feedback { liked: true }));
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Feedback { liked: false }));

    // Only the like was accepted; the dislike hit the lock.
    show_after(&mut app, Paper::new("b"), 1, 0);
    assert_eq!(app.flash.as_ref().map(|f| f.verdict), Some(Verdict::Liked));
    app.flash = None;

    // A recommendation arrival does not move the counter.
    let mut snap = app.snapshot.clone();
    snap.recommendation_len = 4;
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snap)));
    assert!(app.flash.is_none());
}

#[test]
fn dislike_and_skip_map_to_commands() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));

    app.update(Action::Dislike);
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Feedback { liked: false }));

    app.lock.release();
    app.update(Action::Skip);
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Skip));
}

#[test]
fn swipe_while_locked_is_dropped() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));
    assert!(app.lock.try_acquire(Duration::from_secs(60)));

    app.update(Action::Like);
    app.update(Action::Skip);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    assert!(app.flash.is_none());
}

#[test]
fn swipe_before_first_snapshot_is_dropped() {
    let (mut app, mut rx) = test_app();
    app.update(Action::Like);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn swipe_while_loading_is_dropped() {
    let (mut app, mut rx) = test_app();
    let mut snap = snapshot_with(Some(Paper::new("a")));
    snap.loading = true;
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snap)));

    app.update(Action::Like);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn swipe_on_exhausted_feed_is_dropped() {
    let (mut app, mut rx) = test_app();
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snapshot_with(None))));
    app.update(Action::Skip);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn swipe_is_ignored_while_history_is_open() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));
    app.update(Action::ToggleHistory);
    app.update(Action::Like);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn tick_clears_expired_flash() {
    let (mut app, _rx) = test_app();
    app.flash = Some(SwipeFlash::new(Verdict::Skipped, Duration::ZERO));
    app.update(Action::Tick);
    assert!(app.flash.is_none());
    assert_eq!(app.tick, 1);
}

// ── Card toggles ───────────────────────────────────────────────

#[test]
fn authors_toggle_only_when_collapsible() {
    let (mut app, _rx) = test_app();
    show(&mut app, Paper::new("a").with_authors(["A", "B"]));
    app.update(Action::ToggleAuthors);
    assert!(!app.card.authors_expanded);

    show(&mut app, Paper::new("b").with_authors(["A", "B", "C", "D", "E"]));
    app.update(Action::ToggleAuthors);
    assert!(app.card.authors_expanded);
    app.update(Action::ToggleAuthors);
    assert!(!app.card.authors_expanded);
}

#[test]
fn abstract_toggle_only_when_long() {
    let (mut app, _rx) = test_app();
    show(&mut app, Paper::new("short"));
    app.update(Action::ToggleAbstract);
    assert!(!app.card.abstract_expanded);

    show(&mut app, long_abstract_paper("long"));
    app.update(Action::ToggleAbstract);
    assert!(app.card.abstract_expanded);
}

#[test]
fn new_current_paper_collapses_card() {
    let (mut app, _rx) = test_app();
    show(&mut app, long_abstract_paper("a"));
    app.update(Action::ToggleAbstract);
    app.update(Action::ShowUrl);
    assert!(app.card.abstract_expanded);
    assert!(app.status.is_some());

    show(&mut app, long_abstract_paper("b"));
    assert!(!app.card.abstract_expanded);
    assert!(app.status.is_none());
}

#[test]
fn show_url_prefers_link_then_doi() {
    let (mut app, _rx) = test_app();
    let mut paper = Paper::new("a");
    paper.url = Some("https://example.org/a".into());
    show(&mut app, paper);
    app.update(Action::ShowUrl);
    assert_eq!(app.status.as_deref(), Some("Link: https://example.org/a"));

    show(&mut app, Paper::new("b"));
    app.update(Action::ShowUrl);
    assert_eq!(app.status.as_deref(), Some("No link available for this paper"));
}

// ── Reset / overlays / quit ────────────────────────────────────

#[test]
fn reset_sends_command_and_clears_notice_on_new_generation() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));

    app.update(Action::Reset);
    assert_eq!(rx.try_recv(), Ok(FeedCommand::Reset));
    assert!(app.status.is_some());

    let mut snap = snapshot_with(None);
    snap.loading = true;
    snap.generation = 1;
    app.handle_feed_event(FeedEvent::Snapshot(Box::new(snap)));
    assert!(app.status.is_none());
    assert!(app.is_loading());
}

#[test]
fn help_overlay_swallows_actions() {
    let (mut app, mut rx) = test_app();
    show(&mut app, Paper::new("a"));
    app.update(Action::ToggleHelp);
    assert!(app.show_help);

    app.update(Action::Like);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}

#[test]
fn escape_closes_history() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleHistory);
    assert!(app.show_history);
    app.update(Action::PageDown);
    assert!(app.history_scroll > 0);
    app.update(Action::NavigateBack);
    assert!(!app.show_history);
}

#[test]
fn quit_sets_flag() {
    let (mut app, _rx) = test_app();
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn quit_works_from_help() {
    let (mut app, _rx) = test_app();
    app.update(Action::ToggleHelp);
    assert!(app.update(Action::Quit));
}
