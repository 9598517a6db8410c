pub mod card;
pub mod help;
pub mod history;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to at most `max_width` chars, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Top bar: app name and running tallies.
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let snap = &app.snapshot;
    let line = Line::from(vec![
        Span::styled(" PAPERFEED ", theme.header_style()),
        Span::raw("  "),
        Span::styled(
            format!("\u{2665} {}", snap.liked.len()),
            Style::default().fg(theme.liked),
        ),
        Span::raw("  "),
        Span::styled(
            format!("\u{2715} {}", snap.disliked.len()),
            Style::default().fg(theme.disliked),
        ),
        Span::raw("  "),
        Span::styled(
            format!("\u{21b7} {}", snap.skipped_ids.len()),
            Style::default().fg(theme.skipped),
        ),
        Span::styled(
            if app.show_history { "   history" } else { "" },
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Bottom bar: feed state on the left, status message or key hints after it.
pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    let state = if app.is_loading() {
        Span::styled(
            format!(" {} loading ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if app.is_locked() {
        Span::styled(" locked ", Style::default().fg(theme.skipped))
    } else {
        Span::styled(" ready ", Style::default().fg(theme.liked))
    };

    let counts = format!(
        "\u{2502} {} actions \u{2502} {} queued \u{2502} {} recommended \u{2502} ",
        snap.action_count, snap.fallback_len, snap.recommendation_len
    );

    let tail = match &app.status {
        Some(msg) => Span::styled(msg.clone(), Style::default().fg(theme.text)),
        None => Span::styled(
            "\u{2190} dislike  \u{2192} like  \u{2191} skip  r reset  ? help",
            theme.footer_style(),
        ),
    };

    let line = Line::from(vec![state, Span::styled(counts, theme.footer_style()), tail]);
    f.render_widget(Paragraph::new(line).style(theme.footer_style()), area);
}
