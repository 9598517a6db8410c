use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use paperfeed_core::Paper;
use paperfeed_core::paper::NO_ABSTRACT;

use crate::app::App;
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

/// Render the current paper, or whatever stands in for it: the error panel,
/// the loading indicator, or the end-of-feed notice.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    if let Some(error) = &snap.error {
        render_error(f, theme, error, area);
        return;
    }

    let Some(paper) = &snap.current else {
        if app.is_loading() {
            render_notice(
                f,
                theme,
                area,
                format!("{} Loading papers\u{2026}", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            );
        } else {
            render_notice(
                f,
                theme,
                area,
                "No more papers right now. Press r to start a new session.".to_string(),
                Style::default().fg(theme.dim),
            );
        }
        return;
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(card_header(paper, theme, area.width));

    if let Some(flash) = app.visible_flash() {
        let color = theme.verdict_color(flash.verdict);
        block = block
            .border_style(Style::default().fg(color))
            .title(
                Line::from(Span::styled(
                    format!(" {} ", flash.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .right_aligned(),
            );
    }

    let paragraph = Paragraph::new(card_lines(app, paper))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.card.scroll, 0));
    f.render_widget(paragraph, area);
}

/// "Journal · Journal Article, Review" across the top border.
fn card_header<'a>(paper: &Paper, theme: &Theme, width: u16) -> Line<'a> {
    let mut parts = Vec::new();
    if let Some(journal) = paper.journal_name() {
        parts.push(journal.to_string());
    }
    let types = paper.publication_type_line();
    if !types.is_empty() {
        parts.push(types);
    }
    if parts.is_empty() {
        return Line::default();
    }
    let text = truncate(&parts.join(" \u{00b7} "), usize::from(width.saturating_sub(6)));
    Line::from(Span::styled(
        format!(" {text} "),
        Style::default().fg(theme.active),
    ))
}

fn card_lines<'a>(app: &App, paper: &Paper) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let limit = app.abstract_preview_chars;
    let hint = Style::default().fg(theme.dim);
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        paper.title_or_id().to_string(),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )));

    let authors = paper.author_line(app.card.authors_expanded);
    if !authors.is_empty() {
        let mut spans = vec![Span::styled(authors, Style::default().fg(theme.text))];
        if paper.has_collapsible_authors() {
            let label = if app.card.authors_expanded { "  [a] fewer" } else { "  [a] all authors" };
            spans.push(Span::styled(label, hint));
        }
        lines.push(Line::from(spans));
    }

    if let Some(date) = paper.formatted_date() {
        lines.push(Line::from(Span::styled(date, hint)));
    }

    lines.push(Line::from(""));

    let body = if app.card.abstract_expanded {
        paper
            .abstract_text
            .clone()
            .unwrap_or_else(|| NO_ABSTRACT.to_string())
    } else {
        paper.abstract_preview(limit)
    };
    lines.push(Line::from(Span::styled(body, Style::default().fg(theme.text))));
    if paper.has_long_abstract(limit) {
        let label = if app.card.abstract_expanded { "[m] show less" } else { "[m] read more" };
        lines.push(Line::from(Span::styled(label, hint)));
    }

    lines.push(Line::from(""));
    match paper.display_url() {
        Some(url) => lines.push(Line::from(vec![
            Span::styled("[o] ", hint),
            Span::styled(url, Style::default().fg(theme.active).add_modifier(Modifier::UNDERLINED)),
        ])),
        None => lines.push(Line::from(Span::styled("No link available", hint))),
    }

    lines
}

fn render_error(f: &mut Frame, theme: &Theme, error: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Could not load papers",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error.to_string(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to reset the session and try again.",
            Style::default().fg(theme.dim),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" Error "),
        );
    f.render_widget(paragraph, area);
}

fn render_notice(f: &mut Frame, theme: &Theme, area: Rect, text: String, style: Style) {
    let lines = vec![Line::from(""), Line::from(Span::styled(text, style))];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use paperfeed_core::{FeedSnapshot, InteractionLock};

    use super::*;
    use crate::tui_event::FeedEvent;

    fn app_with(snapshot: FeedSnapshot) -> App {
        let mut app = App::new(
            Theme::paper(),
            Arc::new(InteractionLock::new()),
            Duration::from_millis(600),
            300,
        );
        app.handle_feed_event(FeedEvent::Snapshot(Box::new(snapshot)));
        app
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.view(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn card_shows_title_and_authors() {
        let paper = Paper::new("p1")
            .with_title("Attention Is All You Need")
            .with_authors(["Vaswani", "Shazeer", "Parmar", "Uszkoreit"]);
        let app = app_with(FeedSnapshot {
            current: Some(paper),
            ..Default::default()
        });
        let screen = rendered(&app);
        assert!(screen.contains("Attention Is All You Need"));
        assert!(screen.contains("Vaswani, Shazeer, [...], Uszkoreit"));
        assert!(screen.contains("No abstract available."));
    }

    #[test]
    fn error_replaces_card() {
        let app = app_with(FeedSnapshot {
            error: Some("backend returned HTTP 500".into()),
            ..Default::default()
        });
        let screen = rendered(&app);
        assert!(screen.contains("Could not load papers"));
        assert!(screen.contains("backend returned HTTP 500"));
    }

    #[test]
    fn exhausted_feed_says_so() {
        let app = app_with(FeedSnapshot::default());
        assert!(rendered(&app).contains("No more papers"));
    }

    #[test]
    fn loading_before_first_snapshot() {
        let app = App::new(
            Theme::midnight(),
            Arc::new(InteractionLock::new()),
            Duration::from_millis(600),
            300,
        );
        assert!(rendered(&app).contains("Loading papers"));
    }
}
