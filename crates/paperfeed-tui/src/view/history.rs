use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use paperfeed_core::Paper;

use crate::app::App;
use crate::view::truncate;

/// Liked and disliked papers side by side, oldest first.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let snap = &app.snapshot;
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    render_column(
        f,
        columns[0],
        &format!(" Liked ({}) ", snap.liked.len()),
        &snap.liked,
        theme.liked,
        app,
    );
    render_column(
        f,
        columns[1],
        &format!(" Disliked ({}) ", snap.disliked.len()),
        &snap.disliked,
        theme.disliked,
        app,
    );
}

fn render_column(f: &mut Frame, area: Rect, title: &str, papers: &[Paper], accent: Color, app: &App) {
    let theme = &app.theme;
    let width = usize::from(area.width.saturating_sub(4));

    let lines: Vec<Line> = if papers.is_empty() {
        vec![Line::from(Span::styled("Nothing yet", Style::default().fg(theme.dim)))]
    } else {
        papers
            .iter()
            .enumerate()
            .flat_map(|(i, paper)| {
                let mut entry = vec![Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(theme.dim)),
                    Span::styled(
                        truncate(paper.title_or_id(), width.saturating_sub(5)),
                        Style::default().fg(theme.title),
                    ),
                ])];
                let authors = paper.author_line(false);
                if !authors.is_empty() {
                    entry.push(Line::from(Span::styled(
                        format!("     {}", truncate(&authors, width.saturating_sub(5))),
                        Style::default().fg(theme.dim),
                    )));
                }
                entry
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(Span::styled(
                    title.to_string(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                )),
        )
        .scroll((app.history_scroll, 0));
    f.render_widget(paragraph, area);
}
