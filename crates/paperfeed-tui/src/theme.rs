use ratatui::style::{Color, Modifier, Style};

use paperfeed_core::Verdict;

/// Color theme for the TUI.
pub struct Theme {
    pub liked: Color,
    pub disliked: Color,
    pub skipped: Color,
    pub error: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub dim: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Light-on-dark default with warm accents.
    pub fn paper() -> Self {
        Self {
            liked: Color::Rgb(80, 200, 120),
            disliked: Color::Rgb(230, 90, 90),
            skipped: Color::Rgb(230, 190, 70),
            error: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::Rgb(230, 190, 70),
            border: Color::DarkGray,
            title: Color::White,
            text: Color::Gray,
            dim: Color::DarkGray,
            active: Color::Rgb(230, 190, 70),
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Blue accents on a dark header.
    pub fn midnight() -> Self {
        Self {
            liked: Color::Rgb(0, 200, 80),
            disliked: Color::Rgb(255, 80, 80),
            skipped: Color::Rgb(255, 200, 0),
            error: Color::Rgb(255, 80, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            title: Color::White,
            text: Color::Rgb(200, 200, 215),
            dim: Color::Rgb(120, 120, 140),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Look a theme up by its config name. Unknown names fall back to `paper`.
    pub fn by_name(name: &str) -> Self {
        match name {
            "midnight" => Self::midnight(),
            _ => Self::paper(),
        }
    }

    pub fn verdict_color(&self, verdict: Verdict) -> Color {
        match verdict {
            Verdict::Liked => self.liked,
            Verdict::Disliked => self.disliked,
            Verdict::Skipped => self.skipped,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
