use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Console color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Shell output and the pending command line
    pub fn text(self) -> Style {
        match self {
            Theme::Dark => Style::default()
                .fg(Color::Rgb(220, 220, 220))
                .bg(Color::Rgb(30, 30, 30)),
            Theme::Light => Style::default()
                .fg(Color::Rgb(30, 30, 30))
                .bg(Color::Rgb(250, 250, 250)),
        }
    }

    /// `[INFO]` lines written by the console itself
    pub fn info(self) -> Style {
        match self {
            Theme::Dark => self.text().fg(Color::Rgb(120, 170, 255)),
            Theme::Light => self.text().fg(Color::Rgb(20, 80, 200)),
        }
    }

    /// `[ERROR]` lines written by the console itself
    pub fn error(self) -> Style {
        match self {
            Theme::Dark => self.text().fg(Color::Rgb(255, 110, 110)),
            Theme::Light => self.text().fg(Color::Rgb(190, 20, 20)),
        }
    }

    pub fn status_bar(self) -> Style {
        match self {
            Theme::Dark => Style::default().fg(Color::Black).bg(Color::Rgb(150, 150, 150)),
            Theme::Light => Style::default().fg(Color::White).bg(Color::Rgb(70, 70, 70)),
        }
        .add_modifier(Modifier::BOLD)
    }
}
