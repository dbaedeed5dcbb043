use ratatui::style::{Color, Modifier, Style};

use crate::settings::UiSettings;

/// Styles handed to the renderers at construction.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    accent: Color,
}

impl Theme {
    pub fn new(settings: &UiSettings) -> Self {
        Self {
            accent: Color::Indexed(settings.accent),
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(Color::Rgb(255, 253, 245))
            .bg(Color::Indexed(62))
            .add_modifier(Modifier::BOLD)
    }

    pub fn item(&self) -> Style {
        Style::default()
    }

    /// The highlighted row.
    pub fn selected_item(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn filter_prompt(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn pagination_active(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn pagination_inactive(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint_desc(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(&UiSettings::default())
    }
}
