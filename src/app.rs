use crossterm::event::Event;
use log::{debug, info};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    event::Action,
    settings::UiSettings,
    ssh::ConnectionEntry,
    tabs::{Tab, listing::ListingTab},
    ui::{keybindings::render_keybindings, theme::Theme},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Browsing,
    /// Carries the display string of the chosen entry.
    Selected(String),
    Quitting,
}

pub struct App {
    pub state: AppState,
    pub listing: ListingTab,
    theme: Theme,
    title: String,
    show_help: bool,
}

impl App {
    pub fn new(entries: Vec<ConnectionEntry>, settings: &UiSettings) -> Self {
        let theme = Theme::new(settings);
        Self {
            state: AppState::Browsing,
            listing: ListingTab::new(entries, theme),
            theme,
            title: settings.title.clone(),
            show_help: settings.show_help,
        }
    }

    /// Returns false once a terminal state has been reached.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.state != AppState::Browsing {
            return false;
        }

        if let Event::Resize(w, h) = event {
            debug!("resized to {}x{}", w, h);
            return true;
        }

        match self.listing.handle_event(event) {
            Action::Quit => {
                info!("quit without selection");
                self.state = AppState::Quitting;
            }
            Action::Confirm => {
                if let Some(entry) = self.listing.selected_entry() {
                    info!("selected {} ({})", entry.alias, entry.ssh_command());
                    self.state = AppState::Selected(entry.display());
                }
            }
            _ => {}
        }

        self.state == AppState::Browsing
    }

    /// The chosen display string, if any.
    pub fn selection(&self) -> Option<&str> {
        match &self.state {
            AppState::Selected(display) => Some(display.as_str()),
            _ => None,
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let [_, title_area, _, main_area, footer_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(if self.show_help { 1 } else { 0 }),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, title_area);
        self.listing.render(frame, main_area, true);
        if self.show_help {
            self.render_footer(frame, footer_area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {} ", self.title), self.theme.title()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        render_keybindings(frame, area, &self.theme, &self.listing.key_hints());
    }
}
