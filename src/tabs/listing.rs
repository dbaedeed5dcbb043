use crossterm::event::Event;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    event::{Action, map_event},
    ssh::ConnectionEntry,
    ui::theme::Theme,
};

use super::Tab;

/// Rows per page until the first render tells us the real height.
const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum ListingMode {
    /// Normal navigation
    Browse,
    /// User is typing a filter string
    Filtering,
}

pub struct ListingTab {
    pub entries: Vec<ConnectionEntry>,
    /// Display strings, one per entry.
    displays: Vec<String>,
    pub mode: ListingMode,
    pub filter: String,
    /// Cursor position within the filtered list.
    selected: usize,
    per_page: usize,
    matcher: SkimMatcherV2,
    theme: Theme,
}

impl ListingTab {
    pub fn new(entries: Vec<ConnectionEntry>, theme: Theme) -> Self {
        let displays = entries.iter().map(ConnectionEntry::display).collect();
        Self {
            entries,
            displays,
            mode: ListingMode::Browse,
            filter: String::new(),
            selected: 0,
            per_page: DEFAULT_PER_PAGE,
            matcher: SkimMatcherV2::default(),
            theme,
        }
    }

    /// Indices into `entries` that match the filter, best match first.
    pub fn filtered_indices(&self) -> Vec<usize> {
        if self.filter.is_empty() {
            return (0..self.entries.len()).collect();
        }

        let mut scored: Vec<(usize, i64)> = self
            .displays
            .iter()
            .enumerate()
            .filter_map(|(i, d)| self.matcher.fuzzy_match(d, &self.filter).map(|s| (i, s)))
            .collect();
        // Stable: equal scores keep file order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }

    pub fn selected_entry(&self) -> Option<&ConnectionEntry> {
        let indices = self.filtered_indices();
        indices.get(self.selected).and_then(|&i| self.entries.get(i))
    }

    fn move_down(&mut self) {
        let len = self.filtered_indices().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn page_down(&mut self) {
        let len = self.filtered_indices().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + self.per_page).min(len - 1);
    }

    fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.per_page);
    }

    fn go_end(&mut self) {
        self.selected = self.filtered_indices().len().saturating_sub(1);
    }

    fn push_filter(&mut self, ch: char) {
        self.filter.push(ch);
        self.selected = 0;
    }

    fn pop_filter(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    fn clear_filter(&mut self) {
        self.filter.clear();
        self.selected = 0;
        self.mode = ListingMode::Browse;
    }

    fn confirm(&self) -> Action {
        if self.selected_entry().is_some() {
            Action::Confirm
        } else {
            Action::None
        }
    }

    /// Current page and page count for `len` visible items.
    fn pages(&self, len: usize) -> (usize, usize) {
        let per_page = self.per_page.max(1);
        let total = len.div_ceil(per_page).max(1);
        (self.selected / per_page, total)
    }
}

impl Tab for ListingTab {
    fn key_hints(&self) -> Vec<(&str, &str)> {
        match self.mode {
            ListingMode::Browse => vec![
                ("↑/k", "up"),
                ("↓/j", "down"),
                ("/", "filter"),
                ("enter", "copy"),
                ("pgup/pgdn", "page"),
                ("g/G", "top/bottom"),
                ("q", "quit"),
            ],
            ListingMode::Filtering => vec![
                ("↑/↓", "move"),
                ("enter", "copy"),
                ("tab", "apply filter"),
                ("esc", "clear filter"),
            ],
        }
    }

    fn handle_event(&mut self, event: &Event) -> Action {
        let action = map_event(event);

        match (self.mode.clone(), action) {
            (_, Action::Quit) => Action::Quit,
            (_, Action::Confirm) => self.confirm(),
            (_, Action::Down) => {
                self.move_down();
                Action::None
            }
            (_, Action::Up) => {
                self.move_up();
                Action::None
            }
            (_, Action::PageDown) => {
                self.page_down();
                Action::None
            }
            (_, Action::PageUp) => {
                self.page_up();
                Action::None
            }
            (_, Action::Home) => {
                self.selected = 0;
                Action::None
            }
            (_, Action::End) => {
                self.go_end();
                Action::None
            }

            (ListingMode::Browse, Action::Input(ch)) => match ch {
                'j' => {
                    self.move_down();
                    Action::None
                }
                'k' => {
                    self.move_up();
                    Action::None
                }
                'l' => {
                    self.page_down();
                    Action::None
                }
                'h' => {
                    self.page_up();
                    Action::None
                }
                'g' => {
                    self.selected = 0;
                    Action::None
                }
                'G' => {
                    self.go_end();
                    Action::None
                }
                '/' => {
                    self.clear_filter();
                    self.mode = ListingMode::Filtering;
                    Action::None
                }
                'q' => Action::Quit,
                _ => Action::None,
            },
            (ListingMode::Browse, Action::Escape) => {
                if self.filter.is_empty() {
                    Action::Quit
                } else {
                    self.clear_filter();
                    Action::None
                }
            }

            (ListingMode::Filtering, Action::Input(ch)) => {
                self.push_filter(ch);
                Action::None
            }
            (ListingMode::Filtering, Action::Backspace) => {
                self.pop_filter();
                Action::None
            }
            (ListingMode::Filtering, Action::Escape) => {
                self.clear_filter();
                Action::None
            }
            (ListingMode::Filtering, Action::Accept) => {
                self.mode = ListingMode::Browse;
                Action::None
            }

            _ => Action::None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let [filter_area, list_area, pagination_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        self.per_page = (list_area.height as usize).max(1);

        let indices = self.filtered_indices();
        self.selected = self.selected.min(indices.len().saturating_sub(1));

        self.render_filter(frame, filter_area);
        self.render_list(frame, list_area, &indices);
        self.render_pagination(frame, pagination_area, indices.len());
    }
}

impl ListingTab {
    fn render_filter(&self, frame: &mut Frame, area: Rect) {
        let line = match self.mode {
            ListingMode::Filtering => Line::from(vec![
                Span::raw("    "),
                Span::styled("Filter: ", self.theme.filter_prompt()),
                Span::styled(format!("{}_", self.filter), self.theme.item()),
            ]),
            ListingMode::Browse if !self.filter.is_empty() => Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("“{}”", self.filter), self.theme.dimmed()),
            ]),
            ListingMode::Browse => Line::default(),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, indices: &[usize]) {
        if indices.is_empty() {
            let para = Paragraph::new(Line::styled("    No items.", self.theme.dimmed()));
            frame.render_widget(para, area);
            return;
        }

        let per_page = self.per_page.max(1);
        let start = (self.selected / per_page) * per_page;
        let end = (start + per_page).min(indices.len());

        let items: Vec<ListItem> = (start..end)
            .map(|pos| {
                let text = format!("{}. {}", pos + 1, self.displays[indices[pos]]);
                let line = if pos == self.selected {
                    Line::styled(format!("  > {}", text), self.theme.selected_item())
                } else {
                    Line::styled(format!("    {}", text), self.theme.item())
                };
                ListItem::new(line)
            })
            .collect();

        frame.render_widget(List::new(items), area);
    }

    fn render_pagination(&self, frame: &mut Frame, area: Rect, len: usize) {
        let (page, total) = self.pages(len);
        if total <= 1 {
            return;
        }

        let mut spans = vec![Span::raw("    ")];
        for p in 0..total {
            let style = if p == page {
                self.theme.pagination_active()
            } else {
                self.theme.pagination_inactive()
            };
            spans.push(Span::styled("•", style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn entry(alias: &str, hostname: Option<&str>) -> ConnectionEntry {
        ConnectionEntry {
            alias: alias.to_string(),
            user: None,
            hostname: hostname.map(str::to_string),
        }
    }

    fn tab(aliases: &[&str]) -> ListingTab {
        let entries = aliases.iter().map(|a| entry(a, None)).collect();
        ListingTab::new(entries, Theme::default())
    }

    fn press(tab: &mut ListingTab, code: KeyCode) -> Action {
        tab.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_str(tab: &mut ListingTab, s: &str) {
        for ch in s.chars() {
            press(tab, KeyCode::Char(ch));
        }
    }

    fn render_rows(tab: &mut ListingTab, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                tab.render(f, area, true);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut t = tab(&["a", "b", "c"]);
        press(&mut t, KeyCode::Up);
        assert_eq!(t.selected, 0);
        press(&mut t, KeyCode::Char('j'));
        press(&mut t, KeyCode::Down);
        press(&mut t, KeyCode::Down);
        assert_eq!(t.selected, 2);
        assert_eq!(t.selected_entry().unwrap().alias, "c");
        press(&mut t, KeyCode::Char('g'));
        assert_eq!(t.selected, 0);
        press(&mut t, KeyCode::Char('G'));
        assert_eq!(t.selected, 2);
    }

    #[test]
    fn test_enter_confirms_highlighted_entry() {
        let mut t = tab(&["foo", "bar"]);
        press(&mut t, KeyCode::Down);
        assert_eq!(press(&mut t, KeyCode::Enter), Action::Confirm);
        assert_eq!(t.selected_entry().unwrap().alias, "bar");
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut t = tab(&[]);
        assert_eq!(press(&mut t, KeyCode::Enter), Action::None);
        assert!(t.selected_entry().is_none());
        press(&mut t, KeyCode::Down);
        press(&mut t, KeyCode::End);
        assert_eq!(t.selected, 0);
    }

    #[test]
    fn test_quit_keys_in_browse_mode() {
        let mut t = tab(&["a"]);
        assert_eq!(press(&mut t, KeyCode::Char('q')), Action::Quit);
        assert_eq!(press(&mut t, KeyCode::Esc), Action::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(t.handle_event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn test_filter_narrows_and_letters_are_not_commands() {
        let mut t = tab(&["alpha", "jump-box", "beta"]);
        press(&mut t, KeyCode::Char('/'));
        assert_eq!(t.mode, ListingMode::Filtering);

        // 'j' and 'q' go into the filter while filtering
        type_str(&mut t, "jq");
        assert_eq!(t.filter, "jq");
        assert!(t.filtered_indices().is_empty());

        press(&mut t, KeyCode::Backspace);
        assert_eq!(t.filtered_indices(), vec![1]);
        assert_eq!(press(&mut t, KeyCode::Enter), Action::Confirm);
        assert_eq!(t.selected_entry().unwrap().alias, "jump-box");
    }

    #[test]
    fn test_ctrl_c_quits_while_filtering() {
        let mut t = tab(&["a"]);
        press(&mut t, KeyCode::Char('/'));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(t.handle_event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn test_escape_clears_filter() {
        let mut t = tab(&["alpha", "beta"]);
        press(&mut t, KeyCode::Char('/'));
        type_str(&mut t, "bet");
        assert_eq!(t.filtered_indices(), vec![1]);
        assert_eq!(press(&mut t, KeyCode::Esc), Action::None);
        assert_eq!(t.mode, ListingMode::Browse);
        assert!(t.filter.is_empty());
        assert_eq!(t.filtered_indices(), vec![0, 1]);
    }

    #[test]
    fn test_tab_applies_filter_and_restores_navigation_keys() {
        let mut t = tab(&["alpha", "jump-a", "jump-b"]);
        press(&mut t, KeyCode::Char('/'));
        type_str(&mut t, "jump");
        press(&mut t, KeyCode::Tab);
        assert_eq!(t.mode, ListingMode::Browse);
        assert_eq!(t.filter, "jump");

        press(&mut t, KeyCode::Char('j'));
        assert_eq!(t.selected_entry().unwrap().alias, "jump-b");

        // Esc first drops the applied filter, then quits
        assert_eq!(press(&mut t, KeyCode::Esc), Action::None);
        assert_eq!(t.filtered_indices().len(), 3);
        assert_eq!(press(&mut t, KeyCode::Esc), Action::Quit);
    }

    #[test]
    fn test_browse_hints_cover_paging_and_jumps() {
        let t = tab(&["a"]);
        let keys: Vec<&str> = t.key_hints().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["↑/k", "↓/j", "/", "enter", "pgup/pgdn", "g/G", "q"]);
    }

    #[test]
    fn test_filtering_hints_mention_tab() {
        let mut t = tab(&["a"]);
        press(&mut t, KeyCode::Char('/'));
        assert!(t.key_hints().iter().any(|(k, d)| *k == "tab" && *d == "apply filter"));
    }

    #[test]
    fn test_filter_matches_hostname_in_display() {
        let entries = vec![entry("web", Some("10.1.1.1")), entry("db", Some("db.internal"))];
        let mut t = ListingTab::new(entries, Theme::default());
        press(&mut t, KeyCode::Char('/'));
        type_str(&mut t, "internal");
        assert_eq!(t.filtered_indices(), vec![1]);
    }

    #[test]
    fn test_render_numbers_rows_and_marks_highlight() {
        let entries = vec![entry("foo", Some("1.2.3.4")), entry("bar", None)];
        let mut t = ListingTab::new(entries, Theme::default());
        press(&mut t, KeyCode::Down);

        let rows = render_rows(&mut t, 40, 6);
        assert_eq!(rows[1], "    1. foo: 1.2.3.4");
        assert_eq!(rows[2], "  > 2. bar:");
    }

    #[test]
    fn test_render_renumbers_filtered_rows() {
        let mut t = tab(&["alpha", "beta", "gamma"]);
        press(&mut t, KeyCode::Char('/'));
        type_str(&mut t, "gam");

        let rows = render_rows(&mut t, 40, 6);
        assert_eq!(rows[0], "    Filter: gam_");
        assert_eq!(rows[1], "  > 1. gamma:");
    }

    #[test]
    fn test_render_empty_list() {
        let mut t = tab(&[]);
        let rows = render_rows(&mut t, 30, 4);
        assert_eq!(rows[1], "    No items.");
    }

    #[test]
    fn test_pagination_pages_follow_cursor() {
        let aliases: Vec<String> = (0..7).map(|i| format!("h{}", i)).collect();
        let refs: Vec<&str> = aliases.iter().map(String::as_str).collect();
        let mut t = tab(&refs);

        // 1 filter row + 3 list rows + 1 pagination row
        let rows = render_rows(&mut t, 30, 5);
        assert_eq!(rows[1], "  > 1. h0:");
        assert_eq!(rows[4], "    •••");

        press(&mut t, KeyCode::PageDown);
        assert_eq!(t.selected, 3);
        let rows = render_rows(&mut t, 30, 5);
        assert_eq!(rows[1], "  > 4. h3:");
        assert_eq!(rows[3], "    6. h5:");

        press(&mut t, KeyCode::Char('G'));
        let rows = render_rows(&mut t, 30, 5);
        assert_eq!(rows[1], "  > 7. h6:");
        assert_eq!(rows[2], "");
    }
}
