use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::Theme;

/// A (key, description) hint pair.
pub type KeyHint<'a> = (&'a str, &'a str);

/// Render a row of key hints into `area`, indented like the list rows.
pub fn render_keybindings(frame: &mut Frame, area: Rect, theme: &Theme, hints: &[KeyHint]) {
    let mut spans: Vec<Span> = vec![Span::raw("    ")];

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", theme.dimmed()));
        }
        spans.push(Span::styled(key.to_string(), theme.key_hint_key()));
        spans.push(Span::styled(format!(" {}", desc), theme.key_hint_desc()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
