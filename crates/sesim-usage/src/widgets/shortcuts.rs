use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::AppState;

pub struct ShortcutsWidget;

impl ShortcutsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(Color::Gray);

        let mut spans = vec![
            Span::styled("Press ", text),
            Span::styled("q", key),
            Span::styled(" to quit, ", text),
        ];

        if state.report_path().is_some() {
            spans.extend([
                Span::styled("r", key),
                Span::styled(" to reload, ", text),
                Span::styled("p", key),
                Span::styled(" for report, ", text),
            ]);
        }

        spans.extend([
            Span::styled("a", key),
            Span::styled(" for session, ", text),
            Span::styled("c", key),
            Span::styled(" to clear it", text),
        ]);

        let shortcuts = Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center);

        frame.render_widget(shortcuts, area);
    }
}
