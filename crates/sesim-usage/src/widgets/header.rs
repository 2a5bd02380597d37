use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use sesim_usage_core::SessionStore;

use crate::AppState;

pub struct HeaderWidget;

impl HeaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let spinner = if state.is_loading {
            state.get_spinner_char().to_string()
        } else {
            " ".to_string()
        };

        let session = state.dashboard.session().get();
        let (session_label, session_color) = if session.is_ready() {
            (
                format!("AWS session ready (role #{})", session.arn_id().unwrap_or_default()),
                Color::Green,
            )
        } else if !session.is_empty() {
            ("AWS session without role".to_string(), Color::Yellow)
        } else {
            ("No AWS session".to_string(), Color::Red)
        };

        let title = format!("SESIM API Usage - {} data", state.source_label());
        let header_text = vec![Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(session_label, Style::default().fg(session_color)),
            Span::raw(" "),
            Span::styled(spinner, Style::default().fg(Color::Yellow)),
        ])];

        let header = Paragraph::new(header_text)
            .block(Block::bordered().title("Status"))
            .alignment(Alignment::Center);

        frame.render_widget(header, area);
    }
}
