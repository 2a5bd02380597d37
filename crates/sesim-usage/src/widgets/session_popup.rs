use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use sesim_usage_core::{AwsSessionState, SessionStore};

use super::popup::centered_rect;
use crate::AppState;

pub struct SessionPopupWidget;

impl SessionPopupWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_rect(50, 50, area);

        frame.render_widget(Clear, popup_area);

        let session = state.dashboard.session().get();
        let popup = Paragraph::new(Self::create_session_text(&session))
            .block(
                Block::bordered()
                    .title("AWS Session")
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(popup, popup_area);
    }

    fn create_session_text(session: &AwsSessionState) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::White);
        let value = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        if session.is_empty() {
            return vec![
                Line::from(vec![Span::styled(
                    "No AWS session",
                    Style::default().fg(Color::Red),
                )]),
                Line::from(" "),
                Line::from(vec![Span::styled(
                    "Export AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY,",
                    Style::default().fg(Color::Gray),
                )]),
                Line::from(vec![Span::styled(
                    "AWS_SESSION_TOKEN and SESIM_ARN_ID before starting",
                    Style::default().fg(Color::Gray),
                )]),
            ];
        }

        vec![
            Line::from(vec![
                Span::styled("Access Key: ", label),
                Span::styled(mask_key(session.access_key()), value),
            ]),
            Line::from(vec![
                Span::styled("Secret Key: ", label),
                Span::styled(presence(session.secret_key()), value),
            ]),
            Line::from(vec![
                Span::styled("Session Token: ", label),
                Span::styled(presence(session.session_token()), value),
            ]),
            Line::from(vec![
                Span::styled("Role ARN: ", label),
                match session.arn_id() {
                    Some(id) => Span::styled(format!("#{}", id), Style::default().fg(Color::Green)),
                    None => Span::styled("not selected", Style::default().fg(Color::Red)),
                },
            ]),
            Line::from(" "),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "c",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to clear, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "a",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to close", Style::default().fg(Color::Gray)),
            ]),
        ]
    }
}

/// `AKIA****` keeps the key recognisable without showing it.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

fn presence(value: &str) -> String {
    if value.is_empty() {
        "missing".to_string()
    } else {
        "set".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AKIAABCDEFG"), "AKIA****");
        assert_eq!(mask_key("AK"), "AK****");
    }

    #[test]
    fn test_empty_session_text() {
        let lines = SessionPopupWidget::create_session_text(&AwsSessionState::default());
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_populated_session_text_hides_secrets() {
        let session = AwsSessionState::new("AKIAXYZ123", "s3cr3t", "tok", Some(4));
        let lines = SessionPopupWidget::create_session_text(&session);
        let rendered: String = lines.iter().map(|line| line.to_string()).collect();

        assert!(rendered.contains("AKIA****"));
        assert!(rendered.contains("#4"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
