use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use sesim_usage_core::{round_cost, CostTrend};

use crate::AppState;

pub struct StatisticsWidget;

impl StatisticsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let dashboard = &state.dashboard;
        let value = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let label = Style::default().fg(Color::White);

        let range = match (dashboard.records().first(), dashboard.records().last()) {
            (Some(first), Some(last)) => format!(
                "{} ~ {} ({} days)",
                first.formatted_date(),
                last.formatted_date(),
                dashboard.day_count()
            ),
            _ => "No days in range".to_string(),
        };

        let mut stats_text = vec![
            Line::from(vec![
                Span::styled("Range: ", label),
                Span::styled(
                    range,
                    Style::default()
                        .fg(if dashboard.is_empty() {
                            Color::Red
                        } else {
                            Color::Green
                        })
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Total Cost: ", label),
                Span::styled(format!("$ {:.2}", round_cost(dashboard.total_cost())), value),
            ]),
            Line::from(vec![
                Span::styled("Daily Average: ", label),
                Span::styled(
                    format!(
                        "weekday {} / weekend {}",
                        Self::format_average(dashboard.weekday_average()),
                        Self::format_average(dashboard.weekend_average())
                    ),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Self::comparison_line(state),
        ];

        if let Some(error) = &state.error_message {
            stats_text.push(Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red)),
                Span::styled(
                    error.chars().take(50).collect::<String>()
                        + if error.chars().count() > 50 { "..." } else { "" },
                    Style::default().fg(Color::Red),
                ),
            ]));
        } else {
            stats_text.push(Line::from(vec![
                Span::styled("Last Update: ", label),
                Span::styled(
                    state.last_update.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
        }

        let stats = Paragraph::new(stats_text)
            .block(Block::bordered().title("Statistics"))
            .alignment(Alignment::Left);

        frame.render_widget(stats, area);
    }

    fn format_average(average: Option<f64>) -> String {
        average
            .map(|v| format!("$ {:.2}", round_cost(v)))
            .unwrap_or_else(|| "N/A".to_string())
    }

    fn comparison_line(state: &AppState) -> Line<'static> {
        let label = Span::styled("Month over Month: ", Style::default().fg(Color::White));

        let Some(comparison) = state.dashboard.month_comparison() else {
            return Line::from(vec![label, Span::raw("N/A")]);
        };

        // Rising cost is the bad direction
        let (arrow, color) = match comparison.trend() {
            CostTrend::Increase => ("▲", Color::Red),
            CostTrend::Decrease => ("▼", Color::Green),
            CostTrend::Unchanged => ("-", Color::Gray),
        };

        Line::from(vec![
            label,
            Span::styled(
                format!(
                    "{} {} ({})",
                    arrow,
                    comparison.percent_label(),
                    comparison.difference_label(Some("$"), "")
                ),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    }
}
