use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use sesim_usage_core::{MonthlyCost, ProjectSummary};

use crate::AppState;

pub struct ReportPopupWidget;

impl ReportPopupWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_rect(60, 70, area);

        // Clear the area first
        frame.render_widget(Clear, popup_area);

        let report_text = Self::create_report_text(state);

        let popup = Paragraph::new(report_text)
            .block(
                Block::bordered()
                    .title("Usage Report")
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(popup, popup_area);
    }

    fn create_report_text(state: &AppState) -> Vec<Line<'static>> {
        let Some(summary) = state.dashboard.summary() else {
            return vec![
                Line::from(vec![Span::styled(
                    "No usage report loaded",
                    Style::default().fg(Color::Red),
                )]),
                Line::from(" "),
                Line::from(vec![Span::styled(
                    "Start with --report <file> to load one",
                    Style::default().fg(Color::Gray),
                )]),
            ];
        };

        let mut report_text = match state.selected_project_summary() {
            Some(project) => Self::project_lines(&project),
            None => {
                let mut lines = vec![Line::from(vec![
                    Span::styled("Projects: ", label_style()),
                    Span::styled(summary.project_count.to_string(), value_style()),
                ])];
                lines.extend(totals_lines(
                    summary.all_request_count,
                    summary.all_hours,
                    summary.all_cost,
                ));
                lines.extend(monthly_cost_lines(&summary.series.monthly_cost));
                lines
            }
        };

        let today = chrono::Local::now().date_naive();
        if let Ok(options) = state.dashboard.month_options(today) {
            report_text.push(Line::from(" "));
            report_text.push(Line::from(vec![
                Span::styled("Selectable Periods: ", label_style()),
                Span::styled(
                    options
                        .iter()
                        .map(|option| option.label.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        report_text.extend(vec![
            Line::from(" "),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("n", key),
                Span::styled(" for next project, ", Style::default().fg(Color::Gray)),
                Span::styled("p", key),
                Span::styled(" to close", Style::default().fg(Color::Gray)),
            ]),
        ]);

        report_text
    }

    fn project_lines(project: &ProjectSummary) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(vec![
            Span::styled("Project: ", label_style()),
            Span::styled(
                format!("{} (#{})", project.project_name, project.project_id),
                value_style(),
            ),
        ])];
        lines.extend(totals_lines(
            project.all_request_count,
            project.all_hours,
            project.all_cost,
        ));
        lines.extend(monthly_cost_lines(&project.series.monthly_cost));

        if !project.models.is_empty() {
            lines.push(Line::from(" "));
            lines.push(section_title("Models:"));
            for model in &project.models {
                lines.push(Line::from(vec![
                    Span::styled("  ", Style::default()),
                    Span::styled(
                        format!(
                            "{}: $ {:.2}, {:.2} h, {} requests",
                            model.model_name, model.cost, model.hours, model.request_count
                        ),
                        Style::default().fg(Color::White),
                    ),
                ]));
            }
        }

        lines
    }
}

fn label_style() -> Style {
    Style::default().fg(Color::White)
}

fn value_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn section_title(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )])
}

fn totals_lines(requests: u64, hours: f64, cost: f64) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Requests: ", label_style()),
            Span::styled(requests.to_string(), value_style()),
        ]),
        Line::from(vec![
            Span::styled("Usage Hours: ", label_style()),
            Span::styled(format!("{:.2} h", hours), value_style()),
        ]),
        Line::from(vec![
            Span::styled("Total Cost: ", label_style()),
            Span::styled(
                format!("$ {:.2}", cost),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ]
}

fn monthly_cost_lines(months: &[MonthlyCost]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(" "), section_title("Monthly Cost:")];
    for month in months {
        lines.push(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(
                format!("{}: $ {:.2}", month.month, month.cost),
                Style::default().fg(Color::White),
            ),
        ]));
    }
    lines
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
