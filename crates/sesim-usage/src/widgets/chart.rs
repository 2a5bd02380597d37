use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, BarChart, Block, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::AppState;

/// Days shown in the daily usage bars.
const RECENT_DAYS: usize = 14;

pub struct UsageChartWidget;

impl UsageChartWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let chart_data = state.dashboard.chart_data();

        if chart_data.is_empty() {
            let empty = Paragraph::new("No usage in the selected range")
                .style(Style::default().fg(Color::Red))
                .block(Block::bordered().title("총 누적 비용"));
            frame.render_widget(empty, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        Self::render_cumulative(frame, chunks[0], state);
        Self::render_recent_days(frame, chunks[1], state);
    }

    fn render_cumulative(frame: &mut Frame, area: Rect, state: &AppState) {
        let chart_data = state.dashboard.chart_data();
        let points: Vec<(f64, f64)> = chart_data
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.total_api()))
            .collect();

        let max_x = (points.len().saturating_sub(1)).max(1) as f64;
        let max_y = state.dashboard.total_cost().max(1.0) * 1.05;

        let first = chart_data.first().map(|p| p.day().to_string()).unwrap_or_default();
        let middle = chart_data[chart_data.len() / 2].day().to_string();
        let last = chart_data.last().map(|p| p.day().to_string()).unwrap_or_default();

        let dataset = Dataset::default()
            .name("총 누적 비용")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(Block::bordered().title("총 누적 비용"))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, max_x])
                    .labels(vec![first, middle, last]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, max_y])
                    .labels(vec![
                        "$0".to_string(),
                        format!("${:.0}", max_y / 2.0),
                        format!("${:.0}", max_y),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn render_recent_days(frame: &mut Frame, area: Rect, state: &AppState) {
        let records = state.dashboard.records();
        let recent = &records[records.len().saturating_sub(RECENT_DAYS)..];

        let labels: Vec<String> = recent
            .iter()
            .map(|record| record.date().format("%d").to_string())
            .collect();
        let bars: Vec<(&str, u64)> = labels
            .iter()
            .zip(recent)
            .map(|(label, record)| (label.as_str(), record.daily_usage().round() as u64))
            .collect();

        let bar_chart = BarChart::default()
            .block(Block::bordered().title("일별 사용량"))
            .data(bars.as_slice())
            .bar_width(3)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

        frame.render_widget(bar_chart, area);
    }
}
