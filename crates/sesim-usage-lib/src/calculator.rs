use crate::data_structures::{
    model_display_name, AllProjectsSummary, DailyCost, ModelSummary, ModelUsage, MonthlyCost,
    MonthlyRequestCount, MonthlySeconds, PeriodSeries, ProjectSummary, ProjectUsage,
};
use std::collections::HashMap;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Rounds a cost to the nearest cent.
///
/// Multiplies in binary floating point, then rounds half away from zero
/// (`f64::round`). `19.005 * 100.0` is exactly `1900.5`, so `19.005` rounds
/// up to `19.01`.
pub fn round_cost(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Seconds to hours, rounded to two decimals with the same rule as [`round_cost`].
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds / SECONDS_PER_HOUR * 100.0).round() / 100.0
}

pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn all_projects_summary(&self, projects: &[ProjectUsage]) -> AllProjectsSummary {
        let selected: Vec<&ProjectUsage> = projects.iter().collect();

        AllProjectsSummary {
            all_cost: self.total_cost(&selected),
            all_request_count: self.total_request_count(&selected),
            all_hours: self.total_hours(&selected),
            project_count: projects.len(),
            series: self.period_series(&selected),
        }
    }

    /// Totals and series for one project. Unknown ids give an empty summary.
    pub fn project_summary(&self, projects: &[ProjectUsage], project_id: i64) -> ProjectSummary {
        let selected: Vec<&ProjectUsage> = projects
            .iter()
            .filter(|project| project.project_id == project_id)
            .collect();

        ProjectSummary {
            project_id,
            project_name: selected
                .first()
                .map(|project| project.project_name.clone())
                .unwrap_or_default(),
            all_cost: self.total_cost(&selected),
            all_request_count: self.total_request_count(&selected),
            all_hours: self.total_hours(&selected),
            series: self.period_series(&selected),
            models: self.model_breakdown(&selected),
        }
    }

    /// Per-model totals, most expensive first. Entries sharing a model id
    /// are merged and the first non-empty name wins.
    pub fn model_breakdown(&self, projects: &[&ProjectUsage]) -> Vec<ModelSummary> {
        let mut totals: Vec<ModelTotals> = Vec::new();

        for model in projects.iter().flat_map(|p| p.models.iter()) {
            match totals.iter_mut().find(|t| t.model_id == model.model_id) {
                Some(entry) => entry.add(model),
                None => {
                    let mut entry = ModelTotals {
                        model_id: model.model_id,
                        ..Default::default()
                    };
                    entry.add(model);
                    totals.push(entry);
                }
            }
        }

        let mut models: Vec<ModelSummary> = totals.into_iter().map(ModelTotals::finish).collect();
        models.sort_by(|a, b| b.cost.total_cmp(&a.cost));
        models
    }

    pub fn total_cost(&self, projects: &[&ProjectUsage]) -> f64 {
        round_cost(projects.iter().map(|p| p.project_total_cost).sum())
    }

    pub fn total_request_count(&self, projects: &[&ProjectUsage]) -> u64 {
        projects.iter().map(|p| p.project_total_request_count).sum()
    }

    pub fn total_hours(&self, projects: &[&ProjectUsage]) -> f64 {
        let seconds: u64 = projects.iter().map(|p| p.project_total_seconds).sum();
        round_seconds(seconds as f64)
    }

    fn period_series(&self, projects: &[&ProjectUsage]) -> PeriodSeries {
        let months = projects.iter().flat_map(|p| p.interval_month_projects.iter());
        let days = projects.iter().flat_map(|p| p.interval_day_projects.iter());

        let mut monthly_cost = KeyedSum::default();
        let mut monthly_requests = KeyedSum::default();
        let mut monthly_hours = KeyedSum::default();
        for interval in months {
            monthly_cost.add(&interval.date, round_cost(interval.project_interval_cost));
            monthly_requests.add(&interval.date, interval.project_interval_request_count as f64);
            monthly_hours.add(&interval.date, round_seconds(interval.project_interval_seconds as f64));
        }

        let mut daily_cost = KeyedSum::default();
        for interval in days {
            daily_cost.add(&interval.date, round_cost(interval.project_interval_cost));
        }

        PeriodSeries {
            monthly_cost: monthly_cost
                .into_entries()
                .map(|(month, cost)| MonthlyCost { month, cost })
                .collect(),
            monthly_request_count: monthly_requests
                .into_entries()
                .map(|(month, count)| MonthlyRequestCount {
                    month,
                    request_count: count as u64,
                })
                .collect(),
            monthly_hours: monthly_hours
                .into_entries()
                .map(|(month, hours)| MonthlySeconds { month, hours })
                .collect(),
            daily_cost: daily_cost
                .into_entries()
                .map(|(day, cost)| DailyCost { day, cost })
                .collect(),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct ModelTotals {
    model_id: i64,
    name: String,
    request_count: u64,
    seconds: u64,
    cost: f64,
}

impl ModelTotals {
    fn add(&mut self, model: &ModelUsage) {
        if self.name.is_empty() {
            self.name = model.model_name.trim().to_string();
        }
        self.request_count += model.total_request_count;
        self.seconds += model.total_seconds;
        self.cost += round_cost(model.total_cost);
    }

    fn finish(self) -> ModelSummary {
        ModelSummary {
            model_id: self.model_id,
            model_name: model_display_name(self.model_id, &self.name),
            request_count: self.request_count,
            hours: round_seconds(self.seconds as f64),
            cost: round_cost(self.cost),
        }
    }
}

/// Sums values per key, keeping the order keys were first seen.
#[derive(Default)]
struct KeyedSum {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl KeyedSum {
    fn add(&mut self, key: &str, value: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    fn into_entries(self) -> impl Iterator<Item = (String, f64)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::IntervalUsage;

    fn interval(date: &str, requests: u64, seconds: u64, cost: f64) -> IntervalUsage {
        IntervalUsage {
            date: date.to_string(),
            project_interval_request_count: requests,
            project_interval_seconds: seconds,
            project_interval_cost: cost,
        }
    }

    fn model(id: i64, name: &str, requests: u64, seconds: u64, cost: f64) -> ModelUsage {
        ModelUsage {
            model_id: id,
            model_name: name.to_string(),
            total_request_count: requests,
            total_seconds: seconds,
            hourly_rate: 0.0,
            total_cost: cost,
        }
    }

    fn sample_projects() -> Vec<ProjectUsage> {
        vec![
            ProjectUsage {
                project_id: 1,
                project_name: "mail-filter".to_string(),
                project_total_request_count: 30,
                project_total_seconds: 5400,
                project_total_cost: 10.004,
                interval_day_projects: vec![
                    interval("2025-04-01", 10, 1800, 3.333),
                    interval("2025-05-02", 20, 3600, 6.671),
                ],
                interval_month_projects: vec![
                    interval("2025-04", 10, 1800, 3.333),
                    interval("2025-05", 20, 3600, 6.671),
                ],
                models: Vec::new(),
            },
            ProjectUsage {
                project_id: 2,
                project_name: "log-scanner".to_string(),
                project_total_request_count: 5,
                project_total_seconds: 1845,
                project_total_cost: 2.0,
                interval_day_projects: vec![interval("2025-04-01", 5, 1845, 2.0)],
                interval_month_projects: vec![interval("2025-04", 5, 1845, 2.0)],
                models: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_round_cost_half_boundary() {
        assert_eq!(round_cost(19.005), 19.01);
        assert_eq!(round_cost(2.675), 2.68);
        // 1.005 * 100.0 is 100.49999999999999 in binary
        assert_eq!(round_cost(1.005), 1.0);
        assert_eq!(round_cost(0.125), 0.13);
        assert_eq!(round_cost(3.333), 3.33);
        assert_eq!(round_cost(0.0), 0.0);
    }

    #[test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(5400.0), 1.5);
        assert_eq!(round_seconds(1845.0), 0.51);
        assert_eq!(round_seconds(5.0), 0.0);
        assert_eq!(round_seconds(3600.0), 1.0);
    }

    #[test]
    fn test_all_projects_summary_totals() {
        let calculator = Calculator::new();
        let summary = calculator.all_projects_summary(&sample_projects());

        assert_eq!(summary.all_cost, 12.0);
        assert_eq!(summary.all_request_count, 35);
        assert_eq!(summary.all_hours, 2.01);
        assert_eq!(summary.project_count, 2);
    }

    #[test]
    fn test_all_projects_summary_series_keep_first_seen_order() {
        let calculator = Calculator::new();
        let series = calculator.all_projects_summary(&sample_projects()).series;

        let months: Vec<_> = series.monthly_cost.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2025-04", "2025-05"]);
        assert_eq!(series.monthly_cost[0].cost, 3.33 + 2.0);
        assert_eq!(series.monthly_cost[1].cost, 6.67);

        assert_eq!(series.monthly_request_count[0].request_count, 15);
        assert_eq!(series.monthly_hours[0].hours, 0.5 + 0.51);

        assert_eq!(series.daily_cost.len(), 2);
        assert_eq!(series.daily_cost[0].day, "2025-04-01");
    }

    #[test]
    fn test_project_summary_only_counts_selected_project() {
        let calculator = Calculator::new();
        let summary = calculator.project_summary(&sample_projects(), 2);

        assert_eq!(summary.project_id, 2);
        assert_eq!(summary.all_cost, 2.0);
        assert_eq!(summary.all_request_count, 5);
        assert_eq!(summary.all_hours, 0.51);
        assert_eq!(summary.series.daily_cost.len(), 1);
        assert_eq!(summary.series.monthly_cost[0].cost, 2.0);
    }

    #[test]
    fn test_project_summary_unknown_project() {
        let calculator = Calculator::new();
        let summary = calculator.project_summary(&sample_projects(), 99);

        assert_eq!(summary.all_cost, 0.0);
        assert_eq!(summary.all_request_count, 0);
        assert!(summary.series.monthly_cost.is_empty());
    }

    #[test]
    fn test_empty_projects() {
        let summary = Calculator::new().all_projects_summary(&[]);
        assert_eq!(summary, AllProjectsSummary::default());
    }

    #[test]
    fn test_project_summary_breaks_down_models() {
        let mut projects = sample_projects();
        projects[0].models = vec![
            model(1, "", 10, 1800, 3.333),
            model(2, "sesim-mail", 20, 3600, 6.671),
            model(1, "sesim-guard", 5, 1800, 1.0),
        ];

        let summary = Calculator::new().project_summary(&projects, 1);
        assert_eq!(summary.project_name, "mail-filter");
        assert_eq!(summary.models.len(), 2);

        let top = &summary.models[0];
        assert_eq!(top.model_id, 2);
        assert_eq!(top.model_name, "sesim-mail");
        assert_eq!(top.cost, 6.67);
        assert_eq!(top.hours, 1.0);

        let merged = &summary.models[1];
        assert_eq!(merged.model_id, 1);
        assert_eq!(merged.model_name, "sesim-guard");
        assert_eq!(merged.request_count, 15);
        assert_eq!(merged.cost, 4.33);
        assert_eq!(merged.hours, 1.0);
    }

    #[test]
    fn test_model_breakdown_unnamed_model() {
        let mut projects = sample_projects();
        projects[1].models = vec![model(9, "", 5, 1845, 2.0)];

        let summary = Calculator::new().project_summary(&projects, 2);
        assert_eq!(summary.models[0].model_name, "모델 9");
        assert_eq!(summary.models[0].hours, 0.51);
        assert!(Calculator::new().project_summary(&projects, 1).models.is_empty());
    }
}
