use crate::calculator::Calculator;
use crate::calendar::{self, DayKind};
use crate::data_structures::{
    AllProjectsSummary, ChartPoint, CostComparison, DailyUsageRecord, MonthOption,
    ProjectSummary, ProjectUsage, UsageReport,
};
use crate::generator::{project, SeriesGenerator, UsageDataSource};
use crate::loader::DataLoader;
use crate::session::AwsSessionStore;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

/// State behind the usage page: the cost series (generated once and kept),
/// its chart projection, the optional backend report and the AWS session.
pub struct UsageDashboard {
    records: Vec<DailyUsageRecord>,
    chart_data: Vec<ChartPoint>,
    report: Option<UsageReport>,
    session: AwsSessionStore,
    calculator: Calculator,
    loader: DataLoader,
}

impl UsageDashboard {
    pub fn new<S: UsageDataSource>(
        generator: &mut SeriesGenerator<S>,
        start: NaiveDate,
        end: NaiveDate,
        session: AwsSessionStore,
    ) -> Self {
        let records = generator.generate(start, end);
        let chart_data = project(&records);

        Self {
            records,
            chart_data,
            report: None,
            session,
            calculator: Calculator::new(),
            loader: DataLoader::new(),
        }
    }

    pub fn with_report(mut self, report: UsageReport) -> Self {
        self.set_report(report);
        self
    }

    /// Replaces the report; the cached series is left untouched.
    pub fn load_report<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let report = self.loader.load_from_file(path)?;
        self.set_report(report);
        Ok(())
    }

    pub fn set_report(&mut self, report: UsageReport) {
        self.report = Some(report);
    }

    pub fn records(&self) -> &[DailyUsageRecord] {
        &self.records
    }

    pub fn chart_data(&self) -> &[ChartPoint] {
        &self.chart_data
    }

    pub fn report(&self) -> Option<&UsageReport> {
        self.report.as_ref()
    }

    /// Projects of the loaded report, empty without one.
    pub fn projects(&self) -> &[ProjectUsage] {
        self.report
            .as_ref()
            .map(|report| report.projects.as_slice())
            .unwrap_or(&[])
    }

    pub fn session(&self) -> &AwsSessionStore {
        &self.session
    }

    pub fn day_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        self.records
            .last()
            .map(|record| record.cumulative_total())
            .unwrap_or(0.0)
    }

    pub fn latest_point(&self) -> Option<&ChartPoint> {
        self.chart_data.last()
    }

    pub fn peak_day(&self) -> Option<&DailyUsageRecord> {
        self.records
            .iter()
            .max_by(|a, b| a.daily_usage().total_cmp(&b.daily_usage()))
    }

    pub fn weekday_average(&self) -> Option<f64> {
        self.average_for(DayKind::Weekday)
    }

    pub fn weekend_average(&self) -> Option<f64> {
        self.average_for(DayKind::Weekend)
    }

    fn average_for(&self, kind: DayKind) -> Option<f64> {
        let values: Vec<f64> = self
            .records
            .iter()
            .filter(|record| DayKind::of(record.date()) == kind)
            .map(|record| record.daily_usage())
            .collect();

        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Per-month totals of the series, in calendar order.
    pub fn monthly_totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();

        for record in &self.records {
            let key = calendar::month_key(record.date());
            match totals.last_mut() {
                Some((month, total)) if *month == key => *total += record.daily_usage(),
                _ => totals.push((key, record.daily_usage())),
            }
        }

        totals
    }

    /// Latest month of the series against the month before it.
    pub fn month_comparison(&self) -> Option<CostComparison> {
        let totals = self.monthly_totals();
        let [.., (_, previous), (_, current)] = totals.as_slice() else {
            return None;
        };
        CostComparison::new(*current, *previous)
    }

    pub fn summary(&self) -> Option<AllProjectsSummary> {
        self.report
            .as_ref()
            .map(|report| self.calculator.all_projects_summary(&report.projects))
    }

    pub fn project_summary(&self, project_id: i64) -> Option<ProjectSummary> {
        self.report
            .as_ref()
            .map(|report| self.calculator.project_summary(&report.projects, project_id))
    }

    pub fn month_options(&self, today: NaiveDate) -> Result<Vec<MonthOption>> {
        match &self.report {
            Some(report) => calendar::month_options(&report.user_created_at, today),
            None => Ok(Vec::new()),
        }
    }
}
