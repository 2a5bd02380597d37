use crate::calculator::round_cost;
use crate::calendar::{days_between, format_display_date, DayKind};
use crate::data_structures::{ChartPoint, DailyUsageRecord, UsageReport};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Supplies the cost of a single calendar day.
pub trait UsageDataSource {
    fn daily_usage(&mut self, date: NaiveDate) -> f64;
}

/// Dummy data: lower cost on weekends, drawn uniformly per day.
pub struct RandomUsageSource {
    rng: fastrand::Rng,
}

impl RandomUsageSource {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageDataSource for RandomUsageSource {
    fn daily_usage(&mut self, date: NaiveDate) -> f64 {
        let value = self.rng.u32(DayKind::of(date).usage_range());
        value as f64
    }
}

/// Real telemetry: per-day project costs from a usage report.
pub struct ReportUsageSource {
    daily_costs: HashMap<NaiveDate, f64>,
}

impl ReportUsageSource {
    pub fn new(report: &UsageReport) -> Self {
        let mut daily_costs = HashMap::new();

        for project in &report.projects {
            for interval in &project.interval_day_projects {
                match NaiveDate::parse_from_str(&interval.date, "%Y-%m-%d") {
                    Ok(date) => {
                        *daily_costs.entry(date).or_insert(0.0) +=
                            round_cost(interval.project_interval_cost);
                    }
                    Err(_) => {
                        warn!(
                            project_id = project.project_id,
                            date = %interval.date,
                            "skipping daily usage entry with unparseable date"
                        );
                    }
                }
            }
        }

        Self { daily_costs }
    }
}

impl UsageDataSource for ReportUsageSource {
    fn daily_usage(&mut self, date: NaiveDate) -> f64 {
        self.daily_costs.get(&date).copied().unwrap_or(0.0)
    }
}

pub struct SeriesGenerator<S: UsageDataSource> {
    source: S,
}

impl<S: UsageDataSource> SeriesGenerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// One record per calendar day in `start..=end`, ascending, with a running
    /// cumulative total. A reversed range yields no records.
    pub fn generate(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<DailyUsageRecord> {
        if start > end {
            warn!(%start, %end, "usage range is reversed, generating an empty series");
            return Vec::new();
        }

        let mut records = Vec::new();
        let mut cumulative_total = 0.0;

        for date in days_between(start, end) {
            let daily_usage = self.source.daily_usage(date);
            cumulative_total += daily_usage;

            records.push(DailyUsageRecord::new(
                date,
                daily_usage,
                cumulative_total,
                format_display_date(date),
            ));
        }

        debug!(%start, %end, days = records.len(), total = cumulative_total, "generated usage series");
        records
    }
}

/// Chart points for `records`, same order, one per record.
pub fn project(records: &[DailyUsageRecord]) -> Vec<ChartPoint> {
    records.iter().map(ChartPoint::from).collect()
}
