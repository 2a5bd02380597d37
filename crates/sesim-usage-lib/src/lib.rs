pub mod calculator;
pub mod calendar;
pub mod config;
pub mod data_structures;
pub mod generator;
pub mod loader;
pub mod monitor;
pub mod session;

pub use calculator::{round_cost, round_seconds, Calculator};
pub use calendar::{format_display_date, month_options, DayKind};
pub use config::{ConfigError, DashboardConfig, SourceKind};
pub use data_structures::{
    AllProjectsSummary, AwsSessionState, ChartPoint, CostComparison, CostTrend, DailyCost,
    DailyUsageRecord, IntervalUsage, ModelSummary, ModelUsage, MonthOption, MonthlyCost,
    MonthlyRequestCount, MonthlySeconds, PeriodSeries, ProjectSummary, ProjectUsage,
    UsageReport,
};
pub use generator::{project, RandomUsageSource, ReportUsageSource, SeriesGenerator, UsageDataSource};
pub use loader::DataLoader;
pub use monitor::UsageDashboard;
pub use session::{AwsSessionStore, SessionStore};

pub use anyhow::Result;
pub use chrono::NaiveDate;

pub mod prelude {
    pub use crate::data_structures::{AwsSessionState, ChartPoint, CostTrend, DailyUsageRecord};
    pub use crate::generator::{RandomUsageSource, SeriesGenerator, UsageDataSource};
    pub use crate::monitor::UsageDashboard;
    pub use crate::session::{AwsSessionStore, SessionStore};
    pub use anyhow::Result;
    pub use chrono::NaiveDate;
}
