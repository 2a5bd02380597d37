use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One calendar day of API cost, as shown on the usage dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsageRecord {
    date: NaiveDate,
    daily_usage: f64,
    cumulative_total: f64,
    formatted_date: String,
}

impl DailyUsageRecord {
    pub fn new(
        date: NaiveDate,
        daily_usage: f64,
        cumulative_total: f64,
        formatted_date: String,
    ) -> Self {
        Self {
            date,
            daily_usage,
            cumulative_total,
            formatted_date,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn daily_usage(&self) -> f64 {
        self.daily_usage
    }

    pub fn cumulative_total(&self) -> f64 {
        self.cumulative_total
    }

    pub fn formatted_date(&self) -> &str {
        &self.formatted_date
    }
}

/// Chart-facing view of a [`DailyUsageRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    day: String,
    #[serde(rename = "dailyUsage")]
    daily_usage: f64,
    #[serde(rename = "totalAPI")]
    total_api: f64,
}

impl ChartPoint {
    pub fn new(day: String, daily_usage: f64, total_api: f64) -> Self {
        Self {
            day,
            daily_usage,
            total_api,
        }
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn daily_usage(&self) -> f64 {
        self.daily_usage
    }

    pub fn total_api(&self) -> f64 {
        self.total_api
    }
}

impl From<&DailyUsageRecord> for ChartPoint {
    fn from(record: &DailyUsageRecord) -> Self {
        Self::new(
            record.formatted_date.clone(),
            record.daily_usage,
            record.cumulative_total,
        )
    }
}

/// Credential material of one in-progress AWS session.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSessionState {
    access_key: String,
    secret_key: String,
    session_token: String,
    arn_id: Option<i64>,
}

impl AwsSessionState {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
        arn_id: Option<i64>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: session_token.into(),
            arn_id,
        }
    }

    /// Reads the standard AWS credential variables plus `SESIM_ARN_ID`.
    /// Returns `None` when no access key is exported.
    pub fn from_env() -> Option<Self> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
        if access_key.is_empty() {
            return None;
        }
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default();
        let session_token = std::env::var("AWS_SESSION_TOKEN").unwrap_or_default();
        let arn_id = std::env::var("SESIM_ARN_ID")
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok());

        Some(Self::new(access_key, secret_key, session_token, arn_id))
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn arn_id(&self) -> Option<i64> {
        self.arn_id
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Role-scoped operations need a resolved role ARN.
    pub fn is_ready(&self) -> bool {
        self.arn_id.is_some()
    }
}

impl fmt::Debug for AwsSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSessionState")
            .field("access_key", &self.access_key)
            .field("secret_key", &mask(&self.secret_key))
            .field("session_token", &mask(&self.session_token))
            .field("arn_id", &self.arn_id)
            .finish()
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "***"
    }
}

/// Backend response for an interval usage query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub user_created_at: String,
    #[serde(default)]
    pub projects: Vec<ProjectUsage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUsage {
    pub project_id: i64,
    pub project_name: String,
    #[serde(default)]
    pub project_total_request_count: u64,
    #[serde(default)]
    pub project_total_seconds: u64,
    #[serde(default)]
    pub project_total_cost: f64,
    #[serde(default)]
    pub interval_day_projects: Vec<IntervalUsage>,
    #[serde(default)]
    pub interval_month_projects: Vec<IntervalUsage>,
    #[serde(default)]
    pub models: Vec<ModelUsage>,
}

/// Usage of one project over a day (`YYYY-MM-DD`) or a month (`YYYY-MM`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalUsage {
    pub date: String,
    #[serde(default)]
    pub project_interval_request_count: u64,
    #[serde(default)]
    pub project_interval_seconds: u64,
    #[serde(default)]
    pub project_interval_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub model_id: i64,
    pub model_name: String,
    #[serde(default)]
    pub total_request_count: u64,
    #[serde(default)]
    pub total_seconds: u64,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub month: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRequestCount {
    pub month: String,
    pub request_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeconds {
    pub month: String,
    /// Rounded to two decimals per entry. Serialized under the portal's
    /// `seconds` key.
    #[serde(rename = "seconds")]
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub day: String,
    pub cost: f64,
}

/// Per-period series shared by both dashboard summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSeries {
    pub monthly_cost: Vec<MonthlyCost>,
    pub monthly_request_count: Vec<MonthlyRequestCount>,
    pub monthly_hours: Vec<MonthlySeconds>,
    pub daily_cost: Vec<DailyCost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllProjectsSummary {
    pub all_cost: f64,
    pub all_request_count: u64,
    pub all_hours: f64,
    pub project_count: usize,
    pub series: PeriodSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: i64,
    pub project_name: String,
    pub all_cost: f64,
    pub all_request_count: u64,
    pub all_hours: f64,
    pub series: PeriodSeries,
    pub models: Vec<ModelSummary>,
}

/// One model's share of a project's usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub model_id: i64,
    pub model_name: String,
    pub request_count: u64,
    pub hours: f64,
    pub cost: f64,
}

/// The reported name, or `모델 {id}` when the report has none.
pub fn model_display_name(model_id: i64, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        format!("모델 {}", model_id)
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTrend {
    Increase,
    Decrease,
    Unchanged,
}

/// Current vs previous period cost, as the dashboard's trend badge shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct CostComparison {
    trend: CostTrend,
    difference: f64,
    percent_change: f64,
}

impl CostComparison {
    /// `None` when there is no previous cost to compare against.
    pub fn new(current: f64, previous: f64) -> Option<Self> {
        if previous == 0.0 {
            return None;
        }

        let trend = if current > previous {
            CostTrend::Increase
        } else if current < previous {
            CostTrend::Decrease
        } else {
            CostTrend::Unchanged
        };

        Some(Self {
            trend,
            difference: (current - previous).abs(),
            percent_change: (current - previous) / previous * 100.0,
        })
    }

    pub fn trend(&self) -> CostTrend {
        self.trend
    }

    pub fn difference(&self) -> f64 {
        self.difference
    }

    pub fn percent_change(&self) -> f64 {
        self.percent_change
    }

    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent_change.abs())
    }

    /// `"$ 12.34"` with a currency symbol, `"12 requests"` style without one.
    pub fn difference_label(&self, currency: Option<&str>, unit: &str) -> String {
        match currency {
            Some(symbol) => format!("{} {:.2}", symbol, self.difference),
            None => format!("{:.0} {}", self.difference, unit),
        }
    }
}
