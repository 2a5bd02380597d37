use crate::data_structures::UsageReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Reads an interval usage report as returned by the usage API.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<UsageReport> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let report = self
            .parse_report(&content)
            .with_context(|| format!("Failed to parse usage report: {}", path.display()))?;

        debug!(
            path = %path.display(),
            projects = report.projects.len(),
            "loaded usage report"
        );
        Ok(report)
    }

    pub fn parse_report(&self, content: &str) -> Result<UsageReport> {
        // Some API clients wrap the payload as { "data": { ... } }
        let json: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse JSON")?;
        let payload = json.get("data").cloned().unwrap_or(json);

        let report: UsageReport =
            serde_json::from_value(payload).context("Missing or invalid report fields")?;

        for project in &report.projects {
            if project.interval_day_projects.is_empty() {
                warn!(
                    project_id = project.project_id,
                    "project has no daily usage entries"
                );
            }
        }

        Ok(report)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}
