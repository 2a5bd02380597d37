use sesim_usage_core::prelude::*;
use sesim_usage_core::{round_cost, DataLoader, ReportUsageSource};
use std::env;

fn format_number(n: f64) -> String {
    let s = format!("{:.0}", n);
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    let session = AwsSessionStore::new();

    // An optional report path switches from dummy data to real daily costs
    let dashboard = if args.len() >= 2 {
        println!("Loading usage report from: {}", args[1]);
        let report = DataLoader::new().load_from_file(&args[1])?;
        let mut generator = SeriesGenerator::new(ReportUsageSource::new(&report));
        UsageDashboard::new(&mut generator, start, end, session).with_report(report)
    } else {
        println!("No report given, generating dummy usage");
        let mut generator = SeriesGenerator::new(RandomUsageSource::new());
        UsageDashboard::new(&mut generator, start, end, session)
    };

    println!("\n--- Daily / Cumulative Cost ---");
    for point in dashboard.chart_data() {
        println!(
            "{}  ${:>6}  total ${}",
            point.day(),
            format_number(point.daily_usage()),
            format_number(point.total_api())
        );
    }

    println!("\n--- Overall ---");
    println!("Days: {}", dashboard.day_count());
    println!("Total cost: ${:.2}", round_cost(dashboard.total_cost()));
    if let Some(avg) = dashboard.weekday_average() {
        println!("Weekday average: ${:.2}", round_cost(avg));
    }
    if let Some(avg) = dashboard.weekend_average() {
        println!("Weekend average: ${:.2}", round_cost(avg));
    }
    if let Some(comparison) = dashboard.month_comparison() {
        let arrow = match comparison.trend() {
            CostTrend::Increase => "▲",
            CostTrend::Decrease => "▼",
            CostTrend::Unchanged => "-",
        };
        println!("Month over month: {} {}", arrow, comparison.percent_label());
    }

    if let Some(summary) = dashboard.summary() {
        println!("\n--- Report ---");
        println!("Projects: {}", summary.project_count);
        println!("Requests: {}", summary.all_request_count);
        println!("Hours: {:.2}", summary.all_hours);
        println!("Cost: ${:.2}", summary.all_cost);
    }

    Ok(())
}
