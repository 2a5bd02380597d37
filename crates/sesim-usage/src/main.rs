use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    DefaultTerminal, Frame,
};
use sesim_usage_core::prelude::*;
use sesim_usage_core::{
    DashboardConfig, DataLoader, ProjectSummary, ReportUsageSource, SourceKind, UsageReport,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

mod widgets;
use widgets::*;

#[derive(Debug, Clone, PartialEq)]
pub enum PopupType {
    ReportSummary,
    Session,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Debug logging (to a log file while the dashboard is drawn)
    #[arg(short = 'v')]
    verbose: bool,

    /// First day of the range (YYYY-MM-DD)
    #[arg(short = 's', long = "start")]
    start: Option<NaiveDate>,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(short = 'e', long = "end")]
    end: Option<NaiveDate>,

    /// Usage source: dummy or report
    #[arg(long = "source")]
    source: Option<String>,

    /// Usage report JSON exported from the usage API
    #[arg(short = 'r', long = "report")]
    report: Option<String>,

    /// Seed for reproducible dummy data
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Print chart points as JSON instead of starting the dashboard
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Persist the given options to the config file
    #[arg(long = "save")]
    save: bool,
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn apply_args(mut config: DashboardConfig, args: &Args) -> DashboardConfig {
    if let Some(start) = args.start {
        config.start_date = start;
    }
    if let Some(end) = args.end {
        config.end_date = end;
    }
    if let Some(source) = &args.source {
        config.source = source.clone();
    }
    if let Some(report) = &args.report {
        config.report_path = Some(PathBuf::from(shellexpand::tilde(report).as_ref()));
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

fn session_from_env() -> AwsSessionStore {
    let store = AwsSessionStore::new();
    if let Some(state) = AwsSessionState::from_env() {
        debug!(arn_id = ?state.arn_id(), "aws session taken from environment");
        store.set(state);
    }
    store
}

fn build_dashboard(config: &DashboardConfig, session: AwsSessionStore) -> Result<UsageDashboard> {
    let (start, end) = (config.start_date, config.end_date);
    if start > end {
        warn!(%start, %end, "start date is after end date");
    }

    let report = match &config.report_path {
        Some(path) => Some(DataLoader::new().load_from_file(path)?),
        None => None,
    };

    let dashboard = match config.source_kind()? {
        SourceKind::Dummy => {
            let source = match config.seed {
                Some(seed) => RandomUsageSource::with_seed(seed),
                None => RandomUsageSource::new(),
            };
            UsageDashboard::new(&mut SeriesGenerator::new(source), start, end, session)
        }
        SourceKind::Report => {
            let report = report
                .as_ref()
                .context("The report source needs a report file (--report)")?;
            let source = ReportUsageSource::new(report);
            UsageDashboard::new(&mut SeriesGenerator::new(source), start, end, session)
        }
    };

    Ok(match report {
        Some(report) => dashboard.with_report(report),
        None => dashboard,
    })
}

pub struct AppState {
    pub dashboard: UsageDashboard,
    pub source: SourceKind,
    pub report_path: Option<PathBuf>,
    pub last_update: DateTime<Local>,
    pub is_loading: bool,
    pub spinner_state: usize,
    pub error_message: Option<String>,
    pub active_popup: Option<PopupType>,
    /// Index into the report's projects shown in the report popup.
    /// `None` shows all projects.
    pub selected_project: Option<usize>,
}

impl AppState {
    fn new(dashboard: UsageDashboard, config: &DashboardConfig) -> Result<Self> {
        Ok(Self {
            dashboard,
            source: config.source_kind()?,
            report_path: config.report_path.clone(),
            last_update: Local::now(),
            is_loading: false,
            spinner_state: 0,
            error_message: None,
            active_popup: None,
            selected_project: None,
        })
    }

    /// Re-reads the report file. The cost series stays as generated.
    fn reload_report(&mut self) {
        let Some(path) = self.report_path.clone() else {
            return;
        };
        let result = self.dashboard.load_report(&path);
        self.finish_reload(&path, result);
    }

    /// Applies a report read without holding the state lock.
    fn apply_loaded_report(&mut self, path: &Path, loaded: Result<UsageReport>) {
        let result = loaded.map(|report| self.dashboard.set_report(report));
        self.finish_reload(path, result);
    }

    fn finish_reload(&mut self, path: &Path, result: Result<()>) {
        match result {
            Ok(()) => {
                debug!(path = %path.display(), "report reloaded");
                self.error_message = None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "report reload failed");
                self.error_message = Some(e.to_string());
            }
        }

        let project_count = self.dashboard.projects().len();
        if self.selected_project.is_some_and(|index| index >= project_count) {
            self.selected_project = None;
        }

        self.is_loading = false;
        self.last_update = Local::now();
    }

    /// All projects, then each project in report order, then all again.
    fn select_next_project(&mut self) {
        let count = self.dashboard.projects().len();
        self.selected_project = match self.selected_project {
            None if count > 0 => Some(0),
            Some(index) if index + 1 < count => Some(index + 1),
            _ => None,
        };
    }

    pub fn selected_project_summary(&self) -> Option<ProjectSummary> {
        let project = self.dashboard.projects().get(self.selected_project?)?;
        self.dashboard.project_summary(project.project_id)
    }

    fn update_spinner(&mut self) {
        self.spinner_state = (self.spinner_state + 1) % 10;
    }

    pub fn get_spinner_char(&self) -> char {
        match self.spinner_state {
            0 => '⠋',
            1 => '⠙',
            2 => '⠹',
            3 => '⠸',
            4 => '⠼',
            5 => '⠴',
            6 => '⠦',
            7 => '⠧',
            8 => '⠇',
            9 => '⠏',
            _ => '⠋',
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self.source {
            SourceKind::Dummy => "dummy",
            SourceKind::Report => "report",
        }
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    fn toggle_popup(&mut self, popup: PopupType) {
        self.active_popup = if self.active_popup.as_ref() == Some(&popup) {
            None
        } else {
            Some(popup)
        };
    }
}

pub struct App {
    state: Arc<Mutex<AppState>>,
    refresh: Duration,
    exit: bool,
}

impl App {
    pub fn new(state: AppState, refresh_secs: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            refresh: Duration::from_secs(refresh_secs.max(1)),
            exit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let state_clone = Arc::clone(&self.state);
        let refresh = self.refresh;

        tokio::spawn(async move {
            let mut interval = interval(refresh);
            loop {
                interval.tick().await;

                let path = match state_clone.lock() {
                    Ok(mut state) => {
                        state.is_loading = state.report_path.is_some();
                        state.report_path.clone()
                    }
                    Err(_) => None,
                };
                let Some(path) = path else {
                    continue;
                };

                let loaded = DataLoader::new().load_from_file(&path);
                if let Ok(mut state) = state_clone.lock() {
                    state.apply_loaded_report(&path, loaded);
                }
            }
        });

        let mut tick_interval = interval(Duration::from_millis(100));

        loop {
            tokio::select! {
                _ = tick_interval.tick() => {
                    if let Ok(mut state) = self.state.lock() {
                        state.update_spinner();
                    }

                    terminal.draw(|frame| self.draw(frame))?;
                }

                _ = async {
                    if event::poll(Duration::from_millis(0)).unwrap_or(false) {
                        if let Ok(event) = event::read() {
                            self.handle_event(event);
                        }
                    }
                } => {}
            }

            if self.exit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        if let Ok(state) = self.state.lock() {
            HeaderWidget::render(frame, chunks[0], &state);
            StatisticsWidget::render(frame, chunks[1], &state);
            UsageChartWidget::render(frame, chunks[2], &state);
            ShortcutsWidget::render(frame, chunks[3], &state);

            match &state.active_popup {
                Some(PopupType::ReportSummary) => {
                    ReportPopupWidget::render(frame, area, &state);
                }
                Some(PopupType::Session) => {
                    SessionPopupWidget::render(frame, area, &state);
                }
                None => {}
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key_event) = event {
            if key_event.kind == KeyEventKind::Press {
                match key_event.code {
                    KeyCode::Char('q') => self.exit = true,
                    KeyCode::Char('r') => {
                        if let Ok(mut state) = self.state.lock() {
                            state.reload_report();
                        }
                    }
                    KeyCode::Char('p') => {
                        if let Ok(mut state) = self.state.lock() {
                            state.toggle_popup(PopupType::ReportSummary);
                        }
                    }
                    KeyCode::Char('n') => {
                        if let Ok(mut state) = self.state.lock() {
                            if state.active_popup == Some(PopupType::ReportSummary) {
                                state.select_next_project();
                            }
                        }
                    }
                    KeyCode::Char('a') => {
                        if let Ok(mut state) = self.state.lock() {
                            state.toggle_popup(PopupType::Session);
                        }
                    }
                    KeyCode::Char('c') => {
                        if let Ok(state) = self.state.lock() {
                            state.dashboard.session().clear_aws_session();
                        }
                    }
                    KeyCode::Esc => {
                        if let Ok(mut state) = self.state.lock() {
                            state.active_popup = None;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.json {
        init_logging(args.verbose, None)?;
    } else if args.verbose {
        // the dashboard owns the terminal, so logs go to a file
        init_logging(true, Some(&DashboardConfig::log_path()))?;
    }

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config, using defaults: {}", e);
        DashboardConfig::default()
    });
    let config = apply_args(config, &args);

    if args.save {
        let path = DashboardConfig::config_path();
        config.save_to(&path)?;
        info!(path = %path.display(), "config saved");
    }

    let dashboard = build_dashboard(&config, session_from_env())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(dashboard.chart_data())?);
        return Ok(());
    }

    let state = AppState::new(dashboard, &config)?;
    let mut terminal = ratatui::init();
    let mut app = App::new(state, config.refresh_secs);

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesim_usage_core::ProjectUsage;

    fn report(project_ids: &[i64]) -> UsageReport {
        UsageReport {
            user_created_at: "2025-04-01".to_string(),
            projects: project_ids
                .iter()
                .map(|&id| ProjectUsage {
                    project_id: id,
                    project_name: format!("project-{}", id),
                    project_total_cost: id as f64,
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn state(report: Option<UsageReport>) -> AppState {
        let date = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap();
        let mut generator = SeriesGenerator::new(RandomUsageSource::with_seed(3));
        let dashboard =
            UsageDashboard::new(&mut generator, date(1), date(3), AwsSessionStore::new());
        let dashboard = match report {
            Some(report) => dashboard.with_report(report),
            None => dashboard,
        };
        AppState::new(dashboard, &DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_select_next_project_cycles_back_to_all() {
        let mut state = state(Some(report(&[7, 9])));
        assert!(state.selected_project_summary().is_none());

        state.select_next_project();
        assert_eq!(state.selected_project_summary().unwrap().project_id, 7);

        state.select_next_project();
        let summary = state.selected_project_summary().unwrap();
        assert_eq!(summary.project_id, 9);
        assert_eq!(summary.all_cost, 9.0);

        state.select_next_project();
        assert_eq!(state.selected_project, None);
    }

    #[test]
    fn test_select_next_project_without_report() {
        let mut state = state(None);
        state.select_next_project();
        assert_eq!(state.selected_project, None);
    }

    #[test]
    fn test_failed_reload_keeps_report_and_records_error() {
        let mut state = state(Some(report(&[7])));
        state.is_loading = true;

        let path = Path::new("/nonexistent/report.json");
        state.apply_loaded_report(path, DataLoader::new().load_from_file(path));

        assert!(state.error_message.is_some());
        assert!(!state.is_loading);
        assert_eq!(state.dashboard.projects().len(), 1);
    }

    #[test]
    fn test_reload_clears_error_and_out_of_range_selection() {
        let mut state = state(Some(report(&[7, 9])));
        state.selected_project = Some(1);
        state.error_message = Some("stale".to_string());

        state.apply_loaded_report(Path::new("report.json"), Ok(report(&[7])));

        assert_eq!(state.error_message, None);
        assert_eq!(state.selected_project, None);
        assert_eq!(state.dashboard.projects().len(), 1);
    }
}
