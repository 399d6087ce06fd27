use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artifact file names inside the analysis output directory
const REPORT_FILE: &str = "analysis.json";
const INSIGHTS_FILE: &str = "insights.json";
const RESULTS_FILE: &str = "validation_results.json";

/// The liveness probe is best-effort: it gets this long, and any failure is
/// a warning rather than an abort
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const FRESH_SECS: i64 = 300;
const STALE_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Serialize)]
pub struct CheckRecord {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ChecklistSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidationResults {
    pub timestamp: String,
    pub checks: Vec<CheckRecord>,
    pub summary: ChecklistSummary,
}

impl ValidationResults {
    /// Share of passing checks, as a percentage
    pub fn confidence(&self) -> f64 {
        if self.summary.total_checks == 0 {
            return 0.0;
        }
        self.summary.passed as f64 / self.summary.total_checks as f64 * 100.0
    }
}

struct CheckResult {
    status: CheckStatus,
    message: String,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Pass, message: message.into() }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Warning, message: message.into() }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self { status: CheckStatus::Fail, message: message.into() }
    }
}

/// Sequential integrity checks over the analyzer's persisted artifacts
pub struct ChecklistRunner {
    artifacts_dir: PathBuf,
    dashboard_url: String,
}

impl ChecklistRunner {
    pub fn new(artifacts_dir: &Path, dashboard_url: &str) -> Self {
        Self { artifacts_dir: artifacts_dir.to_path_buf(), dashboard_url: dashboard_url.to_string() }
    }

    pub fn run(&self) -> ValidationResults {
        let report = self.load_json(REPORT_FILE);

        let checks = vec![
            ("Usage report exists", self.check_report_exists(&report)),
            ("Report has summary", self.check_summary_present(&report)),
            ("Counts consistent", self.check_counts(&report)),
            ("Usage percentage in range", self.check_percentage(&report)),
            ("Entry points present", self.check_entry_points(&report)),
            ("Insights present", self.check_insights()),
            ("Report freshness", self.check_freshness(&report)),
            ("Dashboard API responding", self.check_dashboard_api()),
        ];

        let mut summary = ChecklistSummary::default();
        let mut records = Vec::with_capacity(checks.len());
        for (name, result) in checks {
            summary.total_checks += 1;
            match result.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Warning => summary.warnings += 1,
                CheckStatus::Fail => summary.failed += 1,
            }
            records.push(CheckRecord {
                name: name.to_string(),
                status: result.status,
                message: result.message,
            });
        }

        ValidationResults { timestamp: Utc::now().to_rfc3339(), checks: records, summary }
    }

    /// Persist the results next to the artifacts they describe
    pub fn save(&self, results: &ValidationResults) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(results).unwrap();
        std::fs::write(self.artifacts_dir.join(RESULTS_FILE), json)
    }

    fn load_json(&self, name: &str) -> Option<Value> {
        let content = std::fs::read_to_string(self.artifacts_dir.join(name)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn check_report_exists(&self, report: &Option<Value>) -> CheckResult {
        match report {
            Some(_) => CheckResult::pass(format!("Found {REPORT_FILE}")),
            None => CheckResult::fail(format!("{REPORT_FILE} not found or unreadable")),
        }
    }

    fn check_summary_present(&self, report: &Option<Value>) -> CheckResult {
        let Some(report) = report else {
            return CheckResult::fail(format!("{REPORT_FILE} missing"));
        };
        match report.get("summary").and_then(Value::as_object) {
            Some(summary) => {
                let total = summary.get("total_files").and_then(Value::as_u64).unwrap_or(0);
                CheckResult::pass(format!("Summary present ({total} files analyzed)"))
            }
            None => CheckResult::fail("No summary block found"),
        }
    }

    fn check_counts(&self, report: &Option<Value>) -> CheckResult {
        let Some(report) = report else {
            return CheckResult::fail(format!("{REPORT_FILE} missing"));
        };

        let total = report["summary"]["total_files"].as_u64();
        let used = report["summary"]["used_files"].as_u64();
        let unused = report["summary"]["unused_files"].as_u64();
        let listed = report.get("unused_files").and_then(Value::as_array).map(|a| a.len() as u64);

        match (total, used, unused, listed) {
            (Some(total), Some(used), Some(unused), Some(listed)) => {
                if used + unused == total && listed == unused {
                    CheckResult::pass(format!("All counts consistent: {total} files"))
                } else {
                    CheckResult::warning(format!(
                        "Inconsistent counts: total={total} used={used} unused={unused} listed={listed}"
                    ))
                }
            }
            _ => CheckResult::warning("Summary counts incomplete"),
        }
    }

    fn check_percentage(&self, report: &Option<Value>) -> CheckResult {
        let Some(report) = report else {
            return CheckResult::fail(format!("{REPORT_FILE} missing"));
        };
        match report["summary"]["usage_percentage"].as_f64() {
            Some(pct) if (0.0..=100.0).contains(&pct) => {
                CheckResult::pass(format!("Usage at {pct}%"))
            }
            Some(pct) => CheckResult::fail(format!("Usage percentage out of range: {pct}")),
            None => CheckResult::warning("No usage percentage found"),
        }
    }

    fn check_entry_points(&self, report: &Option<Value>) -> CheckResult {
        let Some(report) = report else {
            return CheckResult::fail(format!("{REPORT_FILE} missing"));
        };
        match report.get("entry_points").and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => {
                CheckResult::pass(format!("{} entry points", entries.len()))
            }
            Some(_) => CheckResult::warning("No entry points detected"),
            None => CheckResult::warning("No entry_points field found"),
        }
    }

    fn check_insights(&self) -> CheckResult {
        match self.load_json(INSIGHTS_FILE) {
            Some(_) => CheckResult::pass(format!("Found {INSIGHTS_FILE}")),
            None => CheckResult::warning(format!("{INSIGHTS_FILE} not found")),
        }
    }

    fn check_freshness(&self, report: &Option<Value>) -> CheckResult {
        let Some(report) = report else {
            return CheckResult::fail(format!("{REPORT_FILE} missing"));
        };
        let Some(generated) = report.get("generated_at").and_then(Value::as_str) else {
            return CheckResult::warning("No timestamp found");
        };
        let Ok(timestamp) = DateTime::parse_from_rfc3339(generated) else {
            return CheckResult::warning(format!("Unparseable timestamp: {generated}"));
        };

        let age = Utc::now().signed_duration_since(timestamp).num_seconds();
        if age < FRESH_SECS {
            CheckResult::pass(format!("Fresh analysis ({age} seconds old)"))
        } else if age < STALE_SECS {
            CheckResult::warning(format!("Analysis {} minutes old", age / 60))
        } else {
            CheckResult::fail(format!("Stale analysis ({} hours old)", age / 3600))
        }
    }

    fn check_dashboard_api(&self) -> CheckResult {
        let client = match reqwest::blocking::Client::builder().timeout(PROBE_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => return CheckResult::warning(format!("Probe client unavailable: {e}")),
        };

        match client.get(&self.dashboard_url).send() {
            Ok(response) if response.status().is_success() => {
                CheckResult::pass(format!("Dashboard responding ({})", response.status()))
            }
            Ok(response) => {
                CheckResult::warning(format!("Dashboard returned {}", response.status()))
            }
            Err(_) => CheckResult::warning("Dashboard not running or not accessible"),
        }
    }
}

pub fn render_results(results: &ValidationResults) {
    for check in &results.checks {
        let label = match check.status {
            CheckStatus::Pass => " ok ",
            CheckStatus::Warning => "warn",
            CheckStatus::Fail => "FAIL",
        };
        println!("[{label}] {}: {}", check.name, check.message);
    }

    let summary = &results.summary;
    println!("\nPassed: {}/{}", summary.passed, summary.total_checks);
    println!("Warnings: {}", summary.warnings);
    println!("Failed: {}", summary.failed);

    let confidence = results.confidence();
    println!("Confidence: {confidence:.1}%");
    if confidence >= 80.0 {
        println!("Data integrity is GOOD - safe to proceed");
    } else if confidence >= 60.0 {
        println!("Data integrity is FAIR - review warnings");
    } else {
        println!("Data integrity is POOR - fix failures before proceeding");
    }
}
