use crate::graph::DependencyGraph;
use crate::types::{DeadwoodError, FlowConfig, UNUSED_DIR_THRESHOLD, VALIDATOR_COUNT_THRESHOLD};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub used_files: usize,
    pub unused_files: usize,
    pub usage_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct CoreFlow {
    pub entry: String,
    pub components: Vec<String>,
    pub purpose: String,
}

/// Read-only snapshot of one analysis run, persisted as a single JSON
/// document and overwritten on the next run
#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub summary: Summary,
    pub entry_points: Vec<String>,
    pub core_flows: BTreeMap<String, CoreFlow>,
    pub unused_files: Vec<String>,
    pub component_map: BTreeMap<String, String>,
    pub recommendations: Vec<String>,
    pub generated_at: String,
}

/// How many direct dependencies a core flow lists
const FLOW_COMPONENT_LIMIT: usize = 5;

pub fn build_report(
    all_files: &FxHashSet<String>,
    used: &FxHashSet<String>,
    entry_points: &FxHashSet<String>,
    component_map: FxHashMap<String, String>,
    graph: &DependencyGraph,
    flows: &[FlowConfig],
) -> UsageReport {
    let used_count = all_files.iter().filter(|f| used.contains(*f)).count();

    let mut unused_files: Vec<String> =
        all_files.iter().filter(|f| !used.contains(*f)).cloned().collect();
    unused_files.sort();

    let total = all_files.len();
    let usage_percentage =
        if total == 0 { 0.0 } else { round2(used_count as f64 / total as f64 * 100.0) };

    let mut entry_list: Vec<String> = entry_points.iter().cloned().collect();
    entry_list.sort();

    let mut core_flows = BTreeMap::new();
    for flow in flows {
        let mut components: Vec<String> = graph
            .dependencies_of(&flow.entry)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default();
        components.sort();
        components.truncate(FLOW_COMPONENT_LIMIT);
        core_flows.insert(
            flow.name.clone(),
            CoreFlow { entry: flow.entry.clone(), components, purpose: flow.purpose.clone() },
        );
    }

    let recommendations = recommend(&unused_files, all_files);

    UsageReport {
        summary: Summary {
            total_files: total,
            used_files: used_count,
            unused_files: unused_files.len(),
            usage_percentage,
        },
        entry_points: entry_list,
        core_flows,
        unused_files,
        component_map: component_map.into_iter().collect(),
        recommendations,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cleanup recommendations, in fixed order: directory groupings, then
/// unused test files, then validator duplication
fn recommend(unused_files: &[String], all_files: &FxHashSet<String>) -> Vec<String> {
    let mut recommendations = Vec::new();

    let mut unused_by_dir: BTreeMap<String, usize> = BTreeMap::new();
    for file in unused_files {
        let dir = Path::new(file)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string());
        *unused_by_dir.entry(dir).or_default() += 1;
    }
    for (dir, count) in &unused_by_dir {
        if *count > UNUSED_DIR_THRESHOLD {
            recommendations
                .push(format!("Directory '{dir}' has {count} unused files - consider removing"));
        }
    }

    let test_files =
        unused_files.iter().filter(|f| f.contains("test") || f.contains("spec")).count();
    if test_files > 0 {
        recommendations.push(format!("Found {test_files} unused test files"));
    }

    let validators = all_files.iter().filter(|f| f.contains("validator")).count();
    if validators > VALIDATOR_COUNT_THRESHOLD {
        recommendations
            .push(format!("Multiple validator files ({validators}) - consider consolidation"));
    }

    recommendations
}

/// Persist the report, creating parent directories and overwriting any
/// previous run's document
pub fn write_report(report: &UsageReport, path: &Path) -> Result<(), DeadwoodError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|source| DeadwoodError::ReportWrite { path: path.to_path_buf(), source })?;
        }
    }
    let json = serde_json::to_string_pretty(report).unwrap();
    std::fs::write(path, json)
        .map_err(|source| DeadwoodError::ReportWrite { path: path.to_path_buf(), source })
}

pub fn report_text(report: &UsageReport) {
    println!("Dependency analysis complete");
    println!(
        "  {} files, {} used ({}%), {} unused",
        report.summary.total_files,
        report.summary.used_files,
        report.summary.usage_percentage,
        report.summary.unused_files
    );

    if !report.entry_points.is_empty() {
        println!("\nEntry points:");
        for entry in &report.entry_points {
            println!("  {entry}");
        }
    }

    if !report.core_flows.is_empty() {
        println!("\nCore flows:");
        for (name, flow) in &report.core_flows {
            println!("  {name}: {}", flow.purpose);
        }
    }

    if !report.unused_files.is_empty() {
        println!("\nUnused files ({}):", report.summary.unused_files);
        for file in &report.unused_files {
            println!("  {file}");
        }
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  {rec}");
        }
    }
}

pub fn report_json(report: &UsageReport) {
    println!("{}", serde_json::to_string_pretty(report).unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ImportResolver;

    fn set(files: &[&str]) -> FxHashSet<String> {
        files.iter().map(|f| f.to_string()).collect()
    }

    fn empty_graph() -> DependencyGraph {
        let files = FxHashSet::default();
        let resolver = ImportResolver::new(files.clone());
        DependencyGraph::build(Path::new("/nonexistent"), &files, &resolver)
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let all = set(&["entry.ts", "lib.ts", "orphan.ts"]);
        let used = set(&["entry.ts", "lib.ts"]);
        let report = build_report(
            &all,
            &used,
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert_eq!(report.summary.usage_percentage, 66.67);
        assert_eq!(report.unused_files, vec!["orphan.ts"]);
    }

    #[test]
    fn test_empty_universe_has_zero_percentage() {
        let report = build_report(
            &FxHashSet::default(),
            &FxHashSet::default(),
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.usage_percentage, 0.0);
        assert!(report.unused_files.is_empty());
    }

    #[test]
    fn test_used_outside_universe_not_counted() {
        // Component references may point at files the collector never saw;
        // they must not inflate the summary
        let all = set(&["a.ts", "b.ts"]);
        let used = set(&["a.ts", "src/dashboard/ghost-panel.js"]);
        let report = build_report(
            &all,
            &used,
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert_eq!(report.summary.used_files, 1);
        assert_eq!(report.summary.unused_files, 1);
    }

    #[test]
    fn test_directory_recommendation_threshold() {
        let all = set(&[
            "stale/a.ts",
            "stale/b.ts",
            "stale/c.ts",
            "stale/d.ts",
            "fresh/x.ts",
        ]);
        let used = set(&["fresh/x.ts"]);
        let report = build_report(
            &all,
            &used,
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("'stale'") && r.contains("4 unused files")));
        // 3 or fewer does not trigger: no recommendation mentions 'fresh'
        assert!(!report.recommendations.iter().any(|r| r.contains("'fresh'")));
    }

    #[test]
    fn test_test_file_recommendation() {
        let all = set(&["app.ts", "app.spec.ts", "helpers.test.ts"]);
        let used = set(&["app.ts"]);
        let report = build_report(
            &all,
            &used,
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert!(report.recommendations.iter().any(|r| r == "Found 2 unused test files"));
    }

    #[test]
    fn test_validator_recommendation_counts_whole_universe() {
        let all = set(&[
            "v/validator-a.ts",
            "v/validator-b.ts",
            "v/validator-c.ts",
            "v/validator-d.ts",
            "v/validator-e.ts",
            "v/validator-f.ts",
        ]);
        // All used: the duplication signal is independent of usage
        let report = build_report(
            &all,
            &all.clone(),
            &FxHashSet::default(),
            FxHashMap::default(),
            &empty_graph(),
            &[],
        );

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Multiple validator files (6)")));
    }

    #[test]
    fn test_entry_points_are_sorted() {
        let all = set(&["a.ts", "b.ts"]);
        let entries = set(&["b.ts", "a.ts"]);
        let report =
            build_report(&all, &all.clone(), &entries, FxHashMap::default(), &empty_graph(), &[]);

        assert_eq!(report.entry_points, vec!["a.ts", "b.ts"]);
    }
}
