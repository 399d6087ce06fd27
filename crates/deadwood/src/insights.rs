use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

/// Aggregated insight over a pre-existing issue list: pure counting, no
/// graph or protocol work
#[derive(Debug, Serialize)]
pub struct Insights {
    pub patterns: Vec<String>,
    pub hotspots: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: InsightSummary,
}

#[derive(Debug, Serialize)]
pub struct InsightSummary {
    pub total_files_affected: usize,
    pub average_issues_per_file: f64,
    pub most_common_issue_type: String,
}

impl Default for Insights {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            hotspots: Vec::new(),
            recommendations: Vec::new(),
            summary: InsightSummary {
                total_files_affected: 0,
                average_issues_per_file: 0.0,
                most_common_issue_type: "unknown".to_string(),
            },
        }
    }
}

/// A pattern group is significant at 20% of total issues, an issue type at
/// 15%. Fixed policy.
const PATTERN_SHARE: f64 = 0.20;
const ISSUE_TYPE_SHARE: f64 = 0.15;

const MAX_PATTERNS: usize = 5;
const MAX_HOTSPOTS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 4;
const HOTSPOT_MIN_ISSUES: usize = 3;

const PATH_AREAS: [&str; 7] =
    ["admin", "hooks", "components", "api", "pages", "database", "authentication"];

const ISSUE_TYPES: [(&str, &str); 7] = [
    ("missing_handlers", "Missing onClick/event handlers"),
    ("loading_states", "Missing or incorrect loading states"),
    ("error_handling", "Inadequate error handling"),
    ("type_issues", "TypeScript type issues"),
    ("unused_code", "Unused variables or imports"),
    ("null_checks", "Missing null/undefined checks"),
    ("async_issues", "Async/await problems"),
];

fn path_area_matches(area: &str, file: &str) -> bool {
    let lower = file.to_lowercase();
    match area {
        "admin" => file.contains("/admin/") || lower.contains("admin"),
        "hooks" => lower.contains("hook") || file.contains("/hooks/"),
        "components" => lower.contains("component") || file.contains("/components/"),
        "api" => file.contains("/api/"),
        "pages" => file.contains("page.tsx") || file.contains("page.ts"),
        "database" => lower.contains("db") || lower.contains("database") || lower.contains("prisma"),
        "authentication" => lower.contains("auth"),
        _ => false,
    }
}

fn issue_type_matches(kind: &str, message: &str) -> bool {
    match kind {
        "missing_handlers" => {
            message.contains("onclick") || message.contains("button") || message.contains("handler")
        }
        "loading_states" => message.contains("loading"),
        "error_handling" => message.contains("error") && message.contains("handling"),
        "type_issues" => {
            message.contains("type") || message.contains("typescript") || message.contains("any")
        }
        "unused_code" => message.contains("unused") || message.contains("never used"),
        "null_checks" => message.contains("undefined") || message.contains("null"),
        "async_issues" => {
            message.contains("async") || message.contains("await") || message.contains("promise")
        }
        _ => false,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Pull (file, lowercased message) pairs out of the issue buckets. Both
/// document shapes are accepted: `issue_buckets` at the root, or nested
/// under `analysis`.
fn collect_issues(doc: &Value) -> Vec<(String, String)> {
    let buckets = doc
        .get("issue_buckets")
        .and_then(Value::as_array)
        .or_else(|| {
            doc.get("analysis").and_then(|a| a.get("issue_buckets")).and_then(Value::as_array)
        });

    let Some(buckets) = buckets else {
        return Vec::new();
    };

    buckets
        .iter()
        .filter_map(|bucket| bucket.get("issues").and_then(Value::as_array))
        .flatten()
        .map(|issue| {
            let file = issue.get("file").and_then(Value::as_str).unwrap_or("").to_string();
            let message =
                issue.get("message").and_then(Value::as_str).unwrap_or("").to_lowercase();
            (file, message)
        })
        .collect()
}

pub fn analyze_patterns(doc: &Value) -> Insights {
    let issues = collect_issues(doc);
    if issues.is_empty() {
        return Insights::default();
    }

    let total = issues.len();
    let mut insights = Insights::default();

    let area_counts: Vec<(&str, usize)> = PATH_AREAS
        .iter()
        .map(|area| (*area, issues.iter().filter(|(file, _)| path_area_matches(area, file)).count()))
        .collect();

    let type_counts: Vec<(&str, &str, usize)> = ISSUE_TYPES
        .iter()
        .map(|(kind, desc)| {
            (*kind, *desc, issues.iter().filter(|(_, msg)| issue_type_matches(kind, msg)).count())
        })
        .collect();

    let mut file_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for (file, _) in &issues {
        *file_counts.entry(file.as_str()).or_default() += 1;
    }

    for (area, count) in &area_counts {
        let percentage = *count as f64 / total as f64 * 100.0;
        if percentage >= PATTERN_SHARE * 100.0 {
            insights.patterns.push(format!(
                "{} area has {} issues ({:.0}% of total)",
                capitalize(area),
                count,
                percentage
            ));
        }
    }

    // Hotspots: top files by issue count, ties broken by path for
    // deterministic output
    let mut hot: Vec<(&str, usize)> = file_counts.into_iter().collect();
    hot.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let total_files_affected = hot.len();
    for (file, count) in hot.iter().take(5) {
        if *count >= HOTSPOT_MIN_ISSUES {
            insights.hotspots.push(format!("{file} ({count} issues)"));
        }
    }

    for (_, desc, count) in &type_counts {
        let percentage = *count as f64 / total as f64 * 100.0;
        if *count > 0 && percentage >= ISSUE_TYPE_SHARE * 100.0 {
            insights.patterns.push(format!("{desc}: {count} occurrences ({percentage:.0}%)"));
        }
    }

    let count_of = |wanted: &str| -> usize {
        area_counts
            .iter()
            .find(|(area, _)| *area == wanted)
            .map(|(_, c)| *c)
            .or_else(|| type_counts.iter().find(|(k, _, _)| *k == wanted).map(|(_, _, c)| *c))
            .unwrap_or(0)
    };
    let share = |count: usize, fraction: f64| -> bool { count as f64 >= total as f64 * fraction };

    if count_of("admin") > 0 && share(count_of("admin"), 0.30) {
        insights
            .recommendations
            .push("Consider refactoring admin components - they contain 30%+ of all issues".into());
    }
    if share(count_of("missing_handlers"), 0.20) && count_of("missing_handlers") > 0 {
        insights
            .recommendations
            .push("Implement a shared button component with proper handler validation".into());
    }
    if share(count_of("error_handling"), 0.15) && count_of("error_handling") > 0 {
        insights
            .recommendations
            .push("Add error boundaries and standardize error handling patterns".into());
    }
    if count_of("hooks") > 0 && share(count_of("hooks"), 0.25) {
        insights.recommendations.push("Review and standardize React hooks implementation".into());
    }
    if share(count_of("loading_states"), 0.15) && count_of("loading_states") > 0 {
        insights
            .recommendations
            .push("Create a consistent loading state management strategy".into());
    }
    if let Some(&(file, count)) = hot.first() {
        if share(count, 0.10) {
            let name = Path::new(file).file_name().and_then(|n| n.to_str()).unwrap_or(file);
            insights
                .recommendations
                .push(format!("Priority: Fix {name} first - it has {count} issues"));
        }
    }

    insights.summary = InsightSummary {
        total_files_affected,
        average_issues_per_file: if total_files_affected == 0 {
            0.0
        } else {
            round1(total as f64 / total_files_affected as f64)
        },
        most_common_issue_type: most_common_type(&type_counts),
    };

    insights.patterns.truncate(MAX_PATTERNS);
    insights.hotspots.truncate(MAX_HOTSPOTS);
    insights.recommendations.truncate(MAX_RECOMMENDATIONS);

    insights
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// First-declared category wins ties, keeping output stable across runs
fn most_common_type(type_counts: &[(&str, &str, usize)]) -> String {
    let mut best: Option<(&str, usize)> = None;
    for (kind, _, count) in type_counts {
        if *count > best.map(|(_, c)| c).unwrap_or(0) {
            best = Some((*kind, *count));
        }
    }
    best.map(|(kind, _)| kind.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// Attach `ai_insights` to the document. Returns None when the input is not
/// a JSON object.
pub fn enhance(mut doc: Value) -> Option<Value> {
    let insights = analyze_patterns(&doc);
    let obj = doc.as_object_mut()?;
    obj.insert("ai_insights".to_string(), serde_json::to_value(&insights).unwrap());
    Some(doc)
}

/// The document emitted when the input could not be read or parsed
pub fn error_document(message: &str) -> Value {
    json!({
        "ai_insights": {
            "patterns": [],
            "hotspots": [],
            "recommendations": [format!("Analysis error: {message}")],
            "summary": {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_issues(issues: Vec<Value>) -> Value {
        json!({ "issue_buckets": [{ "name": "all", "issues": issues }] })
    }

    fn issue(file: &str, message: &str) -> Value {
        json!({ "file": file, "message": message })
    }

    #[test]
    fn test_no_buckets_yields_defaults() {
        let insights = analyze_patterns(&json!({"other": 1}));
        assert!(insights.patterns.is_empty());
        assert_eq!(insights.summary.most_common_issue_type, "unknown");
    }

    #[test]
    fn test_nested_bucket_format_accepted() {
        let doc = json!({
            "analysis": {
                "issue_buckets": [
                    { "issues": [issue("src/admin/users.tsx", "missing onClick handler")] }
                ]
            }
        });
        let insights = analyze_patterns(&doc);
        assert_eq!(insights.summary.total_files_affected, 1);
    }

    #[test]
    fn test_path_area_pattern_at_threshold() {
        // 2 of 5 admin issues = 40%, over the 20% bar
        let insights = analyze_patterns(&doc_with_issues(vec![
            issue("src/admin/users.tsx", "broken"),
            issue("src/admin/roles.tsx", "broken"),
            issue("src/lib/a.ts", "broken"),
            issue("src/lib/b.ts", "broken"),
            issue("src/lib/c.ts", "broken"),
        ]));

        assert!(insights.patterns.iter().any(|p| p.starts_with("Admin area has 2 issues")));
    }

    #[test]
    fn test_issue_type_pattern() {
        let insights = analyze_patterns(&doc_with_issues(vec![
            issue("a.ts", "button missing onClick handler"),
            issue("b.ts", "button missing onClick handler"),
            issue("c.ts", "something else entirely"),
        ]));

        assert!(insights
            .patterns
            .iter()
            .any(|p| p.starts_with("Missing onClick/event handlers: 2 occurrences")));
    }

    #[test]
    fn test_hotspot_requires_three_issues() {
        let insights = analyze_patterns(&doc_with_issues(vec![
            issue("hot.ts", "x"),
            issue("hot.ts", "y"),
            issue("hot.ts", "z"),
            issue("cold.ts", "w"),
        ]));

        assert_eq!(insights.hotspots, vec!["hot.ts (3 issues)"]);
    }

    #[test]
    fn test_priority_recommendation_for_concentrated_file() {
        let mut issues = vec![
            issue("src/widgets/big.tsx", "a"),
            issue("src/widgets/big.tsx", "b"),
            issue("src/widgets/big.tsx", "c"),
        ];
        for i in 0..7 {
            issues.push(issue(&format!("other{i}.ts"), "misc"));
        }
        let insights = analyze_patterns(&doc_with_issues(issues));

        assert!(insights
            .recommendations
            .iter()
            .any(|r| r.contains("Priority: Fix big.tsx first - it has 3 issues")));
    }

    #[test]
    fn test_summary_statistics() {
        let insights = analyze_patterns(&doc_with_issues(vec![
            issue("a.ts", "unused import"),
            issue("a.ts", "unused variable"),
            issue("b.ts", "loading state missing"),
        ]));

        assert_eq!(insights.summary.total_files_affected, 2);
        assert_eq!(insights.summary.average_issues_per_file, 1.5);
        assert_eq!(insights.summary.most_common_issue_type, "unused_code");
    }

    #[test]
    fn test_caps_applied() {
        // Every issue lands in many areas and types at once
        let issues: Vec<Value> = (0..10)
            .map(|i| {
                issue(
                    &format!("src/admin/hooks/components/api/page.ts{i}x"),
                    "unused async error handling loading type null handler",
                )
            })
            .collect();
        let insights = analyze_patterns(&doc_with_issues(issues));

        assert!(insights.patterns.len() <= 5);
        assert!(insights.hotspots.len() <= 3);
        assert!(insights.recommendations.len() <= 4);
    }

    #[test]
    fn test_enhance_attaches_insights() {
        let doc = doc_with_issues(vec![issue("a.ts", "unused import")]);
        let enhanced = enhance(doc).unwrap();

        assert!(enhanced.get("ai_insights").is_some());
        assert!(enhanced.get("issue_buckets").is_some());
    }

    #[test]
    fn test_enhance_rejects_non_object() {
        assert!(enhance(json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_error_document_shape() {
        let doc = error_document("boom");
        let recs = doc["ai_insights"]["recommendations"].as_array().unwrap();
        assert_eq!(recs[0], "Analysis error: boom");
    }
}
