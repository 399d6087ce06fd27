pub mod checklist;
pub mod cli;
pub mod collector;
pub mod components;
pub mod entries;
pub mod extractor;
pub mod graph;
pub mod insights;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod types;

pub use report::UsageReport;
pub use types::{AnalyzerConfig, DeadwoodError, FileConfig, FlowConfig};

use collector::Collector;
use graph::DependencyGraph;
use resolver::ImportResolver;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// One analysis run. All derived state (file universe, edges, seed set) is
/// rebuilt from scratch per invocation and discarded after the report is
/// produced; nothing persists between runs except the emitted document.
pub struct Analyzer {
    config: AnalyzerConfig,
    root: PathBuf,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, DeadwoodError> {
        let root = config.cwd.canonicalize().map_err(|source| DeadwoodError::InvalidRoot {
            path: config.cwd.clone(),
            source,
        })?;
        Ok(Self { config, root })
    }

    /// Collect the universe, seed entry points, build the import graph, run
    /// the closure, and derive the usage report
    pub fn analyze(&self) -> Result<UsageReport, DeadwoodError> {
        let collector = Collector::new(&self.root, &self.config.ignore);
        let all_files = collector.collect();

        let manifest = manifest::load_manifest(&self.root)?;
        let entry_points =
            entries::locate_entries(&self.root, &manifest, &self.config.bin_dir, &self.config.entry);

        let resolver = ImportResolver::new(all_files.clone());
        let graph = DependencyGraph::build(&self.root, &all_files, &resolver);

        // Raw entries are free-form strings (a bin path, a script path, a
        // require target without extension); resolution maps them onto the
        // universe before seeding. Entries that resolve to nothing seed
        // nothing.
        let mut seeds = FxHashSet::default();
        for entry in &entry_points {
            if let Some(resolved) = resolver.resolve(Path::new(""), entry) {
                seeds.insert(resolved);
            }
        }

        if self.config.verbose {
            eprintln!(
                "deadwood: {} files, {} entry points ({} seeded), {} edges",
                all_files.len(),
                entry_points.len(),
                seeds.len(),
                graph.edge_count()
            );
        }

        let mut used = graph.reachable_from(&seeds);

        // Component references are reachable by string literal, not import,
        // so they join the used set after the closure
        let component_map = components::scan_component_map(&self.root, &self.config.component_dirs);
        used.extend(components::component_usage(&component_map));

        Ok(report::build_report(
            &all_files,
            &used,
            &entry_points,
            component_map,
            &graph,
            &self.config.flows,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }
}

/// Run a full analysis with the given configuration
///
/// # Example
/// ```no_run
/// use deadwood::{analyze, AnalyzerConfig};
/// use std::path::PathBuf;
///
/// let config = AnalyzerConfig {
///     cwd: PathBuf::from("."),
///     entry: vec!["src/index.ts".to_string()],
///     ..Default::default()
/// };
///
/// let report = analyze(config).unwrap();
/// println!("{} unused files", report.summary.unused_files);
/// ```
pub fn analyze(config: AnalyzerConfig) -> Result<UsageReport, DeadwoodError> {
    Analyzer::new(config)?.analyze()
}
