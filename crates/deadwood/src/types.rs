use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// File extensions that make up the project file universe
pub const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "js", "tsx", "jsx"];

/// Suffixes tried when resolving a relative import, in priority order:
/// the literal path first, then extensions, then index files
pub const RESOLUTION_SUFFIXES: [&str; 7] =
    ["", ".ts", ".js", ".tsx", ".jsx", "/index.ts", "/index.js"];

/// A directory holding more unused files than this is flagged for removal.
/// Fixed policy, not configurable.
pub const UNUSED_DIR_THRESHOLD: usize = 3;

/// More validator-named files than this across the universe signals
/// duplicated functionality. Fixed policy, not configurable.
pub const VALIDATOR_COUNT_THRESHOLD: usize = 5;

/// Configuration for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Project root to analyze
    pub cwd: PathBuf,

    /// Report output path, relative to the project root
    pub output: PathBuf,

    /// Extra entry point files beyond the auto-detected set.
    ///
    /// Entry detection is heuristic (manifest bin/scripts plus shebang
    /// sniffing) and will miss entry points declared through other
    /// mechanisms; this allow-list is the escape hatch.
    pub entry: Vec<String>,

    /// Glob patterns excluded from the file universe
    pub ignore: Vec<String>,

    /// Directory of executable scripts inspected for shebang entries
    pub bin_dir: String,

    /// Directories scanned for server files holding component references
    pub component_dirs: Vec<String>,

    /// Named application flows reported with their direct dependencies
    pub flows: Vec<FlowConfig>,

    /// Print per-phase statistics to stderr
    pub verbose: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            output: PathBuf::from(".deadwood/analysis.json"),
            entry: Vec::new(),
            ignore: Vec::new(),
            bin_dir: "bin".to_string(),
            component_dirs: vec!["src/dashboard".to_string()],
            flows: Vec::new(),
            verbose: false,
        }
    }
}

/// A named application flow: an entry file plus a human-readable purpose
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    pub name: String,
    pub entry: String,
    pub purpose: String,
}

/// Error types for deadwood operations.
///
/// Only a bad root, a malformed manifest, or a report that cannot be
/// persisted are fatal; per-file read and resolution failures are absorbed.
#[derive(Error, Debug)]
pub enum DeadwoodError {
    #[error("Invalid root directory {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Config file structure for deadwood.json / deadwood.jsonc
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub entry: Vec<String>,

    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub bin_dir: Option<String>,

    #[serde(default)]
    pub component_dirs: Vec<String>,

    #[serde(default)]
    pub flows: Vec<FlowConfig>,

    #[serde(default)]
    pub output: Option<String>,
}
