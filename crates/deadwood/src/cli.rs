use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deadwood")]
#[command(about = "Find dead files in JS/TS projects by import reachability")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Trace import reachability and report unused files
    Analyze {
        /// Path to config file (deadwood.json or deadwood.jsonc)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Project root
        #[arg(short = 'C', long, default_value = ".")]
        cwd: PathBuf,

        /// Report output path, relative to the project root
        #[arg(long)]
        output: Option<PathBuf>,

        /// Extra entry point files beyond the auto-detected set
        #[arg(short, long)]
        entry: Vec<String>,

        /// Patterns to ignore
        #[arg(long)]
        ignore: Vec<String>,

        /// Console output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Print per-phase statistics to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize issue patterns in an analysis document
    Insights {
        /// Input JSON file (reads stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Validate analysis artifacts for integrity and freshness
    Validate {
        /// Artifacts directory
        #[arg(long, default_value = ".deadwood")]
        dir: PathBuf,

        /// Local dashboard URL probed for liveness
        #[arg(long, default_value = "http://localhost:3001/api/analysis")]
        dashboard_url: String,
    },
}

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
