use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use deadwood::checklist::{render_results, ChecklistRunner};
use deadwood::cli::{Cli, Command, OutputFormat};
use deadwood::report::{report_json, report_text, write_report};
use deadwood::{insights, Analyzer, AnalyzerConfig, FileConfig};

/// Find default config file in directory
fn find_default_config(dir: &Path) -> Option<PathBuf> {
    let json_path = dir.join("deadwood.json");
    if json_path.exists() {
        return Some(json_path);
    }

    let jsonc_path = dir.join("deadwood.jsonc");
    if jsonc_path.exists() {
        return Some(jsonc_path);
    }

    None
}

/// Load config from file path, supporting .json and .jsonc
fn load_config_file(path: &Path) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let mut content = fs::read_to_string(path)?;
    json_strip_comments::strip(&mut content)?;
    let config: FileConfig = serde_json::from_str(&content)?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { config, cwd, output, entry, ignore, format, verbose } => {
            run_analyze(config, cwd, output, entry, ignore, format, verbose)
        }
        Command::Insights { input } => run_insights(input),
        Command::Validate { dir, dashboard_url } => run_validate(&dir, &dashboard_url),
    }
}

fn run_analyze(
    config_path: Option<PathBuf>,
    cwd: PathBuf,
    output: Option<PathBuf>,
    entry: Vec<String>,
    ignore: Vec<String>,
    format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load config file
    let file_config = if let Some(config_path) = &config_path {
        // Use specified config file (error if not found)
        if !config_path.exists() {
            eprintln!("Error: Config file not found: {}", config_path.display());
            std::process::exit(1);
        }
        Some(load_config_file(config_path)?)
    } else {
        // Look for default config file in cwd
        match find_default_config(&cwd) {
            Some(path) => match load_config_file(&path) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file '{}': {}", path.display(), e);
                    None
                }
            },
            None => None,
        }
    };
    let file_config = file_config.unwrap_or_default();

    // Merge config: CLI args override file config
    let defaults = AnalyzerConfig::default();
    let config = AnalyzerConfig {
        cwd,
        output: output
            .or_else(|| file_config.output.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.output),
        entry: if !entry.is_empty() { entry } else { file_config.entry },
        ignore: if !ignore.is_empty() { ignore } else { file_config.ignore },
        bin_dir: file_config.bin_dir.unwrap_or(defaults.bin_dir),
        component_dirs: if !file_config.component_dirs.is_empty() {
            file_config.component_dirs
        } else {
            defaults.component_dirs
        },
        flows: file_config.flows,
        verbose,
    };

    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match analyzer.analyze() {
        Ok(report) => {
            let output_path = analyzer.output_path();
            if let Err(e) = write_report(&report, &output_path) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }

            match format {
                OutputFormat::Text => {
                    report_text(&report);
                    println!("\nFull report saved to: {}", output_path.display());
                }
                OutputFormat::Json => report_json(&report),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_insights(input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let content = match &input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
        }
    };

    let doc = content
        .map_err(|e| e.to_string())
        .and_then(|c| serde_json::from_str(&c).map_err(|e| e.to_string()));

    let enhanced = match doc {
        Ok(doc) => insights::enhance(doc),
        Err(e) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&insights::error_document(&e)).unwrap()
            );
            std::process::exit(1);
        }
    };

    match enhanced {
        Some(doc) => {
            println!("{}", serde_json::to_string_pretty(&doc).unwrap());
            Ok(())
        }
        None => {
            let err = insights::error_document("input is not a JSON object");
            println!("{}", serde_json::to_string_pretty(&err).unwrap());
            std::process::exit(1);
        }
    }
}

fn run_validate(dir: &Path, dashboard_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let runner = ChecklistRunner::new(dir, dashboard_url);
    let results = runner.run();

    if let Err(e) = runner.save(&results) {
        eprintln!("Warning: could not save validation results: {e}");
    }

    render_results(&results);
    Ok(())
}
