use crate::manifest::Manifest;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Command substrings that mark a script as invoking a JS/TS runtime
const SCRIPT_RUNNERS: [&str; 3] = ["tsx", "ts-node", "node"];

fn script_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(src/[\w/\-]+\.(?:ts|js))").unwrap())
}

fn require_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"require\(['"]([^'"]+)"#).unwrap())
}

/// Derive the seed set of externally-invoked files.
///
/// Three detection sources are unioned: manifest bin mappings, manifest
/// script commands that run a source path, and executable scripts whose
/// shebang points at a runtime. Detection is heuristic: entry points
/// declared through other mechanisms are missed, which is why callers can
/// pass an explicit allow-list in `extra`.
pub fn locate_entries(
    root: &Path,
    manifest: &Manifest,
    bin_dir: &str,
    extra: &[String],
) -> FxHashSet<String> {
    let mut entries = FxHashSet::default();

    for path in manifest.bin.values() {
        entries.insert(strip_relative_markers(path));
    }

    for command in manifest.scripts.values() {
        if !SCRIPT_RUNNERS.iter().any(|runner| command.contains(runner)) {
            continue;
        }
        if let Some(caps) = script_path_regex().captures(command) {
            entries.insert(caps[1].to_string());
        }
    }

    collect_bin_entries(root, bin_dir, &mut entries);

    for entry in extra {
        entries.insert(strip_relative_markers(entry));
    }

    entries
}

/// Every file in the executable-script directory is an entry point; a
/// script-runner shebang additionally points at the real implementation via
/// its first require()
fn collect_bin_entries(root: &Path, bin_dir: &str, entries: &mut FxHashSet<String>) {
    let bin_path = root.join(bin_dir);
    let Ok(dir) = std::fs::read_dir(&bin_path) else {
        return;
    };

    for dir_entry in dir.flatten() {
        let path = dir_entry.path();
        if !path.is_file() {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        entries.insert(format!("{bin_dir}/{name}"));

        // Binary (non-UTF8) launchers are skipped silently
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        if let Some(target) = shebang_require_target(&content) {
            entries.insert(target);
        }
    }
}

/// If the first line is a shebang invoking a script runner, return the first
/// require() target in the remainder, with relative markers stripped
fn shebang_require_target(content: &str) -> Option<String> {
    let mut lines = content.lines();
    let first = lines.next()?;
    if !first.starts_with("#!") {
        return None;
    }
    if !SCRIPT_RUNNERS.iter().any(|runner| first.contains(runner)) {
        return None;
    }

    let rest = lines.collect::<Vec<_>>().join("\n");
    let caps = require_regex().captures(&rest)?;
    Some(strip_relative_markers(&caps[1]))
}

fn strip_relative_markers(path: &str) -> String {
    let mut stripped = path;
    loop {
        if let Some(rest) = stripped.strip_prefix("./") {
            stripped = rest;
        } else if let Some(rest) = stripped.strip_prefix("../") {
            stripped = rest;
        } else {
            break;
        }
    }
    stripped.to_string()
}
