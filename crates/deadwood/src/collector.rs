use crate::types::SOURCE_EXTENSIONS;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use std::path::{Component, Path, PathBuf};

/// Expand brace patterns like `**/*.{ts,tsx}` into multiple patterns
fn expand_brace_pattern(pattern: &str) -> Vec<String> {
    if let Some(start) = pattern.find('{') {
        if let Some(end) = pattern[start..].find('}') {
            let end = start + end;
            let prefix = &pattern[..start];
            let suffix = &pattern[end + 1..];
            let alternatives = &pattern[start + 1..end];

            return alternatives
                .split(',')
                .flat_map(|alt| {
                    let expanded = format!("{prefix}{alt}{suffix}");
                    expand_brace_pattern(&expanded)
                })
                .collect();
        }
    }
    vec![pattern.to_string()]
}

/// Compile a list of glob patterns into a GlobSet for efficient matching
fn compile_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        for expanded in expand_brace_pattern(pattern) {
            if let Ok(glob) = Glob::new(&expanded) {
                builder.add(glob);
            }
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap())
}

/// Join a root-relative path with forward slashes regardless of platform
pub fn normalize_relative(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub struct Collector {
    cwd: PathBuf,
    ignore: GlobSet,
}

impl Collector {
    pub fn new(cwd: &Path, ignore_patterns: &[String]) -> Self {
        Self { cwd: cwd.to_path_buf(), ignore: compile_globset(ignore_patterns) }
    }

    /// Collect every source file under the root into the file universe.
    ///
    /// Paths are returned relative to the root with forward-slash separators.
    /// Anything under a node_modules segment is excluded. An empty tree
    /// yields an empty set, not an error.
    pub fn collect(&self) -> FxHashSet<String> {
        let mut files = FxHashSet::default();

        let mut walker_builder = WalkBuilder::new(&self.cwd);
        walker_builder.hidden(false).git_ignore(true);

        // Prune node_modules during traversal rather than filtering after
        let mut overrides = OverrideBuilder::new(&self.cwd);
        overrides.add("!**/node_modules/").ok();
        if let Ok(built) = overrides.build() {
            walker_builder.overrides(built);
        }

        for entry in walker_builder.build().flatten() {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !SOURCE_EXTENSIONS.contains(&ext) {
                continue;
            }

            let relative = path.strip_prefix(&self.cwd).unwrap_or(path);
            if relative.components().any(|c| c.as_os_str() == "node_modules") {
                continue;
            }

            let normalized = normalize_relative(relative);
            if self.ignore.is_match(&normalized) {
                continue;
            }

            files.insert(normalized);
        }

        files
    }
}
