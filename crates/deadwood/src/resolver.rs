use crate::types::RESOLUTION_SUFFIXES;
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use std::path::{Component, Path};

/// Maps raw relative import targets onto members of the file universe.
///
/// Resolution is first-match-wins over a fixed candidate order and never
/// touches the filesystem; existence means membership in the collected set.
pub struct ImportResolver {
    files: FxHashSet<String>,
}

impl ImportResolver {
    pub fn new(files: FxHashSet<String>) -> Self {
        Self { files }
    }

    /// Resolve `target` as written in a file whose root-relative directory is
    /// `from_dir`. Returns None when no candidate is a known file; an
    /// unresolved import is a recorded gap, not an error.
    pub fn resolve(&self, from_dir: &Path, target: &str) -> Option<String> {
        for suffix in RESOLUTION_SUFFIXES {
            let candidate = from_dir.join(format!("{target}{suffix}")).clean();
            let Some(normalized) = normalize_candidate(&candidate) else {
                continue;
            };
            if self.files.contains(&normalized) {
                return Some(normalized);
            }
        }
        None
    }
}

/// Flatten a cleaned candidate to a forward-slash string. A path that still
/// starts with `..` after cleaning escapes the project root and can never be
/// a universe member.
fn normalize_candidate(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
