use crate::extractor::extract_imports;
use crate::resolver::ImportResolver;
use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::path::Path;

/// Directed import graph over the file universe.
///
/// Forward and reverse edge maps are kept in lockstep; the reverse map is
/// what impact analysis ("who imports this?") reads. Edge endpoints are
/// always universe members; unresolved imports are dropped, never stored
/// dangling.
pub struct DependencyGraph {
    forward: FxHashMap<String, FxHashSet<String>>,
    reverse: FxHashMap<String, FxHashSet<String>>,
}

impl DependencyGraph {
    /// Build the edge set by extracting and resolving imports from every
    /// file. Reads run on the rayon pool; the final edge set is identical
    /// under any file-processing order. Unreadable files contribute no
    /// edges and no error.
    pub fn build(root: &Path, files: &FxHashSet<String>, resolver: &ImportResolver) -> Self {
        let edges: DashMap<String, FxHashSet<String>> = DashMap::new();
        let file_list: Vec<&String> = files.iter().collect();

        file_list.par_iter().for_each(|file| {
            let Ok(content) = std::fs::read_to_string(root.join(file)) else {
                return;
            };
            let from_dir = Path::new(file.as_str()).parent().unwrap_or_else(|| Path::new(""));

            let mut targets = FxHashSet::default();
            for import in extract_imports(&content) {
                // Bare package specifiers cannot name a project file
                if !import.source.starts_with('.') {
                    continue;
                }
                if let Some(resolved) = resolver.resolve(from_dir, &import.source) {
                    targets.insert(resolved);
                }
            }

            if !targets.is_empty() {
                edges.insert((*file).clone(), targets);
            }
        });

        let forward: FxHashMap<String, FxHashSet<String>> = edges.into_iter().collect();

        let mut reverse: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for (from, targets) in &forward {
            for to in targets {
                reverse.entry(to.clone()).or_default().insert(from.clone());
            }
        }

        Self { forward, reverse }
    }

    /// Files directly imported by `file`
    pub fn dependencies_of(&self, file: &str) -> Option<&FxHashSet<String>> {
        self.forward.get(file)
    }

    /// Files that directly import `file`
    pub fn dependents_of(&self, file: &str) -> Option<&FxHashSet<String>> {
        self.reverse.get(file)
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(|targets| targets.len()).sum()
    }

    /// Worklist closure over the forward edges from the seed set.
    ///
    /// The visited check makes each node processed at most once, so cycles
    /// terminate and total work is O(files + edges).
    pub fn reachable_from(&self, seeds: &FxHashSet<String>) -> FxHashSet<String> {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut queue: VecDeque<String> = seeds.iter().cloned().collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(targets) = self.forward.get(&current) {
                for target in targets {
                    if !visited.contains(target) {
                        queue.push_back(target.clone());
                    }
                }
            }
        }

        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        dir
    }

    fn universe(files: &[(&str, &str)]) -> FxHashSet<String> {
        files.iter().map(|(path, _)| path.to_string()).collect()
    }

    fn seeds(entries: &[&str]) -> FxHashSet<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_build_resolves_edges_both_ways() {
        let tree = [
            ("entry.ts", "import { run } from \"./lib\";"),
            ("lib.ts", "export const run = () => {};"),
        ];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());

        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        assert!(graph.dependencies_of("entry.ts").unwrap().contains("lib.ts"));
        assert!(graph.dependents_of("lib.ts").unwrap().contains("entry.ts"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unresolved_import_produces_no_edge() {
        let tree = [("entry.ts", "import x from \"./missing\";")];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());

        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        assert!(graph.dependencies_of("entry.ts").is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_package_imports_produce_no_edge() {
        let tree = [("entry.ts", "import react from \"react\";")];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());

        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_imports_are_idempotent() {
        let tree = [
            ("entry.ts", "import a from \"./lib\";\nconst b = require(\"./lib\");"),
            ("lib.ts", ""),
        ];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());

        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        assert_eq!(graph.dependencies_of("entry.ts").unwrap().len(), 1);
    }

    #[test]
    fn test_closure_reaches_transitive_imports() {
        let tree = [
            ("entry.ts", "import a from \"./mid\";"),
            ("mid.ts", "import b from \"./leaf\";"),
            ("leaf.ts", ""),
            ("orphan.ts", ""),
        ];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());
        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        let reachable = graph.reachable_from(&seeds(&["entry.ts"]));

        assert!(reachable.contains("entry.ts"));
        assert!(reachable.contains("mid.ts"));
        assert!(reachable.contains("leaf.ts"));
        assert!(!reachable.contains("orphan.ts"));
    }

    #[test]
    fn test_closure_terminates_on_cycle() {
        let tree = [
            ("a.ts", "import b from \"./b\";"),
            ("b.ts", "import a from \"./a\";"),
        ];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());
        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        let reachable = graph.reachable_from(&seeds(&["a.ts"]));

        assert_eq!(reachable.len(), 2);
        assert!(reachable.contains("a.ts"));
        assert!(reachable.contains("b.ts"));
    }

    #[test]
    fn test_empty_seed_set() {
        let tree = [("a.ts", "")];
        let dir = write_tree(&tree);
        let files = universe(&tree);
        let resolver = ImportResolver::new(files.clone());
        let graph = DependencyGraph::build(dir.path(), &files, &resolver);

        assert!(graph.reachable_from(&FxHashSet::default()).is_empty());
    }
}
