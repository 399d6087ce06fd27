use crate::collector::normalize_relative;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Quoted string literals that look like component/view/panel file references
fn component_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)['"]([^'"]*(?:component|view|panel)[^'"]*)['"]"#).unwrap())
}

/// Scan designated server files for string-literal component references.
///
/// Server files (any `*server*.ts` / `*server*.js` directly inside the given
/// directories) register components by string, invisible to import tracing.
/// Returns reference -> declaring server file (root-relative).
pub fn scan_component_map(root: &Path, component_dirs: &[String]) -> FxHashMap<String, String> {
    let mut map = FxHashMap::default();

    for dir in component_dirs {
        let dir_path = root.join(dir);
        let Ok(read) = std::fs::read_dir(&dir_path) else {
            continue;
        };

        let mut server_files: Vec<_> =
            read.flatten().map(|e| e.path()).filter(|p| p.is_file() && is_server_file(p)).collect();
        server_files.sort();

        for server_file in server_files {
            let Ok(content) = std::fs::read_to_string(&server_file) else {
                continue;
            };
            let relative = server_file.strip_prefix(root).unwrap_or(&server_file);
            let server_rel = normalize_relative(relative);

            for caps in component_ref_regex().captures_iter(&content) {
                let reference = caps[1].to_string();
                if reference.contains(".js") || reference.contains(".ts") {
                    map.insert(reference, server_rel.clone());
                }
            }
        }
    }

    map
}

fn is_server_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.contains("server") && (name.ends_with(".ts") || name.ends_with(".js"))
}

/// Files the component map marks as used, bypassing graph traversal.
///
/// References rooted at src/ are taken as-is; anything else is assumed to
/// live next to the server file that registered it.
pub fn component_usage(map: &FxHashMap<String, String>) -> FxHashSet<String> {
    let mut used = FxHashSet::default();

    for (reference, server_file) in map {
        let reference = reference.trim_start_matches("./");
        if reference.starts_with("src/") {
            used.insert(reference.to_string());
        } else {
            let server_dir = Path::new(server_file)
                .parent()
                .map(normalize_relative)
                .unwrap_or_default();
            if server_dir.is_empty() {
                used.insert(reference.to_string());
            } else {
                used.insert(format!("{server_dir}/{reference}"));
            }
        }
    }

    used
}
