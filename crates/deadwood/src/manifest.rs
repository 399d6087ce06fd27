use crate::types::DeadwoodError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The slice of package.json that feeds entry-point detection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub bin: BTreeMap<String, String>,

    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Load package.json from the project root.
///
/// A missing or unreadable manifest means no declared entries. Malformed
/// JSON is fatal: entry-point seeding is foundational, so a manifest that
/// parses wrong must stop the run with a diagnostic naming the file.
pub fn load_manifest(root: &Path) -> Result<Manifest, DeadwoodError> {
    let path = root.join("package.json");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Ok(Manifest::default());
    };

    serde_json::from_str(&content).map_err(|source| DeadwoodError::ManifestParse { path, source })
}
