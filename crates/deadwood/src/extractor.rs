use regex::Regex;
use std::sync::OnceLock;

/// A raw import target as it appears in source text
#[derive(Debug, Clone, PartialEq)]
pub struct RawImport {
    pub source: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Static,
    SideEffect,
    Dynamic,
    Require,
}

fn import_patterns() -> &'static [(ImportKind, Regex); 4] {
    static PATTERNS: OnceLock<[(ImportKind, Regex); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (ImportKind::Static, Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)"#).unwrap()),
            (ImportKind::SideEffect, Regex::new(r#"import\s+['"]([^'"]+)"#).unwrap()),
            (ImportKind::Require, Regex::new(r#"require\(['"]([^'"]+)"#).unwrap()),
            (ImportKind::Dynamic, Regex::new(r#"import\(['"]([^'"]+)"#).unwrap()),
        ]
    })
}

/// Scan file text for import-like statements and yield their raw targets.
///
/// Matching is purely lexical: no syntax tree, no comment or string-escape
/// awareness, so targets inside comments or template strings are picked up
/// too. That over-approximation is the accepted trade-off for a best-effort
/// tool. Targets are yielded in order of first appearance; duplicates are
/// kept.
pub fn extract_imports(content: &str) -> Vec<RawImport> {
    let mut found: Vec<(usize, RawImport)> = Vec::new();

    for (kind, pattern) in import_patterns() {
        for caps in pattern.captures_iter(content) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            found.push((
                whole.start(),
                RawImport { source: target.as_str().to_string(), kind: *kind },
            ));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, import)| import).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(content: &str) -> Vec<String> {
        extract_imports(content).into_iter().map(|i| i.source).collect()
    }

    #[test]
    fn test_static_named_import() {
        let imports = extract_imports(r#"import { join } from "./paths";"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].source, "./paths");
        assert_eq!(imports[0].kind, ImportKind::Static);
    }

    #[test]
    fn test_bare_import() {
        let imports = extract_imports(r#"import "./styles";"#);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].source, "./styles");
        assert_eq!(imports[0].kind, ImportKind::SideEffect);
    }

    #[test]
    fn test_dynamic_import_and_require() {
        let content = r#"
            const mod = await import("./lazy");
            const legacy = require("./legacy");
        "#;
        let imports = extract_imports(content);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].source, "./lazy");
        assert_eq!(imports[0].kind, ImportKind::Dynamic);
        assert_eq!(imports[1].source, "./legacy");
        assert_eq!(imports[1].kind, ImportKind::Require);
    }

    #[test]
    fn test_first_appearance_order() {
        let content = r#"
            const a = require("./a");
            import b from "./b";
            import "./c";
        "#;
        assert_eq!(sources(content), vec!["./a", "./b", "./c"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let content = r#"
            import a from "./shared";
            const b = require("./shared");
        "#;
        assert_eq!(sources(content), vec!["./shared", "./shared"]);
    }

    #[test]
    fn test_package_imports_are_yielded_verbatim() {
        // The extractor yields everything; relative filtering happens at
        // graph construction
        let content = r#"import react from "react";"#;
        assert_eq!(sources(content), vec!["react"]);
    }

    #[test]
    fn test_matches_inside_comments() {
        // Lexical matching does not understand comments; this is the
        // documented over-approximation
        let content = r#"// import old from "./retired";"#;
        assert_eq!(sources(content), vec!["./retired"]);
    }

    #[test]
    fn test_no_imports() {
        assert!(extract_imports("const x = 1;").is_empty());
    }
}
