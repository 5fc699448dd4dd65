//! Source set resolution.
//!
//! The configured source set is three ordered pattern lists: files to check,
//! extern (ambient type) files, and exclusions. The resolved list is
//! `(inclusion ∪ externs) \ exclusion`, order-preserving and duplicate-free;
//! exclusions subtract after the union.

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Resolved source set, keeping the checked/extern partition.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSources {
    pub sources: Vec<PathBuf>,
    pub externs: Vec<PathBuf>,
}

impl ResolvedSources {
    pub fn len(&self) -> usize {
        self.sources.len() + self.externs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.externs.is_empty()
    }

    /// All files in resolution order: inclusions first, then externs.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.sources.iter().chain(self.externs.iter())
    }
}

/// Expands one path pattern into concrete files. Injected so the set algebra
/// is testable without touching the filesystem.
pub trait FileResolver {
    fn resolve(&self, pattern: &str) -> Vec<PathBuf>;
}

/// Production resolver: walks the project with the `ignore` crate, matching
/// glob patterns via overrides. Plain paths (no glob metacharacters) resolve
/// directly against the project root.
pub struct GlobResolver<'a> {
    root: &'a Path,
}

impl<'a> GlobResolver<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }
}

impl FileResolver for GlobResolver<'_> {
    fn resolve(&self, pattern: &str) -> Vec<PathBuf> {
        if !pattern.contains(['*', '?', '[']) {
            let path = self.root.join(pattern);
            return if path.is_file() { vec![path] } else { Vec::new() };
        }

        let mut builder = OverrideBuilder::new(self.root);
        if builder.add(pattern).is_err() {
            return Vec::new();
        }
        let overrides = match builder.build() {
            Ok(ov) => ov,
            Err(_) => return Vec::new(),
        };

        // Los directorios ocultos (incluido el staging bajo `.typeguard/`)
        // quedan fuera del recorrido.
        let walker = WalkBuilder::new(self.root)
            .git_ignore(true)
            .overrides(overrides)
            .build();

        let mut matches: Vec<PathBuf> = walker
            .flatten()
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file())
            .collect();
        // Within one glob, order is filesystem-dependent; sort for determinism.
        matches.sort();
        matches
    }
}

/// `(inclusion ∪ externs) \ exclusion`, order-preserving, no duplicates.
///
/// A file matched by both an inclusion and an extern pattern keeps its first
/// occurrence (inclusion wins). Exclusions apply to both partitions.
pub fn resolve_source_set(
    inclusion: &[String],
    externs: &[String],
    exclusion: &[String],
    resolver: &dyn FileResolver,
) -> ResolvedSources {
    let excluded: HashSet<PathBuf> = exclusion
        .iter()
        .flat_map(|pattern| resolver.resolve(pattern))
        .collect();

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut collect = |patterns: &[String]| -> Vec<PathBuf> {
        let mut out = Vec::new();
        for pattern in patterns {
            for path in resolver.resolve(pattern) {
                if seen.insert(path.clone()) && !excluded.contains(&path) {
                    out.push(path);
                }
            }
        }
        out
    };

    let sources = collect(inclusion);
    let externs = collect(externs);
    ResolvedSources { sources, externs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeResolver {
        table: HashMap<String, Vec<PathBuf>>,
    }

    impl FakeResolver {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let table = entries
                .iter()
                .map(|(pattern, paths)| {
                    (
                        pattern.to_string(),
                        paths.iter().copied().map(PathBuf::from).collect(),
                    )
                })
                .collect();
            Self { table }
        }
    }

    impl FileResolver for FakeResolver {
        fn resolve(&self, pattern: &str) -> Vec<PathBuf> {
            self.table.get(pattern).cloned().unwrap_or_default()
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_preserves_pattern_order() {
        let resolver = FakeResolver::new(&[
            ("lib/b.js", &["lib/b.js"]),
            ("lib/a.js", &["lib/a.js"]),
            ("typedefs/*.js", &["typedefs/t1.js", "typedefs/t2.js"]),
        ]);
        let resolved = resolve_source_set(
            &strings(&["lib/b.js", "lib/a.js"]),
            &strings(&["typedefs/*.js"]),
            &[],
            &resolver,
        );
        assert_eq!(
            resolved.sources,
            vec![PathBuf::from("lib/b.js"), PathBuf::from("lib/a.js")]
        );
        assert_eq!(
            resolved.externs,
            vec![PathBuf::from("typedefs/t1.js"), PathBuf::from("typedefs/t2.js")]
        );
    }

    #[test]
    fn test_exclusion_applies_after_union() {
        let resolver = FakeResolver::new(&[
            ("lib/*.js", &["lib/a.js", "lib/broken.js"]),
            ("typedefs/*.js", &["typedefs/t.js", "lib/broken.js"]),
            ("lib/broken.js", &["lib/broken.js"]),
        ]);
        let resolved = resolve_source_set(
            &strings(&["lib/*.js"]),
            &strings(&["typedefs/*.js"]),
            &strings(&["lib/broken.js"]),
            &resolver,
        );
        assert!(!resolved.iter().any(|p| p == &PathBuf::from("lib/broken.js")));
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_no_duplicates_first_occurrence_wins() {
        let resolver = FakeResolver::new(&[
            ("lib/a.js", &["lib/a.js"]),
            ("lib/*.js", &["lib/a.js", "lib/b.js"]),
        ]);
        let resolved = resolve_source_set(
            &strings(&["lib/a.js", "lib/*.js"]),
            &strings(&["lib/*.js"]),
            &[],
            &resolver,
        );
        // a.js aparece una sola vez y queda en la partición de inclusión
        assert_eq!(resolved.sources, vec![PathBuf::from("lib/a.js"), PathBuf::from("lib/b.js")]);
        assert!(resolved.externs.is_empty());
    }

    #[test]
    fn test_empty_patterns_yield_empty_set() {
        let resolver = FakeResolver::new(&[]);
        let resolved = resolve_source_set(&[], &[], &[], &resolver);
        assert!(resolved.is_empty());
        assert_eq!(resolved.len(), 0);
    }

    #[test]
    fn test_glob_resolver_plain_path() {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("icons.js"), "// icons").unwrap();

        let resolver = GlobResolver::new(tmp.path());
        let found = resolver.resolve("lib/icons.js");
        assert_eq!(found, vec![lib.join("icons.js")]);
        assert!(resolver.resolve("lib/missing.js").is_empty());
    }

    #[test]
    fn test_glob_resolver_wildcard() {
        let tmp = TempDir::new().unwrap();
        let agg = tmp.path().join("aggregator");
        std::fs::create_dir_all(agg.join("nested")).unwrap();
        std::fs::write(agg.join("one.js"), "").unwrap();
        std::fs::write(agg.join("nested").join("two.js"), "").unwrap();
        std::fs::write(agg.join("readme.md"), "").unwrap();

        let resolver = GlobResolver::new(tmp.path());
        let found = resolver.resolve("aggregator/**/*.js");
        assert_eq!(found.len(), 2, "debe encontrar los .js y saltar el .md");
        assert!(found.iter().all(|p| p.extension().unwrap() == "js"));
    }
}
