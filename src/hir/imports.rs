//! Import resolution and the file dependency graph.
//!
//! Import paths are resolved against the configured search roots, then the
//! importing file's directory. Files that are part of the current run count
//! as existing even when they only live in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::model::SourceFile;
use crate::base::constants::MSG_EXTENSION;

/// File → files it imports, over normalized paths.
pub type DependencyGraph = BTreeMap<PathBuf, BTreeSet<PathBuf>>;

/// Make `path` absolute against the current directory and drop `.` and `..`
/// components lexically. Symlinks are not followed.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolves `import a/b` statements to files.
#[derive(Debug, Clone, Default)]
pub struct ImportResolver {
    search_paths: Vec<PathBuf>,
    known_files: FxHashSet<PathBuf>,
    /// (import path, importing directory) → resolution, misses included.
    /// The directory is part of the key because the importing directory is
    /// searched first, so one import text can name different files.
    cache: FxHashMap<(String, PathBuf), Option<PathBuf>>,
}

impl ImportResolver {
    pub fn new(search_paths: &[PathBuf]) -> Self {
        Self {
            search_paths: search_paths.iter().map(|p| normalize_path(p)).collect(),
            known_files: FxHashSet::default(),
            cache: FxHashMap::default(),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Mark a file of the current run as existing.
    pub fn register_known_file(&mut self, path: &Path) {
        self.known_files.insert(normalize_path(path));
    }

    /// Forget known files and cached resolutions.
    pub fn clear(&mut self) {
        self.known_files.clear();
        self.cache.clear();
    }

    fn exists(&self, path: &Path) -> bool {
        self.known_files.contains(path) || path.is_file()
    }

    /// Resolve `import_path` as written in `context_file`.
    pub fn resolve_import(&mut self, import_path: &str, context_file: &Path) -> Option<PathBuf> {
        let context_dir = context_file
            .parent()
            .map(normalize_path)
            .unwrap_or_default();
        let key = (import_path.to_string(), context_dir);
        if let Some(cached) = self.cache.get(&key) {
            trace!(import = import_path, "import cache hit");
            return cached.clone();
        }

        let relative = import_file_name(import_path);
        let resolved = self
            .search_paths
            .iter()
            .map(|root| normalize_path(&root.join(&relative)))
            .find(|candidate| self.exists(candidate))
            .or_else(|| {
                let candidate = normalize_path(&key.1.join(&relative));
                self.exists(&candidate).then_some(candidate)
            });

        debug!(
            import = import_path,
            from = %context_file.display(),
            resolved = ?resolved,
            "resolved import"
        );
        self.cache.insert(key, resolved.clone());
        resolved
    }

    /// One node per file; edges to every import that resolves.
    pub fn build_dependency_graph(&mut self, files: &[Arc<SourceFile>]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for file in files {
            let mut deps = BTreeSet::new();
            for import in &file.imports {
                if let Some(target) = self.resolve_import(&import.path, &file.path) {
                    deps.insert(target);
                }
            }
            graph.insert(normalize_path(&file.path), deps);
        }
        graph
    }
}

/// `a//b` → `a/b.msg`.
fn import_file_name(import_path: &str) -> PathBuf {
    let joined = import_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    PathBuf::from(format!("{joined}.{MSG_EXTENSION}"))
}

// ============================================================================
// GRAPH ALGORITHMS
// ============================================================================

/// Every cycle found by a depth-first walk, one per back edge.
///
/// Each cycle starts and ends with the same file.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<PathBuf>> {
    let mut visited = BTreeSet::new();
    let mut stack = Vec::new();
    let mut cycles = Vec::new();
    for node in graph.keys() {
        if !visited.contains(node) {
            visit(node, graph, &mut visited, &mut stack, &mut cycles);
        }
    }
    cycles
}

fn visit<'g>(
    node: &'g PathBuf,
    graph: &'g DependencyGraph,
    visited: &mut BTreeSet<&'g PathBuf>,
    stack: &mut Vec<&'g PathBuf>,
    cycles: &mut Vec<Vec<PathBuf>>,
) {
    visited.insert(node);
    stack.push(node);
    if let Some(deps) = graph.get(node) {
        for dep in deps {
            if let Some(start) = stack.iter().position(|p| *p == dep) {
                let mut cycle: Vec<PathBuf> = stack[start..].iter().map(|p| (*p).clone()).collect();
                cycle.push(dep.clone());
                cycles.push(cycle);
            } else if !visited.contains(dep) {
                visit(dep, graph, visited, stack, cycles);
            }
        }
    }
    stack.pop();
}

/// Dependencies-first order, or `None` when the graph has a cycle.
///
/// Among files that are ready at the same time the lexically smallest path
/// comes first.
pub fn import_order(graph: &DependencyGraph) -> Option<Vec<PathBuf>> {
    if !detect_cycles(graph).is_empty() {
        return None;
    }

    let mut in_degree: BTreeMap<&PathBuf, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&PathBuf, Vec<&PathBuf>> = BTreeMap::new();
    for (node, deps) in graph {
        *in_degree.entry(node).or_default() += deps.len();
        for dep in deps {
            in_degree.entry(dep).or_default();
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut ready: BTreeSet<&PathBuf> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut order = Vec::with_capacity(in_degree.len());

    while let Some(node) = ready.pop_first() {
        order.push(node.clone());
        for dependent in dependents.get(node).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*dependent);
                }
            }
        }
    }

    Some(order)
}

/// Every file reachable from `file`. `file` itself is included only when a
/// cycle leads back to it.
pub fn transitive_dependencies(graph: &DependencyGraph, file: &Path) -> BTreeSet<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut pending: Vec<&PathBuf> = graph.get(file).into_iter().flatten().collect();
    while let Some(next) = pending.pop() {
        if seen.insert(next.clone()) {
            pending.extend(graph.get(next).into_iter().flatten());
        }
    }
    seen
}

/// `Circular dependency detected: a.msg -> b.msg -> a.msg`
pub fn format_cycle(cycle: &[PathBuf]) -> String {
    let names: Vec<String> = cycle
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();
    format!("Circular dependency detected: {}", names.join(" -> "))
}
