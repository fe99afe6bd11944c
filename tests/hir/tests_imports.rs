//! Import resolution on disk and dependency graph properties.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lumos::hir::{
    DependencyGraph, ImportResolver, detect_cycles, import_order, normalize_path,
    transitive_dependencies,
};
use rstest::rstest;

use crate::helpers::validation_helpers::write_tree;

fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
    edges
        .iter()
        .map(|(node, deps)| {
            (
                PathBuf::from(node),
                deps.iter().map(PathBuf::from).collect::<BTreeSet<_>>(),
            )
        })
        .collect()
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[test]
fn test_search_paths_are_tried_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("first/common/time.msg", "struct Stamp\n    uint64 ns\n"),
            ("second/common/time.msg", "struct Stamp\n    uint32 s\n"),
            ("app/main.msg", "import common/time\n"),
        ],
    );
    let roots = [dir.path().join("first"), dir.path().join("second")];
    let mut resolver = ImportResolver::new(&roots);

    let resolved = resolver.resolve_import("common/time", &dir.path().join("app/main.msg"));
    assert_eq!(
        resolved,
        Some(normalize_path(&dir.path().join("first/common/time.msg")))
    );
}

#[test]
fn test_importing_directory_is_the_fallback() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &[("pkg/types.msg", "struct T\n    bool b\n")]);
    let mut resolver = ImportResolver::new(&[dir.path().join("elsewhere")]);

    let from_pkg = resolver.resolve_import("types", &dir.path().join("pkg/main.msg"));
    assert_eq!(from_pkg, Some(normalize_path(&dir.path().join("pkg/types.msg"))));

    // Same import text, different importing directory.
    let from_root = resolver.resolve_import("types", &dir.path().join("main.msg"));
    assert_eq!(from_root, None);
}

#[test]
fn test_missing_import_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut resolver = ImportResolver::new(&[dir.path().to_path_buf()]);
    assert_eq!(
        resolver.resolve_import("nope/never", &dir.path().join("main.msg")),
        None
    );
}

// =============================================================================
// CYCLES
// =============================================================================

#[test]
fn test_two_file_cycle_is_found() {
    let g = graph(&[("/a.msg", &["/b.msg"]), ("/b.msg", &["/a.msg"])]);
    let cycles = detect_cycles(&g);
    assert!(!cycles.is_empty());
    assert!(cycles.iter().all(|c| !c.is_empty()));
    assert_eq!(cycles[0].first(), cycles[0].last());
}

#[rstest]
#[case(&[("/a.msg", &["/b.msg"][..]), ("/b.msg", &["/c.msg"][..]), ("/c.msg", &[][..])])]
#[case(&[("/a.msg", &["/b.msg", "/c.msg"][..]), ("/b.msg", &["/c.msg"][..]), ("/c.msg", &[][..])])]
#[case(&[("/x.msg", &[][..]), ("/y.msg", &[][..])])]
fn test_dag_has_no_cycles(#[case] edges: &[(&str, &[&str])]) {
    assert!(detect_cycles(&graph(edges)).is_empty());
}

#[test]
fn test_longer_cycle_lists_every_member() {
    let g = graph(&[
        ("/a.msg", &["/b.msg"]),
        ("/b.msg", &["/c.msg"]),
        ("/c.msg", &["/a.msg"]),
        ("/d.msg", &["/a.msg"]),
    ]);
    let cycles = detect_cycles(&g);
    assert_eq!(cycles.len(), 1);
    let members: BTreeSet<&Path> = cycles[0].iter().map(PathBuf::as_path).collect();
    assert_eq!(members.len(), 3);
    assert!(!members.contains(Path::new("/d.msg")));
}

// =============================================================================
// ORDER
// =============================================================================

#[rstest]
#[case(&[("/a.msg", &["/b.msg"][..]), ("/b.msg", &["/c.msg"][..]), ("/c.msg", &[][..])])]
#[case(&[
    ("/app.msg", &["/net.msg", "/geo.msg"][..]),
    ("/net.msg", &["/base.msg"][..]),
    ("/geo.msg", &["/base.msg", "/units.msg"][..]),
    ("/base.msg", &[][..]),
    ("/units.msg", &[][..]),
])]
fn test_order_puts_dependencies_first(#[case] edges: &[(&str, &[&str])]) {
    let g = graph(edges);
    let order = import_order(&g).unwrap();
    assert_eq!(order.len(), g.len());

    let rank = |p: &Path| order.iter().position(|o| o == p).unwrap();
    for (file, deps) in &g {
        for dep in deps {
            assert!(rank(dep) < rank(file), "{dep:?} must precede {file:?}");
        }
        for dep in transitive_dependencies(&g, file) {
            assert!(rank(&dep) < rank(file));
        }
    }
}

#[test]
fn test_order_is_lexical_among_independent_files() {
    let g = graph(&[("/c.msg", &[]), ("/a.msg", &[]), ("/b.msg", &[])]);
    assert_eq!(
        import_order(&g).unwrap(),
        vec![
            PathBuf::from("/a.msg"),
            PathBuf::from("/b.msg"),
            PathBuf::from("/c.msg")
        ]
    );
}

#[test]
fn test_cyclic_graph_has_no_order() {
    let g = graph(&[("/a.msg", &["/a.msg"])]);
    assert_eq!(import_order(&g), None);
}
