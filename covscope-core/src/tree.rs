//! Tree model: ordering, node identity, filtering, and row flattening.
//!
//! The report tree is never mutated. [`sort_tree`] returns an independent copy,
//! and [`TreeRenderer`] flattens a sorted copy into the rows a surface draws.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::coverage::CoverageStatistic;
use crate::types::{FileEntry, FileId, TreeNode, ROOT_NAME};

/// Ordering applied to siblings within each directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    ByName,
    ByCoverage,
}

impl SortMode {
    /// Value stored under the `sort-mode` preference key.
    pub fn as_pref(self) -> &'static str {
        match self {
            SortMode::ByName => "name",
            SortMode::ByCoverage => "coverage",
        }
    }

    pub fn from_pref(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortMode::ByName),
            "coverage" => Some(SortMode::ByCoverage),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortMode::ByName => SortMode::ByCoverage,
            SortMode::ByCoverage => SortMode::ByName,
        }
    }
}

/// Case-insensitive name collation.
///
/// Names compare by their lowercase forms first. Names that differ only in
/// case are ordered lowercase-first at the first differing character, so the
/// result is a total order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        for (x, y) in a.chars().zip(b.chars()) {
            if x == y {
                continue;
            }
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
        a.len().cmp(&b.len())
    })
}

/// Returns a copy of `node` with every directory's children reordered.
///
/// Directories always precede files. `ByName` orders by [`compare_names`];
/// `ByCoverage` orders by descending `stats.node_coverage`, falling back to
/// the name order on ties.
pub fn sort_tree(node: &TreeNode, mode: SortMode, stats: &dyn CoverageStatistic) -> TreeNode {
    match node {
        TreeNode::File { .. } => node.clone(),
        TreeNode::Dir { name, children } => {
            let mut keyed: Vec<(f64, TreeNode)> = children
                .iter()
                .map(|child| {
                    let score = match mode {
                        SortMode::ByName => 0.0,
                        SortMode::ByCoverage => stats.node_coverage(child),
                    };
                    (score, sort_tree(child, mode, stats))
                })
                .collect();
            keyed.sort_by(|(score_a, a), (score_b, b)| {
                b.is_dir().cmp(&a.is_dir()).then_with(|| match mode {
                    SortMode::ByName => compare_names(a.name(), b.name()),
                    SortMode::ByCoverage => score_b
                        .total_cmp(score_a)
                        .then_with(|| compare_names(a.name(), b.name())),
                })
            });
            TreeNode::Dir {
                name: name.clone(),
                children: keyed.into_iter().map(|(_, n)| n).collect(),
            }
        }
    }
}

/// Identity of a directory: the names of every ancestor below the root, plus
/// its own name.
///
/// Two same-named directories in different branches get different paths even
/// when they sit at the same depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_owned());
        Self(segments)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Directories expanded when a report is first opened: every top-level one.
pub fn initial_expanded(root: &TreeNode) -> HashSet<NodePath> {
    let base = NodePath::root();
    top_level(root)
        .iter()
        .filter(|c| c.is_dir())
        .map(|c| base.child(c.name()))
        .collect()
}

fn top_level(root: &TreeNode) -> &[TreeNode] {
    match root {
        TreeNode::Dir { name, children } if name == ROOT_NAME => children,
        _ => std::slice::from_ref(root),
    }
}

/// Case-insensitive substring test of a file path against a filter query.
///
/// `query_lower` must already be lowercase. The empty query matches everything.
pub fn path_matches(path: &str, query_lower: &str) -> bool {
    query_lower.is_empty() || path.to_lowercase().contains(query_lower)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Dir,
    File,
}

/// What activating a row acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTarget {
    Dir(NodePath),
    File(FileId),
}

/// One visible line of the tree panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub depth: usize,
    pub label: String,
    pub kind: NodeKind,
    /// Directory rows only; always `false` for files.
    pub expanded: bool,
    /// Coverage badge value in `[0, 100]`.
    pub coverage: f64,
    pub target: RowTarget,
    /// The row is the file currently open in the viewer.
    pub selected: bool,
}

/// Flattens a sorted tree into visible rows.
///
/// A collapsed directory hides its descendants. With a non-empty `query`,
/// files whose path does not contain it are hidden, directories with no
/// visible file below them are hidden, and the remaining directories are shown
/// expanded regardless of `expanded`. The `expanded` set itself is never
/// modified here.
pub struct TreeRenderer<'a> {
    pub files: &'a [FileEntry],
    pub stats: &'a dyn CoverageStatistic,
    pub expanded: &'a HashSet<NodePath>,
    /// Lowercased filter query.
    pub query: &'a str,
    pub current_file: Option<FileId>,
}

impl TreeRenderer<'_> {
    pub fn rows(&self, root: &TreeNode) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let base = NodePath::root();
        for node in top_level(root) {
            self.walk(node, 0, &base, &mut rows);
        }
        rows
    }

    /// Emits `node` (and its visible descendants) into `out`; returns whether
    /// the node is visible.
    fn walk(&self, node: &TreeNode, depth: usize, parent: &NodePath, out: &mut Vec<TreeRow>) -> bool {
        match node {
            TreeNode::File { name, file_id } => {
                let visible = self
                    .files
                    .get(*file_id)
                    .is_some_and(|f| path_matches(&f.path, self.query));
                if visible {
                    out.push(TreeRow {
                        depth,
                        label: name.clone(),
                        kind: NodeKind::File,
                        expanded: false,
                        coverage: self.stats.file_coverage(*file_id),
                        target: RowTarget::File(*file_id),
                        selected: self.current_file == Some(*file_id),
                    });
                }
                visible
            }
            TreeNode::Dir { name, children } => {
                let path = parent.child(name);
                let filtering = !self.query.is_empty();
                let expanded = filtering || self.expanded.contains(&path);

                let mut nested = Vec::new();
                let mut any_visible = false;
                if expanded {
                    for child in children {
                        any_visible |= self.walk(child, depth + 1, &path, &mut nested);
                    }
                }
                if filtering && !any_visible {
                    return false;
                }

                out.push(TreeRow {
                    depth,
                    label: name.clone(),
                    kind: NodeKind::Dir,
                    expanded,
                    coverage: self.stats.node_coverage(node),
                    target: RowTarget::Dir(path),
                    selected: false,
                });
                out.append(&mut nested);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::MeanOfChildren;
    use crate::types::LineCoverage::{Covered, Uncovered};
    use crate::types::LineCoverage;

    fn file(path: &str, covered: usize, total: usize) -> FileEntry {
        let coverage: Vec<LineCoverage> = (0..total)
            .map(|i| if i < covered { Covered } else { Uncovered })
            .collect();
        let lines = coverage.iter().map(|_| "x".to_string()).collect();
        FileEntry::new(path, lines, coverage)
    }

    fn labels(node: &TreeNode) -> Vec<&str> {
        match node {
            TreeNode::Dir { children, .. } => children.iter().map(TreeNode::name).collect(),
            TreeNode::File { .. } => vec![],
        }
    }

    fn scenario() -> (Vec<FileEntry>, TreeNode) {
        let files = vec![
            file("a/x.go", 4, 5),
            file("a/y.go", 1, 5),
            file("b/z.go", 1, 2),
        ];
        let tree = TreeNode::dir(
            ".",
            vec![
                TreeNode::dir("b", vec![TreeNode::file("z.go", 2)]),
                TreeNode::dir("a", vec![TreeNode::file("y.go", 1), TreeNode::file("x.go", 0)]),
            ],
        );
        (files, tree)
    }

    #[test]
    fn coverage_ties_fall_back_to_name() {
        let (files, tree) = scenario();
        let stats = MeanOfChildren::new(&files);
        let sorted = sort_tree(&tree, SortMode::ByCoverage, &stats);
        // a = mean(80, 20) = 50, b = 50.
        assert_eq!(labels(&sorted), vec!["a", "b"]);
        let TreeNode::Dir { children, .. } = &sorted else { unreachable!() };
        assert_eq!(labels(&children[0]), vec!["x.go", "y.go"]);
    }

    #[test]
    fn sorting_copies_without_touching_input() {
        let (files, tree) = scenario();
        let stats = MeanOfChildren::new(&files);
        let before = tree.clone();
        let _ = sort_tree(&tree, SortMode::ByName, &stats);
        assert_eq!(tree, before);
    }

    #[test]
    fn directories_precede_files_in_both_modes() {
        let files = vec![file("zz.go", 5, 5), file("a/b.go", 0, 5)];
        let tree = TreeNode::dir(
            ".",
            vec![TreeNode::file("zz.go", 0), TreeNode::dir("a", vec![TreeNode::file("b.go", 1)])],
        );
        let stats = MeanOfChildren::new(&files);
        for mode in [SortMode::ByName, SortMode::ByCoverage] {
            assert_eq!(labels(&sort_tree(&tree, mode, &stats)), vec!["a", "zz.go"]);
        }
    }

    #[test]
    fn name_collation_is_case_insensitive_and_total() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("A", "a"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn same_named_dirs_in_different_branches_have_distinct_paths() {
        let left: NodePath = ["a", "util"].into_iter().collect();
        let right: NodePath = ["b", "util"].into_iter().collect();
        assert_eq!(left.depth(), right.depth());
        assert_ne!(left, right);
        assert_eq!(left.to_string(), "a/util");
    }

    #[test]
    fn root_is_elided_and_collapsed_dirs_hide_children() {
        let (files, tree) = scenario();
        let stats = MeanOfChildren::new(&files);
        let sorted = sort_tree(&tree, SortMode::ByName, &stats);
        let expanded: HashSet<NodePath> = [NodePath::root().child("a")].into_iter().collect();
        let rows = TreeRenderer {
            files: &files,
            stats: &stats,
            expanded: &expanded,
            query: "",
            current_file: Some(1),
        }
        .rows(&sorted);
        let got: Vec<(usize, &str, bool)> =
            rows.iter().map(|r| (r.depth, r.label.as_str(), r.selected)).collect();
        assert_eq!(
            got,
            vec![
                (0, "a", false),
                (1, "x.go", false),
                (1, "y.go", true),
                (0, "b", false),
            ]
        );
        assert!(rows[0].expanded);
        assert!(!rows[3].expanded);
        assert_eq!(rows[0].coverage, 50.0);
    }

    #[test]
    fn filter_hides_non_matching_and_force_expands_ancestors() {
        let (files, tree) = scenario();
        let stats = MeanOfChildren::new(&files);
        let sorted = sort_tree(&tree, SortMode::ByName, &stats);
        let expanded = HashSet::new();
        let rows = TreeRenderer {
            files: &files,
            stats: &stats,
            expanded: &expanded,
            query: "z.g",
            current_file: None,
        }
        .rows(&sorted);
        let got: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(got, vec!["b", "z.go"]);
        assert!(rows[0].expanded);
        assert!(expanded.is_empty());
    }

    #[test]
    fn initial_expansion_covers_top_level_dirs_only() {
        let (_, tree) = scenario();
        let expanded = initial_expanded(&tree);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.contains(&NodePath::root().child("a")));
    }

    #[test]
    fn sort_mode_prefs_round_trip_and_reject_junk() {
        assert_eq!(SortMode::from_pref("coverage"), Some(SortMode::ByCoverage));
        assert_eq!(SortMode::from_pref(SortMode::ByName.as_pref()), Some(SortMode::ByName));
        assert_eq!(SortMode::from_pref("size"), None);
    }
}
