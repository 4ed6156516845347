//! Coverage aggregation over files and directory subtrees.
//!
//! Consumers only see the [`CoverageStatistic`] trait, so the aggregation
//! policy can change without touching the tree model or the controller. The
//! shipped policy, [`MeanOfChildren`], scores a directory as the unweighted mean
//! of its direct children: a directory holding one file counts as much as a
//! sibling holding a hundred.

use crate::types::{FileEntry, FileId, LineCoverage, TreeNode};

/// Percentage `100 * covered / total`, returning 0.0 when the total is zero.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * covered as f64 / total as f64
    }
}

/// Coverage percentage of a single file's line classifications.
///
/// A file with no instrumented lines scores 0.
#[must_use]
pub fn file_percent(coverage: &[LineCoverage]) -> f64 {
    let instrumented = coverage.iter().filter(|c| c.is_instrumented()).count();
    let covered = coverage.iter().filter(|c| c.is_covered()).count();
    percent(covered as u64, instrumented as u64)
}

/// A coverage score for files and tree nodes, in `[0, 100]`.
pub trait CoverageStatistic {
    /// Score of the file at `file_id`. Unknown ids score 0.
    fn file_coverage(&self, file_id: FileId) -> f64;

    /// Score of any tree node; files delegate to [`Self::file_coverage`].
    fn node_coverage(&self, node: &TreeNode) -> f64;
}

/// Per-file percentages computed once at load, directories as mean-of-means.
///
/// File scores are cached for the whole session (report data never changes).
/// Directory scores are recomputed on demand; they are only needed when a tree
/// is sorted or rendered.
#[derive(Debug, Clone, Default)]
pub struct MeanOfChildren {
    cache: Vec<f64>,
}

impl MeanOfChildren {
    pub fn new(files: &[FileEntry]) -> Self {
        Self {
            cache: files.iter().map(|f| file_percent(&f.coverage)).collect(),
        }
    }
}

impl CoverageStatistic for MeanOfChildren {
    fn file_coverage(&self, file_id: FileId) -> f64 {
        self.cache.get(file_id).copied().unwrap_or(0.0)
    }

    fn node_coverage(&self, node: &TreeNode) -> f64 {
        match node {
            TreeNode::File { file_id, .. } => self.file_coverage(*file_id),
            TreeNode::Dir { children, .. } if children.is_empty() => 0.0,
            TreeNode::Dir { children, .. } => {
                let sum: f64 = children.iter().map(|c| self.node_coverage(c)).sum();
                sum / children.len() as f64
            }
        }
    }
}

/// Badge class of a percentage, using the generator's badge thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageLevel {
    Low,
    Medium,
    High,
}

impl CoverageLevel {
    pub const LOW_THRESHOLD: f64 = 40.0;
    pub const MEDIUM_THRESHOLD: f64 = 70.0;

    pub fn of(percent: f64) -> Self {
        if percent <= Self::LOW_THRESHOLD {
            CoverageLevel::Low
        } else if percent < Self::MEDIUM_THRESHOLD {
            CoverageLevel::Medium
        } else {
            CoverageLevel::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineCoverage::{Covered, NotInstrumented, Uncovered};

    fn file(coverage: Vec<LineCoverage>) -> FileEntry {
        let lines = coverage.iter().map(|_| String::from("x")).collect();
        FileEntry::new("f.go", lines, coverage)
    }

    #[test]
    fn file_without_instrumented_lines_scores_zero() {
        assert_eq!(file_percent(&[NotInstrumented, NotInstrumented]), 0.0);
        assert_eq!(file_percent(&[]), 0.0);
    }

    #[test]
    fn file_percent_ignores_uninstrumented_lines() {
        let pct = file_percent(&[NotInstrumented, Covered, Uncovered, Covered, Covered]);
        assert_eq!(pct, 75.0);
    }

    #[test]
    fn directory_is_mean_of_direct_children() {
        // a/ holds x (100%) and deep/ (holding y at 0% and z at 0%).
        let stats = MeanOfChildren::new(&[
            file(vec![Covered]),
            file(vec![Uncovered]),
            file(vec![Uncovered]),
        ]);
        let deep = TreeNode::dir("deep", vec![TreeNode::file("y", 1), TreeNode::file("z", 2)]);
        let a = TreeNode::dir("a", vec![TreeNode::file("x", 0), deep]);
        // Mean of 100 and 0, not the file-weighted 33.3.
        assert_eq!(stats.node_coverage(&a), 50.0);
    }

    #[test]
    fn empty_directory_and_unknown_file_score_zero() {
        let stats = MeanOfChildren::new(&[]);
        assert_eq!(stats.node_coverage(&TreeNode::dir("e", vec![])), 0.0);
        assert_eq!(stats.file_coverage(7), 0.0);
    }

    #[test]
    fn levels_follow_badge_thresholds() {
        assert_eq!(CoverageLevel::of(39.9), CoverageLevel::Low);
        assert_eq!(CoverageLevel::of(40.0), CoverageLevel::Low);
        assert_eq!(CoverageLevel::of(40.1), CoverageLevel::Medium);
        assert_eq!(CoverageLevel::of(69.9), CoverageLevel::Medium);
        assert_eq!(CoverageLevel::of(70.0), CoverageLevel::High);
    }
}
