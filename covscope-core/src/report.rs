//! Report loading.
//!
//! Reads the generator's JSON document into [`ReportData`]. Older or trimmed
//! reports may omit the tree or the summary; both are rebuilt from the file
//! list in that case.

use std::path::Path;

use serde::Deserialize;

use crate::coverage::percent;
use crate::error::{CovscopeError, Result};
use crate::tree::compare_names;
use crate::types::{
    DiffSummary, FileEntry, FileId, ReportConfig, ReportData, Summary, TreeNode, ROOT_NAME,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    #[serde(default)]
    files: Vec<FileEntry>,
    #[serde(default)]
    tree: Option<TreeNode>,
    #[serde(default)]
    summary: Option<Summary>,
    #[serde(default)]
    diff_summary: Option<DiffSummary>,
    #[serde(default)]
    is_diff_mode: bool,
    #[serde(default)]
    config: Option<ReportConfig>,
}

/// Reads and parses the report at `path`.
///
/// # Errors
///
/// Returns [`CovscopeError::ReadReport`] if the file cannot be read and
/// [`CovscopeError::Json`] if it is not a valid report document.
pub fn load_report(path: &Path) -> Result<ReportData> {
    let bytes = std::fs::read(path).map_err(|source| CovscopeError::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_report(&bytes)?;
    tracing::info!(
        path = %path.display(),
        files = report.files.len(),
        diff_mode = report.is_diff_mode,
        "loaded coverage report"
    );
    Ok(report)
}

/// Parses a report document from raw JSON bytes.
pub fn parse_report(bytes: &[u8]) -> Result<ReportData> {
    let raw: RawReport = serde_json::from_slice(bytes)?;
    let tree = match raw.tree {
        Some(tree) => tree,
        None => {
            tracing::debug!("report has no tree, building one from file paths");
            build_tree(&raw.files)
        }
    };
    let summary = raw.summary.unwrap_or_else(|| summarize(&raw.files));
    Ok(ReportData {
        files: raw.files,
        tree,
        summary,
        diff_summary: raw.diff_summary,
        is_diff_mode: raw.is_diff_mode,
        config: raw.config.unwrap_or_default(),
    })
}

impl ReportData {
    /// Builds a complete report from a file list alone.
    pub fn from_files(files: Vec<FileEntry>) -> Self {
        let tree = build_tree(&files);
        let summary = summarize(&files);
        Self {
            files,
            tree,
            summary,
            diff_summary: None,
            is_diff_mode: false,
            config: ReportConfig::default(),
        }
    }
}

/// Totals instrumented and covered lines across every file.
pub fn summarize(files: &[FileEntry]) -> Summary {
    let (total_lines, covered_lines) = files
        .iter()
        .flat_map(|f| f.coverage.iter())
        .fold((0u64, 0u64), |(total, covered), c| {
            (
                total + u64::from(c.is_instrumented()),
                covered + u64::from(c.is_covered()),
            )
        });
    Summary {
        total_lines,
        covered_lines,
        percent: percent(covered_lines, total_lines),
    }
}

/// Builds the directory tree for `files` by splitting each path on `/`.
///
/// Children are ordered directories first, then by name. A path that is both
/// a file and a directory prefix of another path keeps whichever kind was
/// inserted first.
pub fn build_tree(files: &[FileEntry]) -> TreeNode {
    let mut root = TreeNode::dir(ROOT_NAME, Vec::new());
    for (file_id, file) in files.iter().enumerate() {
        let parts: Vec<&str> = file.path.split('/').filter(|p| !p.is_empty()).collect();
        insert_path(&mut root, &parts, file_id);
    }
    sort_by_name(&mut root);
    root
}

fn insert_path(node: &mut TreeNode, parts: &[&str], file_id: FileId) {
    let Some((&name, rest)) = parts.split_first() else {
        return;
    };
    let TreeNode::Dir { children, .. } = node else {
        return;
    };
    let is_file = rest.is_empty();

    let idx = match children.iter().position(|c| c.name() == name) {
        Some(idx) => idx,
        None => {
            children.push(if is_file {
                TreeNode::file(name, file_id)
            } else {
                TreeNode::dir(name, Vec::new())
            });
            children.len() - 1
        }
    };

    if !is_file {
        insert_path(&mut children[idx], rest, file_id);
    }
}

fn sort_by_name(node: &mut TreeNode) {
    if let TreeNode::Dir { children, .. } = node {
        children.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| compare_names(a.name(), b.name()))
        });
        children.iter_mut().for_each(sort_by_name);
    }
}
