//! Report data as produced by the static report generator.
//!
//! Everything in this module is read-only for the lifetime of a session. The
//! serde shape mirrors the generator's JSON (`camelCase` keys, tree nodes tagged
//! by `type`), including its habit of emitting `null` for empty arrays.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CovscopeError;

/// Zero-based index into [`ReportData::files`].
pub type FileId = usize;

/// Name of the synthetic root directory of every report tree.
pub const ROOT_NAME: &str = ".";

/// Per-line coverage classification.
///
/// Serialized as the generator's integer tag: `0` not instrumented,
/// `1` instrumented but never executed, `2` executed at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LineCoverage {
    NotInstrumented,
    Uncovered,
    Covered,
}

impl LineCoverage {
    pub fn is_instrumented(self) -> bool {
        !matches!(self, LineCoverage::NotInstrumented)
    }

    pub fn is_covered(self) -> bool {
        matches!(self, LineCoverage::Covered)
    }
}

impl TryFrom<u8> for LineCoverage {
    type Error = CovscopeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LineCoverage::NotInstrumented),
            1 => Ok(LineCoverage::Uncovered),
            2 => Ok(LineCoverage::Covered),
            other => Err(CovscopeError::InvalidCoverage(other)),
        }
    }
}

impl From<LineCoverage> for u8 {
    fn from(value: LineCoverage) -> Self {
        match value {
            LineCoverage::NotInstrumented => 0,
            LineCoverage::Uncovered => 1,
            LineCoverage::Covered => 2,
        }
    }
}

/// Per-line change classification, present only in diff-mode reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DiffState {
    NoChange,
    NewlyCovered,
    NewlyUncovered,
    UnchangedCovered,
    UnchangedUncovered,
}

impl TryFrom<u8> for DiffState {
    type Error = CovscopeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DiffState::NoChange),
            1 => Ok(DiffState::NewlyCovered),
            2 => Ok(DiffState::NewlyUncovered),
            3 => Ok(DiffState::UnchangedCovered),
            4 => Ok(DiffState::UnchangedUncovered),
            other => Err(CovscopeError::InvalidDiffState(other)),
        }
    }
}

impl From<DiffState> for u8 {
    fn from(value: DiffState) -> Self {
        match value {
            DiffState::NoChange => 0,
            DiffState::NewlyCovered => 1,
            DiffState::NewlyUncovered => 2,
            DiffState::UnchangedCovered => 3,
            DiffState::UnchangedUncovered => 4,
        }
    }
}

/// One source file with its text and per-line classification.
///
/// `lines` and `coverage` are aligned index-for-index; the generator guarantees
/// equal lengths and the core does not re-validate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage: Vec<LineCoverage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_state: Option<Vec<DiffState>>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, lines: Vec<String>, coverage: Vec<LineCoverage>) -> Self {
        Self {
            path: path.into(),
            lines,
            coverage,
            diff_state: None,
        }
    }

    /// Number of physical lines (1-based line numbers run `1..=line_count()`).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Coverage class of the zero-based line `idx`; out-of-range lines count as
    /// not instrumented.
    pub fn coverage_at(&self, idx: usize) -> LineCoverage {
        self.coverage
            .get(idx)
            .copied()
            .unwrap_or(LineCoverage::NotInstrumented)
    }

    pub fn diff_state_at(&self, idx: usize) -> Option<DiffState> {
        self.diff_state.as_ref().and_then(|d| d.get(idx).copied())
    }
}

/// A node of the report's directory tree.
///
/// The root is always a `Dir` named [`ROOT_NAME`]. Children order is whatever
/// the last sort produced; membership never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Dir {
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        children: Vec<TreeNode>,
    },
    File {
        name: String,
        #[serde(rename = "fileId")]
        file_id: FileId,
    },
}

impl TreeNode {
    pub fn dir(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode::Dir {
            name: name.into(),
            children,
        }
    }

    pub fn file(name: impl Into<String>, file_id: FileId) -> Self {
        TreeNode::File {
            name: name.into(),
            file_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Dir { name, .. } | TreeNode::File { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_lines: u64,
    pub covered_lines: u64,
    pub percent: f64,
}

/// Coverage movement between a base report and the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub newly_covered_lines: u64,
    pub newly_uncovered_lines: u64,
    pub delta_percent: f64,
    pub base_percent: f64,
}

/// Generator-side viewer options. A missing object or key means "enabled".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub syntax_enabled: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            syntax_enabled: true,
        }
    }
}

/// The complete, immutable input of one explorer session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub files: Vec<FileEntry>,
    pub tree: TreeNode,
    pub summary: Summary,
    pub diff_summary: Option<DiffSummary>,
    pub is_diff_mode: bool,
    pub config: ReportConfig,
}

fn default_true() -> bool {
    true
}

/// Accepts `null` wherever the generator omits an empty collection.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
