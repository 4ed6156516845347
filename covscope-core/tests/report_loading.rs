//! Loading generator output from disk.

use std::io::Write;

use covscope_core::report::load_report;
use covscope_core::types::{DiffState, LineCoverage, TreeNode};
use covscope_core::CovscopeError;

fn write_report(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_full_generator_document() {
    let file = write_report(
        r#"{
            "files": [
                {"path": "main.go", "lines": ["package main", "func main() {}"], "coverage": [0, 2],
                 "diffState": [0, 1]},
                {"path": "util/strings.go", "lines": null, "coverage": null}
            ],
            "tree": {"type": "dir", "name": ".", "children": [
                {"type": "dir", "name": "util", "children": [
                    {"type": "file", "name": "strings.go", "fileId": 1}
                ]},
                {"type": "file", "name": "main.go", "fileId": 0}
            ]},
            "summary": {"percent": 100.0, "coveredLines": 1, "totalLines": 1},
            "diffSummary": {"newlyCoveredLines": 1, "newlyUncoveredLines": 0,
                            "deltaPercent": 12.5, "basePercent": 87.5},
            "isDiffMode": true,
            "config": {"syntaxEnabled": false}
        }"#,
    );

    let report = load_report(file.path()).unwrap();
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].coverage, vec![LineCoverage::NotInstrumented, LineCoverage::Covered]);
    assert_eq!(report.files[0].diff_state_at(1), Some(DiffState::NewlyCovered));
    assert!(report.files[1].lines.is_empty());
    assert!(report.is_diff_mode);
    assert!(!report.config.syntax_enabled);
    assert_eq!(report.diff_summary.map(|d| d.newly_covered_lines), Some(1));
    assert_eq!(report.summary.covered_lines, 1);
    assert!(matches!(&report.tree, TreeNode::Dir { name, children } if name == "." && children.len() == 2));
}

#[test]
fn derives_tree_and_summary_when_absent() {
    let file = write_report(
        r#"{"files": [
            {"path": "b/y.go", "lines": ["a", "b"], "coverage": [1, 2]},
            {"path": "a/x.go", "lines": ["a"], "coverage": [2]}
        ]}"#,
    );

    let report = load_report(file.path()).unwrap();
    assert_eq!(report.summary.total_lines, 3);
    assert_eq!(report.summary.covered_lines, 2);
    assert!(report.config.syntax_enabled, "absent config means syntax enabled");
    let TreeNode::Dir { children, .. } = &report.tree else {
        panic!("root must be a directory");
    };
    let names: Vec<&str> = children.iter().map(TreeNode::name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn invalid_coverage_tag_is_rejected() {
    let file = write_report(r#"{"files": [{"path": "x", "lines": ["x"], "coverage": [7]}]}"#);
    let err = load_report(file.path()).unwrap_err();
    assert!(matches!(err, CovscopeError::Json(_)));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nope.json");
    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, CovscopeError::ReadReport { .. }));
    assert!(err.to_string().contains("nope.json"));
}
