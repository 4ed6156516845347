//! What the controller draws into.
//!
//! A [`RenderSurface`] exposes one method per independently refreshed region,
//! so an input that only changes the tree never forces the code viewport to
//! redraw, and vice versa.

use crate::search::{MatchRecord, MatchStatus};
use crate::state::ThemeMode;
use crate::tree::{SortMode, TreeRow};
use crate::types::{DiffState, DiffSummary, FileId, LineCoverage, Summary};

pub trait RenderSurface {
    fn render_summary(&mut self, summary: &Summary, diff: Option<&DiffSummary>);

    fn render_tree(&mut self, rows: &[TreeRow]);

    fn render_code(&mut self, view: &CodeView);

    fn render_status(&mut self, status: &StatusLine);

    fn apply_theme(&mut self, theme: ThemeMode);

    /// Brings one-based `line` to the vertical centre of the code viewport.
    fn scroll_to_center(&mut self, line: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    Match,
    /// The match under the search cursor.
    CurrentMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeLine {
    /// One-based line number.
    pub number: u32,
    pub coverage: LineCoverage,
    /// Present only for reports generated in diff mode.
    pub diff: Option<DiffState>,
    pub selected: bool,
    pub segments: Vec<Segment>,
}

impl CodeLine {
    /// The source text of the line, reassembled from its segments.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn has_matches(&self) -> bool {
        self.segments.iter().any(|s| s.kind != SegmentKind::Plain)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeView {
    /// The report contains no files at all.
    NoFiles,
    /// The open file has zero lines.
    Empty { file_id: FileId, path: String },
    Lines {
        file_id: FileId,
        path: String,
        /// Syntax colouring requested for this render.
        syntax: bool,
        lines: Vec<CodeLine>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub matches: MatchStatus,
    pub location: Option<String>,
    pub sort_mode: SortMode,
    pub syntax_enabled: bool,
    pub file_query: String,
    pub content_query: String,
}

/// Splits `text` into plain and highlighted segments.
///
/// `matches` are the records on this line in `(start)` order, `first` is the
/// global index of `matches[0]` and `current` the global index under the
/// cursor. Offsets are in characters. Overlapping matches are clipped so each
/// character lands in exactly one segment; the concatenated segment texts
/// always equal `text`.
pub fn build_segments(text: &str, matches: &[MatchRecord], first: usize, current: Option<usize>) -> Vec<Segment> {
    if matches.is_empty() {
        return vec![Segment {
            text: text.to_owned(),
            kind: SegmentKind::Plain,
        }];
    }

    // Byte offset of every char boundary, including the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = bounds.len() - 1;
    let byte_at = |c: usize| bounds[c.min(char_len)];

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (offset, m) in matches.iter().enumerate() {
        let start = m.start.max(cursor).min(char_len);
        let end = m.end().min(char_len);
        if end <= start {
            continue;
        }
        if start > cursor {
            segments.push(Segment {
                text: text[byte_at(cursor)..byte_at(start)].to_owned(),
                kind: SegmentKind::Plain,
            });
        }
        let kind = if current == Some(first + offset) {
            SegmentKind::CurrentMatch
        } else {
            SegmentKind::Match
        };
        segments.push(Segment {
            text: text[byte_at(start)..byte_at(end)].to_owned(),
            kind,
        });
        cursor = end;
    }
    if cursor < char_len || segments.is_empty() {
        segments.push(Segment {
            text: text[byte_at(cursor)..].to_owned(),
            kind: SegmentKind::Plain,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::find_matches;

    fn kinds(segments: &[Segment]) -> Vec<(&str, SegmentKind)> {
        segments.iter().map(|s| (s.text.as_str(), s.kind)).collect()
    }

    #[test]
    fn marks_current_match_separately() {
        let line = "let foo = foo();";
        let matches = find_matches(&[line], "foo");
        let segments = build_segments(line, &matches, 0, Some(1));
        assert_eq!(
            kinds(&segments),
            vec![
                ("let ", SegmentKind::Plain),
                ("foo", SegmentKind::Match),
                (" = ", SegmentKind::Plain),
                ("foo", SegmentKind::CurrentMatch),
                ("();", SegmentKind::Plain),
            ]
        );
    }

    #[test]
    fn overlapping_matches_still_reassemble_the_line() {
        let matches = find_matches(&["aaaa"], "aa");
        let segments = build_segments("aaaa", &matches, 0, Some(2));
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "aaaa");
        assert_eq!(segments.last().map(|s| s.kind), Some(SegmentKind::CurrentMatch));
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let line = "ça va, ÇA VA";
        let matches = find_matches(&[line], "ça");
        let segments = build_segments(line, &matches, 4, None);
        assert_eq!(segments[0].text, "ça");
        assert_eq!(segments[2].text, "ÇA");
        assert_eq!(segments.iter().map(|s| s.text.as_str()).collect::<String>(), line);
    }

    #[test]
    fn no_matches_is_one_plain_segment() {
        let segments = build_segments("", &[], 0, None);
        assert_eq!(kinds(&segments), vec![("", SegmentKind::Plain)]);
    }
}
