//! In-file text search with a circular match cursor.
//!
//! Offsets are in characters, not bytes. Matching is case-insensitive by
//! per-character lowercase folding, which keeps every offset valid against the
//! original line text.

use std::fmt;

/// One occurrence of the query inside the active file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchRecord {
    /// Zero-based line index.
    pub line: usize,
    /// Character offset of the first matched character.
    pub start: usize,
    /// Match length in characters.
    pub length: usize,
}

impl MatchRecord {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Finds every occurrence of `query` in `lines`, ordered by `(line, start)`.
///
/// After each hit the scan resumes one character later, so overlapping
/// occurrences are all reported: `"aa"` in `"aaaa"` matches at 0, 1 and 2.
pub fn find_matches<S: AsRef<str>>(lines: &[S], query: &str) -> Vec<MatchRecord> {
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (line, text) in lines.iter().enumerate() {
        let hay: Vec<char> = text.as_ref().chars().map(fold).collect();
        if hay.len() < needle.len() {
            continue;
        }
        for start in 0..=hay.len() - needle.len() {
            if hay[start..start + needle.len()] == needle[..] {
                matches.push(MatchRecord {
                    line,
                    start,
                    length: needle.len(),
                });
            }
        }
    }
    matches
}

/// Search outcome shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// No query is active.
    Inactive,
    NoMatches,
    /// One-based position of the current match and the total count.
    At { position: usize, total: usize },
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Inactive => Ok(()),
            MatchStatus::NoMatches => f.write_str("No matches"),
            MatchStatus::At { position, total } => write!(f, "{position}/{total}"),
        }
    }
}

/// Match set of the current query in the current file, plus the cursor.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    query: String,
    matches: Vec<MatchRecord>,
    current: Option<usize>,
}

impl MatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the match set with the occurrences of `query` in `lines`.
    ///
    /// The previous matches and cursor are discarded first. A non-empty result
    /// puts the cursor on the first match.
    pub fn search<S: AsRef<str>>(&mut self, lines: &[S], query: &str) {
        self.clear();
        if query.is_empty() {
            return;
        }
        self.query = query.to_owned();
        self.matches = find_matches(lines, query);
        if !self.matches.is_empty() {
            self.current = Some(0);
        }
        tracing::debug!(query, matches = self.matches.len(), "content search");
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
    }

    /// Advances the cursor, wrapping from the last match to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<MatchRecord> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        let idx = self.current.map_or(0, |i| (i + 1) % total);
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    /// Moves the cursor back, wrapping from the first match to the last.
    pub fn previous(&mut self) -> Option<MatchRecord> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        let idx = self.current.map_or(total - 1, |i| (i + total - 1) % total);
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<MatchRecord> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Matches on zero-based `line`, with the global index of the first one.
    pub fn on_line(&self, line: usize) -> (usize, &[MatchRecord]) {
        let lo = self.matches.partition_point(|m| m.line < line);
        let hi = self.matches.partition_point(|m| m.line <= line);
        (lo, &self.matches[lo..hi])
    }

    pub fn status(&self) -> MatchStatus {
        if self.query.is_empty() {
            return MatchStatus::Inactive;
        }
        match self.current {
            Some(idx) if !self.matches.is_empty() => MatchStatus::At {
                position: idx + 1,
                total: self.matches.len(),
            },
            _ => MatchStatus::NoMatches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_occurrences_are_all_counted() {
        let starts: Vec<usize> = find_matches(&["aaaa"], "aa").iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn matching_ignores_case_and_orders_by_line_then_start() {
        let lines = ["Foo foo", "", "xFOO"];
        let found = find_matches(&lines, "fOo");
        assert_eq!(
            found,
            vec![
                MatchRecord { line: 0, start: 0, length: 3 },
                MatchRecord { line: 0, start: 4, length: 3 },
                MatchRecord { line: 2, start: 1, length: 3 },
            ]
        );
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let found = find_matches(&["héllo wörld"], "wö");
        assert_eq!(found[0].start, 6);
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut index = MatchIndex::new();
        index.search(&["a a a"], "a");
        assert_eq!(index.current_index(), Some(0));
        index.next();
        index.next();
        assert_eq!(index.current_index(), Some(2));
        index.next();
        assert_eq!(index.current_index(), Some(0));
        index.previous();
        assert_eq!(index.current_index(), Some(2));
        assert_eq!(index.status(), MatchStatus::At { position: 3, total: 3 });
    }

    #[test]
    fn navigation_is_a_no_op_without_matches() {
        let mut index = MatchIndex::new();
        index.search(&["abc"], "zzz");
        assert_eq!(index.next(), None);
        assert_eq!(index.previous(), None);
        assert_eq!(index.current_index(), None);
        assert_eq!(index.status(), MatchStatus::NoMatches);
        assert_eq!(index.status().to_string(), "No matches");
    }

    #[test]
    fn research_discards_previous_matches() {
        let mut index = MatchIndex::new();
        index.search(&["one two", "two"], "two");
        index.next();
        index.search(&["one two", "two"], "one");
        assert_eq!(index.matches().len(), 1);
        assert_eq!(index.current_index(), Some(0));

        index.search(&["one two"], "");
        assert!(index.matches().is_empty());
        assert_eq!(index.status(), MatchStatus::Inactive);
    }

    #[test]
    fn on_line_returns_global_offset() {
        let mut index = MatchIndex::new();
        index.search(&["x", "", "xx", "x"], "x");
        let (first, on_two) = index.on_line(2);
        assert_eq!(first, 1);
        assert_eq!(on_two.len(), 2);
        assert!(index.on_line(1).1.is_empty());
    }
}
