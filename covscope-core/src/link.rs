//! Shareable location codec.
//!
//! Grammar: `file-<id>` optionally followed by `:line-<start>` optionally
//! followed by `-<end>`. `id` is the zero-based file index; `start` and `end`
//! are one-based line numbers. A leading `#` is accepted on decode.

use std::fmt;

use crate::types::FileId;

/// A decoded location.
///
/// When the string has a line segment without an end bound, `line_end` equals
/// `line_start`. Decoding does not reorder a reversed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file_id: FileId,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
}

impl Location {
    pub fn file(file_id: FileId) -> Self {
        Self {
            file_id,
            line_start: None,
            line_end: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.file_id, self.line_start, self.line_end))
    }
}

/// Parses `raw` against the grammar, rejecting file ids outside `0..file_count`.
///
/// Returns `None` for anything malformed: unknown prefix, empty or non-digit
/// numbers, a zero line number, numeric overflow, or trailing text.
pub fn decode(raw: &str, file_count: usize) -> Option<Location> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let rest = raw.strip_prefix("file-")?;
    let (file_part, line_part) = match rest.split_once(':') {
        Some((file, lines)) => (file, Some(lines)),
        None => (rest, None),
    };

    let file_id: FileId = parse_number(file_part)?;
    if file_id >= file_count {
        return None;
    }

    let Some(line_part) = line_part else {
        return Some(Location::file(file_id));
    };
    let lines = line_part.strip_prefix("line-")?;
    let (start, end) = match lines.split_once('-') {
        Some((start, end)) => (parse_line(start)?, parse_line(end)?),
        None => {
            let start = parse_line(lines)?;
            (start, start)
        }
    };

    Some(Location {
        file_id,
        line_start: Some(start),
        line_end: Some(end),
    })
}

/// Formats a location string.
///
/// The line segment is omitted without `line_start`; the end bound is omitted
/// when it is absent or equal to the start. A reversed range is swapped.
pub fn encode(file_id: FileId, line_start: Option<u32>, line_end: Option<u32>) -> String {
    let Some(start) = line_start else {
        return format!("file-{file_id}");
    };
    match line_end {
        Some(end) if end != start => {
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            format!("file-{file_id}:line-{lo}-{hi}")
        }
        _ => format!("file-{file_id}:line-{start}"),
    }
}

fn parse_number<T: std::str::FromStr>(digits: &str) -> Option<T> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_line(digits: &str) -> Option<u32> {
    parse_number(digits).filter(|&n: &u32| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_three_shapes() {
        assert_eq!(decode("file-3", 4), Some(Location::file(3)));
        assert_eq!(
            decode("file-3:line-42", 4),
            Some(Location { file_id: 3, line_start: Some(42), line_end: Some(42) })
        );
        assert_eq!(
            decode("#file-3:line-42-50", 4),
            Some(Location { file_id: 3, line_start: Some(42), line_end: Some(50) })
        );
    }

    #[test]
    fn reversed_range_decodes_as_written_and_encodes_normalized() {
        assert_eq!(
            decode("file-1:line-5-3", 2),
            Some(Location { file_id: 1, line_start: Some(5), line_end: Some(3) })
        );
        assert_eq!(encode(1, Some(5), Some(3)), "file-1:line-3-5");
    }

    #[test]
    fn rejects_malformed_and_out_of_range() {
        for bad in [
            "",
            "file-",
            "file-x",
            "file-+1",
            "file-4",
            "file-1:",
            "file-1:line-",
            "file-1:line-0",
            "file-1:line-2-",
            "file-1:line-2-3-4",
            "file-1:lines-2",
            "file-1 ",
            "file-99999999999999999999999",
            "line-3",
        ] {
            assert_eq!(decode(bad, 4), None, "{bad:?} should not decode");
        }
    }

    #[test]
    fn encode_omits_redundant_parts() {
        assert_eq!(encode(0, None, Some(9)), "file-0");
        assert_eq!(encode(2, Some(7), None), "file-2:line-7");
        assert_eq!(encode(2, Some(7), Some(7)), "file-2:line-7");
        assert_eq!(Location::file(5).to_string(), "file-5");
    }
}
