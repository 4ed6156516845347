//! Line-range selection within the open file.

/// An inclusive, ordered range of one-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Builds a range from two endpoints in either order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn contains(&self, line: u32) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Anchor line plus active range. Reset whenever another file is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSelection {
    anchor: Option<u32>,
    range: Option<LineRange>,
}

impl LineSelection {
    /// Plain click: anchor and range both move to `line`.
    pub fn click(&mut self, line: u32) -> LineRange {
        let range = LineRange::single(line);
        self.anchor = Some(line);
        self.range = Some(range);
        range
    }

    /// Shift-click: the range spans anchor to `line`; the anchor stays put.
    ///
    /// Without an anchor this behaves like [`Self::click`].
    pub fn extend(&mut self, line: u32) -> LineRange {
        let Some(anchor) = self.anchor else {
            return self.click(line);
        };
        let range = LineRange::new(anchor, line);
        self.range = Some(range);
        range
    }

    /// Applies a range arriving from a location string. The anchor becomes
    /// `start` so a later shift-click extends from the link's first line.
    pub fn apply(&mut self, start: u32, end: Option<u32>) -> LineRange {
        let range = LineRange::new(start, end.unwrap_or(start));
        self.anchor = Some(start);
        self.range = Some(range);
        range
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.range = None;
    }

    pub fn anchor(&self) -> Option<u32> {
        self.anchor
    }

    pub fn range(&self) -> Option<LineRange> {
        self.range
    }

    pub fn is_selected(&self, line: u32) -> bool {
        self.range.is_some_and(|r| r.contains(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_click_spans_from_anchor_without_moving_it() {
        let mut sel = LineSelection::default();
        sel.click(5);
        assert_eq!(sel.extend(3), LineRange { start: 3, end: 5 });
        assert_eq!(sel.anchor(), Some(5));
        assert_eq!(sel.extend(9), LineRange { start: 5, end: 9 });
        assert!(sel.is_selected(7));
        assert!(!sel.is_selected(4));
    }

    #[test]
    fn extend_without_anchor_acts_as_click() {
        let mut sel = LineSelection::default();
        assert_eq!(sel.extend(4), LineRange::single(4));
        assert_eq!(sel.anchor(), Some(4));
    }

    #[test]
    fn applied_link_sets_anchor_to_its_start() {
        let mut sel = LineSelection::default();
        sel.click(100);
        assert_eq!(sel.apply(5, Some(3)), LineRange { start: 3, end: 5 });
        assert_eq!(sel.anchor(), Some(5));
        assert_eq!(sel.extend(8), LineRange { start: 5, end: 8 });
    }

    #[test]
    fn clear_drops_anchor_and_range() {
        let mut sel = LineSelection::default();
        sel.click(2);
        sel.clear();
        assert_eq!(sel, LineSelection::default());
    }
}
