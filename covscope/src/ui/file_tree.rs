//! Tree panel renderer for covscope.
//!
//! Draws the rows the controller last produced: indentation by depth, an
//! expand marker on directories, the name, and a right-aligned coverage badge
//! coloured by badge class.

use covscope_core::tree::{NodeKind, TreeRow};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{App, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Width of the ` 100%` badge column.
const BADGE_WIDTH: usize = 5;

/// Renders the tree panel using `render_stateful_widget` so the cursor row is
/// highlighted and kept in view.
pub fn render_tree(frame: &mut Frame, area: Rect, app: &mut App, rows: &[TreeRow], filter: &str, theme: &Theme) {
    let is_focused = app.focus == PanelFocus::Tree;
    let files = rows.iter().filter(|r| r.kind == NodeKind::File).count();
    let title = if filter.is_empty() {
        format!("Files ({files})")
    } else {
        format!("Files ({files}) /{filter}")
    };
    let block = panel_block(title, is_focused, theme);
    let width = usize::from(inner_rect(area).width);

    let items: Vec<ListItem> = if rows.is_empty() {
        let msg = if filter.is_empty() { "No files" } else { "No matching files" };
        vec![ListItem::new(Line::raw(msg))]
    } else {
        rows.iter().map(|row| tree_item(row, width, theme)).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.cursor_bg));

    frame.render_stateful_widget(list, area, &mut app.tree_state);
}

/// Converts a row into a styled ListItem.
///
/// Format: `▾ pkg            63%` for directories, `  run.go          80%` for files.
fn tree_item(row: &TreeRow, width: usize, theme: &Theme) -> ListItem<'static> {
    let indent = "  ".repeat(row.depth);
    let (marker, name_style) = match row.kind {
        NodeKind::Dir => (
            if row.expanded { "▾ " } else { "▸ " },
            Style::default().fg(theme.dir_fg).add_modifier(Modifier::BOLD),
        ),
        NodeKind::File if row.selected => (
            "  ",
            Style::default().fg(theme.open_file_fg).add_modifier(Modifier::BOLD),
        ),
        NodeKind::File => ("  ", Style::default().fg(theme.file_fg)),
    };

    let used = indent.chars().count() + marker.chars().count() + BADGE_WIDTH;
    let room = width.saturating_sub(used + 1);
    let label = truncate_label(&row.label, room);
    let pad = room.saturating_sub(label.chars().count()) + 1;

    ListItem::new(Line::from(vec![
        Span::raw(format!("{indent}{marker}")),
        Span::styled(label, name_style),
        Span::raw(" ".repeat(pad)),
        coverage_badge(row.coverage, theme),
    ]))
}

/// Whole-percent badge. The colour is picked from the shown number so the text
/// and its class always agree.
fn coverage_badge(coverage: f64, theme: &Theme) -> Span<'static> {
    let shown = coverage.round();
    Span::styled(format!("{shown:>4.0}%"), Style::default().fg(theme.badge(shown)))
}

/// Shortens `label` to `max` characters, marking the cut with `…`.
fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_owned();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = label.chars().take(max - 1).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_cut_on_char_boundaries() {
        assert_eq!(truncate_label("données.rs", 5), "donn…");
        assert_eq!(truncate_label("a.rs", 10), "a.rs");
        assert_eq!(truncate_label("a.rs", 0), "");
    }

    #[test]
    fn badge_colour_matches_the_rounded_text() {
        let theme = Theme::dark();

        let near_low = coverage_badge(39.6, &theme);
        assert_eq!(near_low.content, " 40%");
        assert_eq!(near_low.style.fg, Some(theme.badge_low));

        let near_high = coverage_badge(69.6, &theme);
        assert_eq!(near_high.content, " 70%");
        assert_eq!(near_high.style.fg, Some(theme.badge_high));

        let full = coverage_badge(100.0, &theme);
        assert_eq!(full.content, "100%");
        assert_eq!(full.style.fg, Some(theme.badge_high));
    }
}
