//! Code panel renderer for covscope.
//!
//! Renders the open file using a List widget with manual virtual scrolling.
//! Only lines[code_scroll..code_scroll+viewport_height] are turned into
//! ListItems per frame, so rendering cost follows the viewport, not the file.

use covscope_core::surface::{CodeLine, CodeView, SegmentKind};
use covscope_core::types::LineCoverage;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::{App, PanelFocus};
use crate::highlight::expand_tabs;
use crate::surface::TuiSurface;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the code panel.
///
/// A pending scroll request from the controller is applied first, now that
/// the viewport height is known.
pub fn render_code(frame: &mut Frame, area: Rect, app: &mut App, surface: &mut TuiSurface) {
    let inner = inner_rect(area);
    app.code_viewport_height = inner.height;

    let (title, lines) = match &surface.code {
        CodeView::NoFiles => {
            app.code_len = 0;
            placeholder(frame, area, app, &surface.theme, "Code", "No files in this report");
            return;
        }
        CodeView::Empty { path, .. } => {
            app.code_len = 0;
            placeholder(frame, area, app, &surface.theme, path, "(empty file)");
            return;
        }
        CodeView::Lines { path, lines, .. } => (path.clone(), lines.len()),
    };

    if app.code_len != lines {
        app.code_len = lines;
        app.code_cursor = app.code_cursor.min(lines.saturating_sub(1));
        app.code_scroll = app.code_scroll.min(lines.saturating_sub(1));
    }
    if let Some(line) = surface.take_scroll_request() {
        app.center_on(line.saturating_sub(1) as usize);
    }

    let CodeView::Lines { lines, .. } = &surface.code else {
        return;
    };
    let theme = &surface.theme;
    let is_focused = app.focus == PanelFocus::Code;
    let gutter_width = lines.len().to_string().len();
    let visible_start = app.code_scroll.min(lines.len().saturating_sub(1));
    let visible_end = (visible_start + usize::from(inner.height)).min(lines.len());

    let items: Vec<ListItem> = lines[visible_start..visible_end]
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let idx = visible_start + offset;
            let on_cursor = is_focused && idx == app.code_cursor;
            code_item(line, surface.syntax_line(idx), gutter_width, on_cursor, theme)
        })
        .collect();

    let block = panel_block(title, is_focused, theme);
    frame.render_widget(block, area);
    frame.render_widget(List::new(items), inner);
}

fn placeholder(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, title: &str, msg: &str) {
    let block = panel_block(title.to_owned(), app.focus == PanelFocus::Code, theme);
    frame.render_widget(
        Paragraph::new(Line::styled(msg.to_owned(), Style::default().fg(theme.gutter))).block(block),
        area,
    );
}

/// Builds one row: `  42 ▌+ source text`.
fn code_item(
    line: &CodeLine,
    syntax: Option<&[Span<'static>]>,
    gutter_width: usize,
    on_cursor: bool,
    theme: &Theme,
) -> ListItem<'static> {
    let mut spans = Vec::with_capacity(line.segments.len() + 3);
    spans.push(Span::styled(
        format!("{:>gutter_width$} ", line.number),
        Style::default().fg(theme.gutter),
    ));

    let marker = match line.coverage {
        LineCoverage::Covered => Span::styled("▌", Style::default().fg(theme.marker_covered)),
        LineCoverage::Uncovered => Span::styled("▌", Style::default().fg(theme.marker_uncovered)),
        LineCoverage::NotInstrumented => Span::raw(" "),
    };
    spans.push(marker);
    if let Some(state) = line.diff {
        let (glyph, color) = theme.diff_marker(state);
        spans.push(Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }
    spans.push(Span::raw(" "));

    if line.has_matches() {
        spans.extend(line.segments.iter().map(|seg| {
            let style = match seg.kind {
                SegmentKind::Plain => Style::default().fg(theme.code_fg),
                SegmentKind::Match => Style::default().bg(theme.match_bg).fg(theme.match_fg),
                SegmentKind::CurrentMatch => Style::default()
                    .bg(theme.current_match_bg)
                    .fg(theme.match_fg)
                    .add_modifier(Modifier::BOLD),
            };
            Span::styled(expand_tabs(&seg.text), style)
        }));
    } else if let Some(syntax) = syntax {
        spans.extend(syntax.iter().cloned());
    } else {
        spans.push(Span::styled(expand_tabs(&line.text()), Style::default().fg(theme.code_fg)));
    }

    let bg = if on_cursor {
        Some(theme.cursor_bg)
    } else if line.selected {
        Some(theme.line_selected_bg)
    } else {
        theme.line_bg(line.coverage)
    };
    let row = Line::from(spans);
    match bg {
        Some(bg) => ListItem::new(row).style(Style::default().bg(bg)),
        None => ListItem::new(row),
    }
}
