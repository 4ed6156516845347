//! Layout engine for covscope.
//!
//! This module is pure layout arithmetic plus the one-row bars (header, status,
//! prompt). It is called inside `terminal.draw()` on every render so every frame
//! gets a fresh layout that automatically reflects the current terminal size.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes the tree and code panel borders share a single column.

use covscope_core::surface::{CodeView, StatusLine};
use covscope_core::types::{DiffSummary, Summary};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{App, Mode};
use crate::theme::Theme;

/// Screen regions of one frame.
pub struct Areas {
    pub header: Rect,
    pub tree: Rect,
    pub code: Rect,
    pub status: Rect,
    /// Zero-height unless a prompt is open.
    pub prompt: Rect,
}

/// Splits the frame into header, tree, code, status and prompt rows.
///
/// Below 80 columns the tree gets a fixed 24 columns; otherwise it takes 30%.
pub fn compute_layout(frame: &Frame, app: &App) -> Areas {
    let prompt_height = if app.mode.is_prompt() { 1 } else { 0 };
    let [header, main_area, status, prompt] = frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(prompt_height),
    ]));

    let tree_width = if frame.area().width >= 80 {
        Constraint::Percentage(30)
    } else {
        Constraint::Length(24)
    };
    let [tree, code] = main_area
        .layout(&Layout::horizontal([tree_width, Constraint::Fill(1)]).spacing(Spacing::Overlap(1)));

    Areas { header, tree, code, status, prompt }
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Applies `BorderType::Thick` when the panel is focused and `BorderType::Plain`
/// otherwise. `MergeStrategy::Fuzzy` keeps the shared column's junctions
/// correct when one side is thick and the other plain.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Formats the report-wide coverage line shown in the header.
pub fn summary_text(summary: &Summary, diff: Option<&DiffSummary>) -> String {
    let mut text = format!(
        "Coverage {:.1}%  ({}/{} lines)",
        summary.percent, summary.covered_lines, summary.total_lines
    );
    if let Some(d) = diff {
        text.push_str(&format!(
            "  |  {:+.1}% vs base {:.1}%  +{} covered  -{} uncovered",
            d.delta_percent, d.base_percent, d.newly_covered_lines, d.newly_uncovered_lines
        ));
    }
    text
}

/// Badge style for the summary, classified from the one-decimal value shown.
fn summary_style(percent: f64, theme: &Theme) -> Style {
    let shown = (percent * 10.0).round() / 10.0;
    Style::default().fg(theme.badge(shown)).add_modifier(Modifier::BOLD)
}

/// Renders the header: report summary, then the open file's path.
pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    summary: &Summary,
    diff: Option<&DiffSummary>,
    code: &CodeView,
    theme: &Theme,
) {
    let badge = summary_style(summary.percent, theme);
    let mut spans = vec![
        Span::styled(" covscope ", Style::default().fg(theme.status_mode_normal).add_modifier(Modifier::BOLD)),
        Span::styled(summary_text(summary, diff), badge),
    ];
    if let CodeView::Lines { path, .. } | CodeView::Empty { path, .. } = code {
        spans.push(Span::styled(format!("  {path}"), Style::default().fg(theme.header_fg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Shows the mode, the shareable location, the match counter and the current
/// sort, syntax and filter settings.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, status: Option<&StatusLine>, theme: &Theme) {
    let (mode_text, mode_fg) = match app.mode {
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
        Mode::FileFilter => (" FILTER ", theme.status_mode_input),
        Mode::ContentSearch => (" SEARCH ", theme.status_mode_input),
        Mode::GoTo => (" GO TO ", theme.status_mode_input),
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = status {
        if let Some(location) = &status.location {
            spans.push(Span::raw(format!(" #{location} ")));
        }
        let matches = status.matches.to_string();
        if !matches.is_empty() {
            spans.push(Span::styled(format!(" [{matches}] "), Style::default().add_modifier(Modifier::BOLD)));
        }
        spans.push(Span::raw(format!(
            " sort:{}  syntax:{} ",
            status.sort_mode.as_pref(),
            if status.syntax_enabled { "on" } else { "off" },
        )));
        if !status.file_query.is_empty() {
            spans.push(Span::raw(format!(" filter:{} ", status.file_query)));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

/// Renders the prompt row for the filter, search and go-to modes.
pub fn render_prompt(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let label = match app.mode {
        Mode::FileFilter => "filter: ",
        Mode::ContentSearch => "search: ",
        Mode::GoTo => "go to: ",
        Mode::Normal | Mode::HelpOverlay => return,
    };
    let line = Line::from(vec![
        Span::styled(label, Style::default().fg(theme.status_mode_input)),
        Span::raw(app.input.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
