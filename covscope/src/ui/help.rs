//! Help overlay renderer for covscope.
//!
//! Draws a centred modal over the panels. `Clear` erases the background first,
//! inside the same `terminal.draw()` closure as every other panel.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped below 60 columns, where the modal would collapse to nothing.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help (j/k scroll, ? or Esc to close) ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let heading = |s: &'static str| Line::styled(s, Style::default().fg(theme.header_fg).add_modifier(Modifier::BOLD));
    Text::from(vec![
        heading("Navigation"),
        Line::from("  j / k         Move down / up"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  Tab           Switch between tree and code"),
        Line::from("  [ / ]         Back / forward in location history"),
        Line::from(""),
        heading("Tree"),
        Line::from("  Enter / l     Open file, or expand / collapse directory"),
        Line::from("  h             Collapse directory, or go to parent"),
        Line::from("  / or Ctrl-p   Filter files by path"),
        Line::from("  s             Toggle sort: name / coverage"),
        Line::from(""),
        heading("Code"),
        Line::from("  Ctrl-f        Search in the open file"),
        Line::from("  n / N         Next / previous match"),
        Line::from("  Space         Select the line under the cursor"),
        Line::from("  V             Extend the selection to the cursor"),
        Line::from("  :             Go to a location, e.g. file-3:line-10-20"),
        Line::from(""),
        heading("Display"),
        Line::from("  t             Toggle light / dark theme"),
        Line::from("  y             Toggle syntax colouring"),
        Line::from(""),
        heading("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Esc       Quit"),
    ])
}
