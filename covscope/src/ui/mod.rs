//! UI rendering module for covscope.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; the
//! tree and code panels live in `file_tree.rs` and `code_view.rs`.

pub mod code_view;
pub mod file_tree;
pub mod help;
pub mod keybindings;
pub mod layout;

use ratatui::Frame;

use crate::app::{App, Mode};
use crate::surface::TuiSurface;
use layout::{compute_layout, inner_rect, render_header, render_prompt, render_status_bar};

/// Renders one complete frame from what the controller last pushed into
/// `surface`.
///
/// Viewport heights and panel rects are written back into `app` so the next
/// keypress or mouse click sees the current geometry.
pub fn render(frame: &mut Frame, app: &mut App, surface: &mut TuiSurface) {
    let areas = compute_layout(frame, app);

    app.tree_viewport_height = inner_rect(areas.tree).height;
    app.panel_rects = [areas.tree, areas.code];
    sync_tree_selection(app, surface);

    render_header(
        frame,
        areas.header,
        &surface.summary,
        surface.diff_summary.as_ref(),
        &surface.code,
        &surface.theme,
    );

    let filter = surface.status.as_ref().map(|s| s.file_query.as_str()).unwrap_or("");
    file_tree::render_tree(frame, areas.tree, app, &surface.rows, filter, &surface.theme);
    code_view::render_code(frame, areas.code, app, surface);

    render_status_bar(frame, areas.status, app, surface.status.as_ref(), &surface.theme);
    render_prompt(frame, areas.prompt, app, &surface.theme);

    if app.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, &surface.theme, app.help_scroll);
    }
}

/// Puts the tree cursor on the open file the first time there are rows, and
/// keeps it inside the row list after filtering shrinks it.
fn sync_tree_selection(app: &mut App, surface: &TuiSurface) {
    let rows = surface.rows.len();
    match app.tree_state.selected() {
        Some(idx) => app.select_row(idx, rows),
        None if rows > 0 => {
            let open = surface.rows.iter().position(|r| r.selected).unwrap_or(0);
            app.select_row(open, rows);
        }
        None => {}
    }
}
