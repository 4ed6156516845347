//! Keybinding dispatcher for covscope.
//!
//! Translates raw crossterm key and mouse events into [`App`] mutations and
//! returns a [`KeyAction`] telling the event loop what to forward to the view
//! controller. The dispatcher branches first on `app.mode` so that each prompt
//! and the help overlay have isolated handler functions.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use covscope_core::controller::ViewInput;
use covscope_core::surface::CodeView;
use covscope_core::tree::{NodeKind, RowTarget};
use ratatui::layout::Position;

use crate::app::{App, Mode, PanelFocus};
use crate::surface::TuiSurface;
use crate::ui::layout::inner_rect;

/// What the event loop does after a key or mouse event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Only terminal-side state changed.
    Continue,
    /// Forward this input to the view controller.
    View(ViewInput),
    /// Step the location history back.
    HistoryBack,
    /// Step the location history forward.
    HistoryForward,
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, app: &mut App, surface: &TuiSurface, now: Instant) -> KeyAction {
    match app.mode {
        Mode::HelpOverlay => handle_help(key, app),
        Mode::FileFilter | Mode::ContentSearch | Mode::GoTo => handle_prompt(key, app, now),
        Mode::Normal => handle_normal(key, app, surface),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, app: &mut App, surface: &TuiSurface) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let rows = surface.rows.len();

    match key.code {
        // Cursor movement in the focused panel
        KeyCode::Char('j') | KeyCode::Down => { app.move_down(1, rows); KeyAction::Continue }
        KeyCode::Char('k') | KeyCode::Up => { app.move_up(1, rows); KeyAction::Continue }
        KeyCode::Char('g') => { app.move_top(rows); KeyAction::Continue }
        KeyCode::Char('G') => { app.move_bottom(rows); KeyAction::Continue }
        KeyCode::Char('d') if ctrl => {
            app.move_down(app.half_page(), rows);
            KeyAction::Continue
        }
        KeyCode::Char('u') if ctrl => {
            app.move_up(app.half_page(), rows);
            KeyAction::Continue
        }
        KeyCode::Tab => {
            app.focus = app.focus.toggle();
            KeyAction::Continue
        }

        // Prompts
        KeyCode::Char('p') if ctrl => open_prompt(app, Mode::FileFilter, surface),
        KeyCode::Char('f') if ctrl => open_prompt(app, Mode::ContentSearch, surface),
        KeyCode::Char('/') => open_prompt(app, Mode::FileFilter, surface),
        KeyCode::Char(':') => open_prompt(app, Mode::GoTo, surface),

        // Location history
        KeyCode::Left if alt => KeyAction::HistoryBack,
        KeyCode::Right if alt => KeyAction::HistoryForward,
        KeyCode::Char('[') => KeyAction::HistoryBack,
        KeyCode::Char(']') => KeyAction::HistoryForward,

        // Matches
        KeyCode::Char('n') => KeyAction::View(ViewInput::NextMatch),
        KeyCode::Char('N') => KeyAction::View(ViewInput::PreviousMatch),

        // Toggles
        KeyCode::Char('s') => KeyAction::View(ViewInput::ToggleSort),
        KeyCode::Char('t') => KeyAction::View(ViewInput::ToggleTheme),
        KeyCode::Char('y') => KeyAction::View(ViewInput::ToggleSyntax),

        KeyCode::Char('?') => {
            app.help_scroll = 0;
            app.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        _ => match app.focus {
            PanelFocus::Tree => handle_tree_key(key, app, surface),
            PanelFocus::Code => handle_code_key(key, app),
        },
    }
}

/// Tree-panel keys: Enter / l activate the row, h collapses or climbs.
fn handle_tree_key(key: KeyEvent, app: &mut App, surface: &TuiSurface) -> KeyAction {
    let Some(idx) = app.tree_state.selected() else {
        return KeyAction::Continue;
    };
    let Some(row) = surface.rows.get(idx) else {
        return KeyAction::Continue;
    };

    match key.code {
        KeyCode::Enter | KeyCode::Char('l') => activate_row(app, surface, idx),
        KeyCode::Char('h') => {
            if row.kind == NodeKind::Dir && row.expanded {
                if let RowTarget::Dir(path) = &row.target {
                    return KeyAction::View(ViewInput::ToggleDir(path.clone()));
                }
            }
            // Climb to the parent directory row.
            if let Some(parent) = surface.rows[..idx].iter().rposition(|r| r.depth < row.depth) {
                app.select_row(parent, surface.rows.len());
            }
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn activate_row(app: &mut App, surface: &TuiSurface, idx: usize) -> KeyAction {
    app.select_row(idx, surface.rows.len());
    match surface.rows.get(idx).map(|r| &r.target) {
        Some(RowTarget::File(file_id)) => {
            app.focus = PanelFocus::Code;
            KeyAction::View(ViewInput::OpenFile(*file_id))
        }
        Some(RowTarget::Dir(path)) => KeyAction::View(ViewInput::ToggleDir(path.clone())),
        None => KeyAction::Continue,
    }
}

/// Code-panel keys: Space selects the cursor line, V extends to it.
fn handle_code_key(key: KeyEvent, app: &mut App) -> KeyAction {
    if app.code_len == 0 {
        return KeyAction::Continue;
    }
    let line = app.code_cursor as u32 + 1;
    match key.code {
        KeyCode::Char(' ') => KeyAction::View(ViewInput::LineClicked { line, extend: false }),
        KeyCode::Char('V') => KeyAction::View(ViewInput::LineClicked { line, extend: true }),
        _ => KeyAction::Continue,
    }
}

/// Enters a prompt mode, seeding the buffer with the query already in effect.
fn open_prompt(app: &mut App, mode: Mode, surface: &TuiSurface) -> KeyAction {
    app.input = match (mode, &surface.status) {
        (Mode::FileFilter, Some(status)) => status.file_query.clone(),
        (Mode::ContentSearch, Some(status)) => status.content_query.clone(),
        _ => String::new(),
    };
    app.mode = mode;
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Prompt modes
// ---------------------------------------------------------------------------

/// Handles typing into the filter, search and go-to prompts.
///
/// Filter and search edits are forwarded on every keystroke; the controller
/// debounces them. Esc leaves the prompt and keeps whatever query is in effect.
fn handle_prompt(key: KeyEvent, app: &mut App, now: Instant) -> KeyAction {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => match app.mode {
            Mode::ContentSearch if shift => KeyAction::View(ViewInput::PreviousMatch),
            Mode::ContentSearch => KeyAction::View(ViewInput::NextMatch),
            Mode::GoTo => {
                app.mode = Mode::Normal;
                let raw = std::mem::take(&mut app.input);
                KeyAction::View(ViewInput::FollowLocation(raw))
            }
            _ => {
                app.mode = Mode::Normal;
                KeyAction::Continue
            }
        },
        KeyCode::Backspace => {
            app.input.pop();
            edited(app, now)
        }
        KeyCode::Char('u') if ctrl => {
            app.input.clear();
            edited(app, now)
        }
        KeyCode::Char(c) if !ctrl => {
            app.input.push(c);
            edited(app, now)
        }
        _ => KeyAction::Continue,
    }
}

fn edited(app: &App, now: Instant) -> KeyAction {
    let query = app.input.clone();
    match app.mode {
        Mode::FileFilter => KeyAction::View(ViewInput::FileQueryEdited { query, at: now }),
        Mode::ContentSearch => KeyAction::View(ViewInput::ContentQueryEdited { query, at: now }),
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, app: &mut App) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            app.help_scroll = app.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            app.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: clicks on tree rows and code lines, and the wheel.
///
/// A left click on a tree row focuses the tree and activates the row. A left
/// click on a code line selects that line; with Shift held it extends the
/// selection. The wheel scrolls whichever panel is under the pointer.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App, surface: &TuiSurface) -> KeyAction {
    let pos = Position { x: mouse.column, y: mouse.row };
    let [tree, code] = app.panel_rects;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.mode == Mode::Normal => {
            let tree_inner = inner_rect(tree);
            let code_inner = inner_rect(code);
            if tree_inner.contains(pos) {
                app.focus = PanelFocus::Tree;
                let idx = app.tree_state.offset() + usize::from(pos.y - tree_inner.y);
                if idx < surface.rows.len() {
                    return activate_row(app, surface, idx);
                }
            } else if code_inner.contains(pos) {
                app.focus = PanelFocus::Code;
                let idx = app.code_scroll + usize::from(pos.y - code_inner.y);
                if idx < app.code_len && matches!(surface.code, CodeView::Lines { .. }) {
                    app.code_cursor = idx;
                    let extend = mouse.modifiers.contains(KeyModifiers::SHIFT);
                    return KeyAction::View(ViewInput::LineClicked { line: idx as u32 + 1, extend });
                }
            }
            KeyAction::Continue
        }
        MouseEventKind::ScrollUp => scroll_wheel(app, pos, -3),
        MouseEventKind::ScrollDown => scroll_wheel(app, pos, 3),
        _ => KeyAction::Continue,
    }
}

fn scroll_wheel(app: &mut App, pos: Position, delta: isize) -> KeyAction {
    if app.mode == Mode::HelpOverlay {
        app.help_scroll = app.help_scroll.saturating_add_signed(delta as i16);
        return KeyAction::Continue;
    }
    let [tree, _] = app.panel_rects;
    if tree.contains(pos) {
        let offset = app.tree_state.offset_mut();
        *offset = offset.saturating_add_signed(delta);
    } else {
        app.scroll_code(delta);
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use covscope_core::tree::{NodePath, TreeRow};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn row(label: &str, depth: usize, target: RowTarget, expanded: bool) -> TreeRow {
        TreeRow {
            depth,
            label: label.into(),
            kind: match target {
                RowTarget::Dir(_) => NodeKind::Dir,
                RowTarget::File(_) => NodeKind::File,
            },
            expanded,
            coverage: 50.0,
            target,
            selected: false,
        }
    }

    fn surface() -> TuiSurface {
        let src = NodePath::root().child("src");
        TuiSurface {
            rows: vec![
                row("src", 0, RowTarget::Dir(src), true),
                row("lib.rs", 1, RowTarget::File(0), false),
                row("main.rs", 1, RowTarget::File(1), false),
            ],
            ..TuiSurface::default()
        }
    }

    #[test]
    fn enter_on_file_row_opens_it_and_focuses_code() {
        let surface = surface();
        let mut app = App::default();
        app.select_row(2, 3);
        let action = handle_key(key(KeyCode::Enter), &mut app, &surface, Instant::now());
        assert_eq!(action, KeyAction::View(ViewInput::OpenFile(1)));
        assert_eq!(app.focus, PanelFocus::Code);
    }

    #[test]
    fn h_collapses_an_expanded_dir_and_climbs_from_a_file() {
        let surface = surface();
        let mut app = App::default();
        app.select_row(2, 3);
        assert_eq!(handle_key(key(KeyCode::Char('h')), &mut app, &surface, Instant::now()), KeyAction::Continue);
        assert_eq!(app.tree_state.selected(), Some(0));

        let action = handle_key(key(KeyCode::Char('h')), &mut app, &surface, Instant::now());
        assert_eq!(action, KeyAction::View(ViewInput::ToggleDir(NodePath::root().child("src"))));
    }

    #[test]
    fn space_and_v_click_the_cursor_line() {
        let surface = surface();
        let mut app = App {
            focus: PanelFocus::Code,
            code_len: 10,
            code_cursor: 4,
            ..App::default()
        };
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), &mut app, &surface, Instant::now()),
            KeyAction::View(ViewInput::LineClicked { line: 5, extend: false })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('V')), &mut app, &surface, Instant::now()),
            KeyAction::View(ViewInput::LineClicked { line: 5, extend: true })
        );
    }

    #[test]
    fn prompt_keystrokes_forward_the_whole_query() {
        let surface = surface();
        let mut app = App::default();
        let now = Instant::now();
        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);
        handle_key(ctrl_f, &mut app, &surface, now);
        assert_eq!(app.mode, Mode::ContentSearch);

        handle_key(key(KeyCode::Char('f')), &mut app, &surface, now);
        let action = handle_key(key(KeyCode::Char('n')), &mut app, &surface, now);
        assert_eq!(action, KeyAction::View(ViewInput::ContentQueryEdited { query: "fn".into(), at: now }));

        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut app, &surface, now),
            KeyAction::View(ViewInput::NextMatch)
        );
        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(
            handle_key(shift_enter, &mut app, &surface, now),
            KeyAction::View(ViewInput::PreviousMatch)
        );
        handle_key(key(KeyCode::Esc), &mut app, &surface, now);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn go_to_prompt_follows_on_enter() {
        let surface = surface();
        let mut app = App::default();
        let now = Instant::now();
        handle_key(key(KeyCode::Char(':')), &mut app, &surface, now);
        for c in "file-1:line-4".chars() {
            assert_eq!(handle_key(key(KeyCode::Char(c)), &mut app, &surface, now), KeyAction::Continue);
        }
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut app, &surface, now),
            KeyAction::View(ViewInput::FollowLocation("file-1:line-4".into()))
        );
        assert!(app.input.is_empty());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn history_and_quit_keys() {
        let surface = surface();
        let mut app = App::default();
        let now = Instant::now();
        let alt_left = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(handle_key(alt_left, &mut app, &surface, now), KeyAction::HistoryBack);
        assert_eq!(handle_key(key(KeyCode::Char(']')), &mut app, &surface, now), KeyAction::HistoryForward);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut app, &surface, now), KeyAction::Quit);
    }

    #[test]
    fn shift_click_on_code_extends_selection() {
        let surface = TuiSurface {
            code: CodeView::Lines { file_id: 0, path: "a.rs".into(), syntax: false, lines: Vec::new() },
            ..surface()
        };
        let mut app = App {
            code_len: 50,
            code_scroll: 10,
            panel_rects: [Rect::new(0, 1, 20, 20), Rect::new(20, 1, 60, 20)],
            ..App::default()
        };
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 30,
            row: 5,
            modifiers: KeyModifiers::SHIFT,
        };
        // Inner area starts one row below the border at y = 2.
        assert_eq!(
            handle_mouse(click, &mut app, &surface),
            KeyAction::View(ViewInput::LineClicked { line: 14, extend: true })
        );
        assert_eq!(app.focus, PanelFocus::Code);
    }
}
