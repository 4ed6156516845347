//! Terminal-side UI state for covscope.
//!
//! This module owns what only the terminal cares about: the input mode, which
//! panel has focus, cursors, scroll offsets, viewport heights and the prompt
//! buffer. Everything the explorer core owns (open file, queries, selection,
//! matches) lives in the view controller and reaches the screen through
//! [`crate::surface::TuiSurface`].

use ratatui::layout::Rect;
use ratatui::widgets::ListState;

/// Mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a tree filter query.
    FileFilter,
    /// Typing a content search query.
    ContentSearch,
    /// Typing a location to jump to.
    GoTo,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

impl Mode {
    pub fn is_prompt(self) -> bool {
        matches!(self, Mode::FileFilter | Mode::ContentSearch | Mode::GoTo)
    }
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Tree,
    Code,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Tree => PanelFocus::Code,
            PanelFocus::Code => PanelFocus::Tree,
        }
    }
}

/// All mutable terminal UI state passed through every render cycle.
#[derive(Debug, Default)]
pub struct App {
    pub mode: Mode,
    pub focus: PanelFocus,

    /// Stateful list widget backing the tree panel.
    pub tree_state: ListState,

    /// Zero-based line under the code-panel cursor.
    pub code_cursor: usize,
    /// First visible line of the code panel.
    pub code_scroll: usize,
    /// Line count of the file in the code panel, cached after each render.
    pub code_len: usize,

    /// Inner heights after borders, cached after each render. Used by
    /// half-page moves and centring.
    pub tree_viewport_height: u16,
    pub code_viewport_height: u16,

    /// Outer `[tree, code]` panel rects from the last render, for mouse hits.
    pub panel_rects: [Rect; 2],

    /// Text of the active prompt.
    pub input: String,
    pub help_scroll: u16,
}

impl App {
    /// Moves the focused panel's cursor down by `lines`, given `rows` tree rows.
    pub fn move_down(&mut self, lines: usize, rows: usize) {
        match self.focus {
            PanelFocus::Tree => {
                let next = self.tree_state.selected().map_or(0, |i| i.saturating_add(lines));
                self.select_row(next, rows);
            }
            PanelFocus::Code => {
                self.code_cursor = self
                    .code_cursor
                    .saturating_add(lines)
                    .min(self.code_len.saturating_sub(1));
                self.follow_code_cursor();
            }
        }
    }

    pub fn move_up(&mut self, lines: usize, rows: usize) {
        match self.focus {
            PanelFocus::Tree => {
                let next = self.tree_state.selected().map_or(0, |i| i.saturating_sub(lines));
                self.select_row(next, rows);
            }
            PanelFocus::Code => {
                self.code_cursor = self.code_cursor.saturating_sub(lines);
                self.follow_code_cursor();
            }
        }
    }

    pub fn move_top(&mut self, rows: usize) {
        match self.focus {
            PanelFocus::Tree => self.select_row(0, rows),
            PanelFocus::Code => {
                self.code_cursor = 0;
                self.follow_code_cursor();
            }
        }
    }

    pub fn move_bottom(&mut self, rows: usize) {
        match self.focus {
            PanelFocus::Tree => self.select_row(rows.saturating_sub(1), rows),
            PanelFocus::Code => {
                self.code_cursor = self.code_len.saturating_sub(1);
                self.follow_code_cursor();
            }
        }
    }

    /// Half the focused panel's visible height, at least 1.
    pub fn half_page(&self) -> usize {
        let height = match self.focus {
            PanelFocus::Tree => self.tree_viewport_height,
            PanelFocus::Code => self.code_viewport_height,
        };
        usize::from(height / 2).max(1)
    }

    /// Scrolls the code panel without moving past either end.
    pub fn scroll_code(&mut self, delta: isize) {
        let max = self.code_len.saturating_sub(1);
        self.code_scroll = self.code_scroll.saturating_add_signed(delta).min(max);
    }

    /// Puts zero-based `line` under the cursor at the vertical centre of the
    /// code panel.
    pub fn center_on(&mut self, line: usize) {
        self.code_cursor = line.min(self.code_len.saturating_sub(1));
        let half = usize::from(self.code_viewport_height / 2);
        self.code_scroll = self.code_cursor.saturating_sub(half);
    }

    /// Clamps the tree selection to `rows` entries.
    pub fn select_row(&mut self, idx: usize, rows: usize) {
        if rows == 0 {
            self.tree_state.select(None);
        } else {
            self.tree_state.select(Some(idx.min(rows - 1)));
        }
    }

    /// Keeps the code cursor inside the viewport.
    fn follow_code_cursor(&mut self) {
        let height = usize::from(self.code_viewport_height).max(1);
        if self.code_cursor < self.code_scroll {
            self.code_scroll = self.code_cursor;
        } else if self.code_cursor >= self.code_scroll + height {
            self.code_scroll = self.code_cursor + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_app(len: usize, height: u16) -> App {
        App {
            focus: PanelFocus::Code,
            code_len: len,
            code_viewport_height: height,
            ..App::default()
        }
    }

    #[test]
    fn code_cursor_drags_the_viewport() {
        let mut app = code_app(100, 10);
        app.move_down(12, 0);
        assert_eq!(app.code_cursor, 12);
        assert_eq!(app.code_scroll, 3);
        app.move_up(5, 0);
        assert_eq!(app.code_scroll, 3);
        app.move_bottom(0);
        assert_eq!(app.code_cursor, 99);
        assert_eq!(app.code_scroll, 90);
    }

    #[test]
    fn center_on_clamps_at_the_top() {
        let mut app = code_app(100, 20);
        app.center_on(4);
        assert_eq!(app.code_scroll, 0);
        app.center_on(50);
        assert_eq!(app.code_scroll, 40);
        assert_eq!(app.code_cursor, 50);
    }

    #[test]
    fn tree_selection_is_clamped() {
        let mut app = App::default();
        app.move_down(1, 3);
        assert_eq!(app.tree_state.selected(), Some(0));
        app.move_down(10, 3);
        assert_eq!(app.tree_state.selected(), Some(2));
        app.select_row(5, 0);
        assert_eq!(app.tree_state.selected(), None);
    }
}
