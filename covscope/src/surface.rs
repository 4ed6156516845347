//! The terminal's [`RenderSurface`].
//!
//! The controller pushes finished view data in here; the draw closure reads it
//! back on the next `Render` event. Scroll requests are parked until the draw
//! knows the viewport height.

use covscope_core::state::ThemeMode;
use covscope_core::surface::{CodeView, RenderSurface, StatusLine};
use covscope_core::tree::TreeRow;
use covscope_core::types::{DiffSummary, FileId, Summary};
use ratatui::text::Span;

use crate::highlight;
use crate::theme::Theme;

/// Syntax spans for one file under one syntect theme.
struct HighlightCache {
    file_id: FileId,
    syntax_theme: &'static str,
    lines: Vec<Vec<Span<'static>>>,
}

pub struct TuiSurface {
    pub summary: Summary,
    pub diff_summary: Option<DiffSummary>,
    pub rows: Vec<TreeRow>,
    pub code: CodeView,
    pub status: Option<StatusLine>,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    pub(crate) scroll_request: Option<u32>,
    pub(crate) highlight: Option<HighlightCache>,
}

impl Default for TuiSurface {
    fn default() -> Self {
        Self {
            summary: Summary::default(),
            diff_summary: None,
            rows: Vec::new(),
            code: CodeView::NoFiles,
            status: None,
            theme_mode: ThemeMode::Dark,
            theme: Theme::dark(),
            scroll_request: None,
            highlight: None,
        }
    }
}

impl TuiSurface {
    /// Takes the pending centre-on-line request, if any.
    pub fn take_scroll_request(&mut self) -> Option<u32> {
        self.scroll_request.take()
    }

    /// Syntax spans for zero-based `idx` of the current file, when syntax
    /// colouring is on and the file was highlighted.
    pub fn syntax_line(&self, idx: usize) -> Option<&[Span<'static>]> {
        let CodeView::Lines { file_id, syntax: true, .. } = &self.code else {
            return None;
        };
        let cache = self.highlight.as_ref()?;
        if cache.file_id != *file_id || cache.syntax_theme != self.theme.syntax_theme {
            return None;
        }
        cache.lines.get(idx).map(Vec::as_slice)
    }

    /// Re-highlights the current file when its cache entry is stale.
    fn refresh_highlight(&mut self) {
        let CodeView::Lines { file_id, path, syntax: true, lines } = &self.code else {
            return;
        };
        let fresh = self
            .highlight
            .as_ref()
            .is_some_and(|c| c.file_id == *file_id && c.syntax_theme == self.theme.syntax_theme);
        if fresh {
            return;
        }
        let text: Vec<String> = lines.iter().map(|l| l.text()).collect();
        self.highlight = highlight::highlight_file(path, &text, self.theme.syntax_theme).map(|spans| {
            HighlightCache {
                file_id: *file_id,
                syntax_theme: self.theme.syntax_theme,
                lines: spans,
            }
        });
        if self.highlight.is_none() {
            tracing::warn!(theme = self.theme.syntax_theme, "syntect theme not found");
        }
    }
}

impl RenderSurface for TuiSurface {
    fn render_summary(&mut self, summary: &Summary, diff: Option<&DiffSummary>) {
        self.summary = summary.clone();
        self.diff_summary = diff.cloned();
    }

    fn render_tree(&mut self, rows: &[TreeRow]) {
        self.rows = rows.to_vec();
    }

    fn render_code(&mut self, view: &CodeView) {
        self.code = view.clone();
        self.refresh_highlight();
    }

    fn render_status(&mut self, status: &StatusLine) {
        self.status = Some(status.clone());
    }

    fn apply_theme(&mut self, theme: ThemeMode) {
        self.theme_mode = theme;
        self.theme = Theme::for_mode(theme);
        self.refresh_highlight();
    }

    fn scroll_to_center(&mut self, line: u32) {
        self.scroll_request = Some(line);
    }
}
