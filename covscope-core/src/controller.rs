//! Composition root of the explorer core.
//!
//! [`ViewController`] owns every piece of session state and is driven one
//! [`ViewInput`] at a time. After each input it refreshes only the surfaces
//! whose content changed.

use std::time::Instant;

use crate::coverage::{CoverageStatistic, MeanOfChildren};
use crate::debounce::{Debouncer, InputSource, Trigger};
use crate::history::LocationHost;
use crate::link::{self, Location};
use crate::prefs::{self, PreferenceStore};
use crate::search::MatchIndex;
use crate::selection::LineSelection;
use crate::state::{ViewDefaults, ViewState};
use crate::surface::{build_segments, CodeLine, CodeView, RenderSurface, StatusLine};
use crate::tree::{initial_expanded, sort_tree, NodePath, TreeRenderer, TreeRow};
use crate::types::{FileId, ReportData, TreeNode};

/// One external event.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewInput {
    /// A file row was activated in the tree.
    OpenFile(FileId),
    ToggleDir(NodePath),
    /// A keystroke changed the tree filter text.
    FileQueryEdited { query: String, at: Instant },
    /// A keystroke changed the content search text.
    ContentQueryEdited { query: String, at: Instant },
    /// Clock heartbeat; fires debounced queries whose quiet period elapsed.
    Tick(Instant),
    NextMatch,
    PreviousMatch,
    ToggleSort,
    ToggleTheme,
    ToggleSyntax,
    /// A one-based line number was clicked, `extend` when shift was held.
    LineClicked { line: u32, extend: bool },
    /// The user asked to navigate to a typed location string.
    FollowLocation(String),
    /// The host location changed underneath us (back/forward).
    LocationChanged,
}

pub struct ViewController<S, L, P> {
    report: ReportData,
    stats: Box<dyn CoverageStatistic>,
    sorted: TreeNode,
    state: ViewState,
    selection: LineSelection,
    matches: MatchIndex,
    debouncer: Debouncer,
    surface: S,
    location: L,
    prefs: P,
}

impl<S, L, P> ViewController<S, L, P>
where
    S: RenderSurface,
    L: LocationHost,
    P: PreferenceStore,
{
    /// Builds the controller. Nothing is rendered until [`Self::start`].
    pub fn new(report: ReportData, defaults: ViewDefaults, surface: S, location: L, prefs: P) -> Self {
        let stats: Box<dyn CoverageStatistic> = Box::new(MeanOfChildren::new(&report.files));
        let state = ViewState::load(defaults, &prefs, initial_expanded(&report.tree));
        let sorted = sort_tree(&report.tree, state.sort_mode, stats.as_ref());
        Self {
            report,
            stats,
            sorted,
            state,
            selection: LineSelection::default(),
            matches: MatchIndex::new(),
            debouncer: Debouncer::default(),
            surface,
            location,
            prefs,
        }
    }

    /// Replaces the coverage policy used for badges and coverage ordering.
    pub fn with_statistic(mut self, stats: Box<dyn CoverageStatistic>) -> Self {
        self.stats = stats;
        self.resort();
        self
    }

    /// Initial full render: theme, summary, then the file named by the host
    /// location (or the first file), tree and status line.
    pub fn start(&mut self) {
        tracing::info!(
            files = self.report.files.len(),
            sort = self.state.sort_mode.as_pref(),
            theme = self.state.theme.as_pref(),
            "view controller starting"
        );
        self.surface.apply_theme(self.state.theme);
        self.surface
            .render_summary(&self.report.summary, self.report.diff_summary.as_ref());
        self.sync_from_location();
    }

    pub fn handle(&mut self, input: ViewInput) {
        tracing::trace!(?input, "view input");
        match input {
            ViewInput::OpenFile(file_id) => self.open_file(file_id),
            ViewInput::ToggleDir(path) => {
                let expanded = self.state.toggle_dir(path);
                tracing::debug!(expanded, "directory toggled");
                self.render_tree();
            }
            ViewInput::FileQueryEdited { query, at } => self.edit_query(InputSource::FileFilter, query, at),
            ViewInput::ContentQueryEdited { query, at } => self.edit_query(InputSource::ContentSearch, query, at),
            ViewInput::Tick(now) => {
                for trigger in self.debouncer.take_due(now) {
                    self.fire(trigger);
                }
            }
            ViewInput::NextMatch => {
                if self.matches.next().is_some() {
                    self.after_match_move();
                }
            }
            ViewInput::PreviousMatch => {
                if self.matches.previous().is_some() {
                    self.after_match_move();
                }
            }
            ViewInput::ToggleSort => {
                self.state.sort_mode = self.state.sort_mode.toggle();
                self.prefs.set(prefs::SORT_MODE_KEY, self.state.sort_mode.as_pref());
                self.resort();
                self.render_tree();
                self.render_status();
            }
            ViewInput::ToggleTheme => {
                self.state.theme = self.state.theme.toggle();
                self.prefs.set(prefs::THEME_KEY, self.state.theme.as_pref());
                self.surface.apply_theme(self.state.theme);
            }
            ViewInput::ToggleSyntax => {
                self.state.syntax_enabled = !self.state.syntax_enabled;
                self.prefs
                    .set(prefs::SYNTAX_KEY, prefs::syntax_as_pref(self.state.syntax_enabled));
                self.render_code();
                self.render_status();
            }
            ViewInput::LineClicked { line, extend } => self.click_line(line, extend),
            ViewInput::FollowLocation(raw) => {
                match link::decode(raw.trim(), self.report.files.len()) {
                    Some(location) => {
                        self.location.push(&location.to_string());
                        self.sync_from_location();
                    }
                    None => tracing::debug!(location = %raw, "ignoring malformed go-to location"),
                }
            }
            ViewInput::LocationChanged => self.sync_from_location(),
        }
    }

    pub fn report(&self) -> &ReportData {
        &self.report
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn selection(&self) -> &LineSelection {
        &self.selection
    }

    pub fn matches(&self) -> &MatchIndex {
        &self.matches
    }

    pub fn sorted_tree(&self) -> &TreeNode {
        &self.sorted
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Mutable host access, for back/forward. Follow any change with
    /// [`ViewInput::LocationChanged`].
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn current_location(&self) -> Option<String> {
        self.location.current()
    }

    /// Earliest instant at which a debounced query becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// The visible tree rows for the current state.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let query = self.state.file_query.to_lowercase();
        TreeRenderer {
            files: &self.report.files,
            stats: self.stats.as_ref(),
            expanded: &self.state.expanded,
            query: &query,
            current_file: self.state.current_file,
        }
        .rows(&self.sorted)
    }

    pub fn code_view(&self) -> CodeView {
        let Some(file_id) = self.state.current_file else {
            return CodeView::NoFiles;
        };
        let Some(file) = self.report.files.get(file_id) else {
            return CodeView::NoFiles;
        };
        if file.lines.is_empty() {
            return CodeView::Empty {
                file_id,
                path: file.path.clone(),
            };
        }

        let current = self.matches.current_index();
        let lines = file
            .lines
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                let number = idx as u32 + 1;
                let (first, on_line) = self.matches.on_line(idx);
                CodeLine {
                    number,
                    coverage: file.coverage_at(idx),
                    diff: if self.report.is_diff_mode { file.diff_state_at(idx) } else { None },
                    selected: self.selection.is_selected(number),
                    segments: build_segments(text, on_line, first, current),
                }
            })
            .collect();
        CodeView::Lines {
            file_id,
            path: file.path.clone(),
            syntax: self.state.syntax_enabled,
            lines,
        }
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine {
            matches: self.matches.status(),
            location: self.location.current(),
            sort_mode: self.state.sort_mode,
            syntax_enabled: self.state.syntax_enabled,
            file_query: self.state.file_query.clone(),
            content_query: self.state.content_query.clone(),
        }
    }

    /// Decodes the host location and applies it, falling back to the first
    /// file when it is missing or malformed.
    fn sync_from_location(&mut self) {
        let raw = self.location.current();
        let decoded = raw
            .as_deref()
            .and_then(|r| link::decode(r, self.report.files.len()));

        match decoded {
            Some(location) => self.apply_location(location),
            None => {
                if let Some(raw) = &raw {
                    tracing::debug!(location = %raw, "malformed location, using first file");
                }
                if self.report.files.is_empty() {
                    self.state.current_file = None;
                    self.selection.clear();
                    self.matches.clear();
                } else {
                    self.switch_file(0);
                    self.location.replace(&Location::file(0).to_string());
                    self.scroll_to_file_start();
                }
            }
        }
        self.render_code();
        self.render_tree();
        self.render_status();
    }

    fn apply_location(&mut self, location: Location) {
        let changed = self.state.current_file != Some(location.file_id);
        if changed {
            self.switch_file(location.file_id);
        }
        match location.line_start {
            Some(start) => {
                let range = self.selection.apply(start, location.line_end);
                self.surface.scroll_to_center(range.start);
            }
            None => {
                self.selection.clear();
                if changed {
                    self.scroll_to_file_start();
                }
            }
        }
        tracing::debug!(%location, "applied location");
    }

    fn open_file(&mut self, file_id: FileId) {
        if file_id >= self.report.files.len() {
            tracing::warn!(file_id, "ignoring request to open unknown file");
            return;
        }
        if self.state.current_file == Some(file_id) {
            return;
        }
        self.switch_file(file_id);
        self.location.replace(&Location::file(file_id).to_string());
        self.render_code();
        self.scroll_to_file_start();
        self.render_tree();
        self.render_status();
    }

    /// Makes `file_id` current: resets the selection and re-runs the active
    /// content query against the new file.
    fn switch_file(&mut self, file_id: FileId) {
        self.state.current_file = Some(file_id);
        self.selection.clear();
        self.research();
        if let Some(file) = self.report.files.get(file_id) {
            tracing::debug!(file_id, path = %file.path, "opened file");
        }
    }

    fn research(&mut self) {
        let lines = self
            .state
            .current_file
            .and_then(|id| self.report.files.get(id))
            .map(|f| f.lines.as_slice())
            .unwrap_or_default();
        self.matches.search(lines, &self.state.content_query);
    }

    fn scroll_to_file_start(&mut self) {
        let line = self.matches.current().map_or(1, |m| m.line as u32 + 1);
        self.surface.scroll_to_center(line);
    }

    fn click_line(&mut self, line: u32, extend: bool) {
        let Some(file_id) = self.state.current_file else {
            return;
        };
        let line_count = self.report.files.get(file_id).map_or(0, |f| f.line_count());
        if line == 0 || line as usize > line_count {
            tracing::debug!(line, line_count, "ignoring click outside the file");
            return;
        }
        let range = if extend {
            self.selection.extend(line)
        } else {
            self.selection.click(line)
        };
        self.location
            .replace(&link::encode(file_id, Some(range.start), Some(range.end)));
        self.render_code();
        self.render_status();
    }

    fn fire(&mut self, trigger: Trigger) {
        tracing::debug!(source = ?trigger.source, query = %trigger.query, "debounced query fired");
        match trigger.source {
            InputSource::FileFilter => {
                self.state.file_query = trigger.query;
                self.render_tree();
                self.render_status();
            }
            InputSource::ContentSearch => {
                self.state.content_query = trigger.query;
                self.research();
                self.render_code();
                self.render_status();
                if let Some(m) = self.matches.current() {
                    self.surface.scroll_to_center(m.line as u32 + 1);
                }
            }
        }
    }

    fn after_match_move(&mut self) {
        self.render_code();
        self.render_status();
        if let Some(m) = self.matches.current() {
            self.surface.scroll_to_center(m.line as u32 + 1);
        }
    }

    /// Schedules a debounced query change. Editing back to the query already
    /// in effect drops the pending trigger instead, so nothing re-renders.
    fn edit_query(&mut self, source: InputSource, query: String, at: Instant) {
        let applied = match source {
            InputSource::FileFilter => &self.state.file_query,
            InputSource::ContentSearch => &self.state.content_query,
        };
        if *applied == query {
            if self.debouncer.cancel(source) {
                tracing::trace!(?source, "query edit reverted before firing");
            }
        } else {
            self.debouncer.schedule(source, query, at);
        }
    }

    fn resort(&mut self) {
        self.sorted = sort_tree(&self.report.tree, self.state.sort_mode, self.stats.as_ref());
    }

    fn render_tree(&mut self) {
        let rows = self.tree_rows();
        self.surface.render_tree(&rows);
    }

    fn render_code(&mut self) {
        let view = self.code_view();
        self.surface.render_code(&view);
    }

    fn render_status(&mut self) {
        let status = self.status_line();
        self.surface.render_status(&status);
    }
}
