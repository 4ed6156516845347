//! Color theme system for covscope.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! covscope renders. Two built-in palettes are provided, matching the two
//! [`ThemeMode`] values the viewer toggles between:
//!
//! - `dark`: ANSI 16 colors for chrome plus a few RGB shades for line
//!   backgrounds; paired with syntect's `base16-ocean.dark`.
//! - `light`: RGB palette for light terminals; paired with `InspiredGitHub`.

use covscope_core::coverage::CoverageLevel;
use covscope_core::state::ThemeMode;
use covscope_core::types::{DiffState, LineCoverage};
use ratatui::style::Color;

/// All color values used across covscope's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Code view
    /// Plain text color when syntax colouring is off.
    pub code_fg: Color,
    /// Line-number gutter.
    pub gutter: Color,
    pub line_covered_bg: Color,
    pub line_uncovered_bg: Color,
    /// Background of lines inside the selected range; wins over coverage shading.
    pub line_selected_bg: Color,
    pub marker_covered: Color,
    pub marker_uncovered: Color,
    pub match_bg: Color,
    pub current_match_bg: Color,
    pub match_fg: Color,

    // Diff mode markers
    pub diff_newly_covered: Color,
    pub diff_newly_uncovered: Color,

    // Coverage badges
    pub badge_low: Color,
    pub badge_medium: Color,
    pub badge_high: Color,

    // File tree
    pub dir_fg: Color,
    pub file_fg: Color,
    /// The row of the file currently open in the code view.
    pub open_file_fg: Color,
    pub cursor_bg: Color,

    // Status bar and prompt
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_input: Color,
    pub header_fg: Color,

    /// Name of the syntect theme used for syntax colouring.
    pub syntax_theme: &'static str,
}

impl Theme {
    /// Returns the built-in dark theme.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            code_fg: Color::Reset,
            gutter: Color::DarkGray,
            line_covered_bg: Color::Rgb(18, 48, 28),
            line_uncovered_bg: Color::Rgb(64, 22, 28),
            line_selected_bg: Color::Rgb(58, 58, 24),
            marker_covered: Color::Green,
            marker_uncovered: Color::Red,
            match_bg: Color::Rgb(90, 78, 20),
            current_match_bg: Color::Rgb(200, 140, 20),
            match_fg: Color::White,

            diff_newly_covered: Color::LightGreen,
            diff_newly_uncovered: Color::LightRed,

            badge_low: Color::Red,
            badge_medium: Color::Yellow,
            badge_high: Color::Green,

            dir_fg: Color::Blue,
            file_fg: Color::Reset,
            open_file_fg: Color::Cyan,
            cursor_bg: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_input: Color::Green,
            header_fg: Color::White,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Returns the built-in light theme using RGB truecolor values.
    pub fn light() -> Self {
        let ink = Color::Rgb(36, 41, 47); // #24292f
        let muted = Color::Rgb(110, 119, 129); // #6e7781
        let blue = Color::Rgb(9, 105, 218); // #0969da
        let green = Color::Rgb(26, 127, 55); // #1a7f37
        let red = Color::Rgb(207, 34, 46); // #cf222e
        let amber = Color::Rgb(154, 103, 0); // #9a6700
        let canvas_subtle = Color::Rgb(234, 238, 242); // #eaeef2

        Self {
            border_active: blue,
            border_inactive: muted,

            code_fg: ink,
            gutter: muted,
            line_covered_bg: Color::Rgb(218, 251, 225),
            line_uncovered_bg: Color::Rgb(255, 235, 233),
            line_selected_bg: Color::Rgb(255, 248, 197),
            marker_covered: green,
            marker_uncovered: red,
            match_bg: Color::Rgb(255, 223, 128),
            current_match_bg: Color::Rgb(255, 170, 60),
            match_fg: ink,

            diff_newly_covered: green,
            diff_newly_uncovered: red,

            badge_low: red,
            badge_medium: amber,
            badge_high: green,

            dir_fg: blue,
            file_fg: ink,
            open_file_fg: blue,
            cursor_bg: canvas_subtle,

            status_bar_bg: canvas_subtle,
            status_bar_fg: ink,
            status_mode_normal: blue,
            status_mode_input: green,
            header_fg: ink,

            syntax_theme: "InspiredGitHub",
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn badge(&self, percent: f64) -> Color {
        match CoverageLevel::of(percent) {
            CoverageLevel::Low => self.badge_low,
            CoverageLevel::Medium => self.badge_medium,
            CoverageLevel::High => self.badge_high,
        }
    }

    /// Background shading of a code line by its coverage class.
    pub fn line_bg(&self, coverage: LineCoverage) -> Option<Color> {
        match coverage {
            LineCoverage::NotInstrumented => None,
            LineCoverage::Uncovered => Some(self.line_uncovered_bg),
            LineCoverage::Covered => Some(self.line_covered_bg),
        }
    }

    /// Gutter marker glyph and color for a diff-mode line state.
    pub fn diff_marker(&self, state: DiffState) -> (&'static str, Color) {
        match state {
            DiffState::NewlyCovered => ("+", self.diff_newly_covered),
            DiffState::NewlyUncovered => ("-", self.diff_newly_uncovered),
            DiffState::NoChange | DiffState::UnchangedCovered | DiffState::UnchangedUncovered => {
                (" ", self.gutter)
            }
        }
    }
}
