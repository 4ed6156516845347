//! Syntax colouring of source lines via syntect.
//!
//! Syntax and theme sets are loaded once, on first use. A whole file is
//! highlighted in one pass so multi-line constructs (block comments, strings)
//! carry their parse state from line to line.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_nonewlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Spaces a tab is drawn as.
pub const TAB: &str = "    ";

/// Expands tabs for display. Terminals do not lay out `\t` inside a cell grid.
pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', TAB)
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground and font style are kept: line backgrounds belong to the
/// coverage shading.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::Color as SC;
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(expand_tabs(content), ratatui_style)
}

/// Highlights every line of the file at `path`.
///
/// The syntax is chosen by file extension, falling back to plain text.
/// Returns `None` when the theme is unknown; a line that fails to highlight
/// comes back as one unstyled span.
pub fn highlight_file<S: AsRef<str>>(path: &str, lines: &[S], theme_name: &str) -> Option<Vec<Vec<Span<'static>>>> {
    let theme = TS.themes.get(theme_name)?;
    let syntax = PS
        .find_syntax_by_extension(file_ext(path))
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, theme);

    let highlighted = lines
        .iter()
        .map(|line| {
            let code = line.as_ref();
            match h.highlight_line(code, &PS) {
                Ok(ranges) if !ranges.is_empty() => ranges
                    .into_iter()
                    .map(|(style, text)| syntect_to_span(style, text))
                    .collect(),
                Ok(_) => vec![Span::raw(String::new())],
                Err(e) => {
                    tracing::debug!(path, error = %e, "syntax highlighting failed for line");
                    vec![Span::raw(expand_tabs(code))]
                }
            }
        })
        .collect();
    Some(highlighted)
}

/// Extracts the file extension from a report path.
///
/// Returns "txt" if the path has no extension.
fn file_ext(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_the_file_name() {
        assert_eq!(file_ext("pkg/v1.2/main.go"), "go");
        assert_eq!(file_ext("Makefile"), "txt");
    }

    #[test]
    fn highlighted_text_matches_source() {
        let lines = ["fn main() {", "\tlet x = 1;", "}"];
        let spans = highlight_file("src/main.rs", &lines, "base16-ocean.dark").unwrap();
        assert_eq!(spans.len(), 3);
        let second: String = spans[1].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(second, "    let x = 1;");
    }

    #[test]
    fn unknown_theme_yields_none() {
        assert!(highlight_file("a.rs", &["x"], "no-such-theme").is_none());
    }
}
