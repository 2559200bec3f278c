//! Code cell rendering: highlighted lines, copy action and captured output.

use once_cell::sync::Lazy;
use serde::Serialize;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::{escape_html, Theme};
use crate::document::Output;

// Syntax highlighting resources (loaded once)
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_nonewlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// One numbered, highlighted source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLine {
    /// 1-based
    pub number: usize,
    pub html: String,
}

/// A highlighted code view plus the text its copy action writes.
///
/// The page's copy button writes `copy_text` to the client clipboard and
/// ignores a failed write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub language: String,
    pub lines: Vec<CodeLine>,
    pub copy_text: String,
}

impl CodeBlock {
    pub fn new(source: &str, language: &str, theme: Theme) -> Self {
        let code = source.trim();
        let lines = highlight(code, language, theme)
            .into_iter()
            .enumerate()
            .map(|(i, html)| CodeLine {
                number: i + 1,
                html,
            })
            .collect();

        Self {
            language: language.to_string(),
            lines,
            copy_text: code.to_string(),
        }
    }
}

fn find_syntax(language: &str) -> &'static SyntaxReference {
    let language = language.to_lowercase();
    let alias = match language.as_str() {
        // No bundled Kotlin grammar; Scala shares most of its lexical shape.
        "kotlin" | "kt" | "kts" => "scala",
        "python" => "py",
        "javascript" => "js",
        "typescript" => "ts",
        "shell" | "bash" => "sh",
        other => other,
    };

    SYNTAX_SET
        .find_syntax_by_token(&language)
        .or_else(|| SYNTAX_SET.find_syntax_by_token(alias))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// Highlight code into one HTML fragment per line.
pub fn highlight(code: &str, language: &str, theme: Theme) -> Vec<String> {
    let Some(theme) = THEME_SET.themes.get(theme.syntect_name()) else {
        return code.lines().map(escape_html).collect();
    };

    let mut highlighter = HighlightLines::new(find_syntax(language), theme);

    code.lines()
        .map(|line| {
            highlighter
                .highlight_line(line, &SYNTAX_SET)
                .and_then(|ranges| styled_line_to_highlighted_html(&ranges, IncludeBackground::No))
                .unwrap_or_else(|e| {
                    tracing::debug!("Highlighting failed, using plain text: {}", e);
                    escape_html(line)
                })
        })
        .collect()
}

/// Join the plain text of a cell's outputs with newlines, dropping blank
/// contributions. `None` when nothing is left.
pub fn collect_output(outputs: &[Output]) -> Option<String> {
    let parts: Vec<String> = outputs
        .iter()
        .filter_map(Output::plain_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    (!parts.is_empty()).then(|| parts.join("\n"))
}
