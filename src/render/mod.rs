//! Notebook cell renderer.
//!
//! Turns a [`RawDocument`] into an outline plus one rendered entry per cell.
//! Cell count and order are always preserved.

mod code;
mod markdown;
mod outline;

pub use code::*;
pub use markdown::*;
pub use outline::*;

use serde::{Deserialize, Serialize};

use crate::document::{Cell, RawDocument};

/// Color scheme for highlighted code and page chrome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn syntect_name(&self) -> &'static str {
        match self {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        }
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A rendered cell.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedCell {
    Markdown {
        html: String,
    },
    Code {
        code: CodeBlock,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<String>,
    },
}

/// A fully rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub outline: Vec<HeadingEntry>,
    pub cells: Vec<RenderedCell>,
}

/// Renders documents with a fixed default language and theme.
#[derive(Debug, Clone)]
pub struct Renderer {
    default_language: String,
    theme: Theme,
}

impl Renderer {
    pub fn new(default_language: impl Into<String>, theme: Theme) -> Self {
        Self {
            default_language: default_language.into(),
            theme,
        }
    }

    pub fn render(&self, document: &RawDocument) -> RenderedDocument {
        let document_language = document.language().unwrap_or(&self.default_language);

        RenderedDocument {
            outline: Outline::new(document).into_iter().collect(),
            cells: document
                .cells
                .iter()
                .map(|cell| self.render_cell(cell, document_language))
                .collect(),
        }
    }

    fn render_cell(&self, cell: &Cell, document_language: &str) -> RenderedCell {
        match cell {
            Cell::Markdown { .. } => RenderedCell::Markdown {
                html: render_markdown(&cell.text()),
            },
            Cell::Code {
                outputs, language, ..
            } => {
                let language = language.as_deref().unwrap_or(document_language);
                RenderedCell::Code {
                    code: CodeBlock::new(&cell.text(), language, self.theme),
                    output: collect_output(outputs),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Output;

    fn document() -> RawDocument {
        RawDocument::from_slice(
            br##"{"cells": [
                {"cell_type": "markdown", "source": ["# Getting Started\n", "Hello"]},
                {"cell_type": "code", "source": ["val a = 1"], "outputs": [
                    {"output_type": "stream", "text": ["a\n"]},
                    {"output_type": "execute_result", "data": {"text/plain": ["b"]}}
                ]},
                {"cell_type": "code", "source": ["print(1)"], "metadata": {"language": "python"}},
                {"cell_type": "markdown"}
            ]}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_render_preserves_count_and_order() {
        let doc = document();
        let rendered = Renderer::new("kotlin", Theme::Dark).render(&doc);

        assert_eq!(rendered.cells.len(), doc.cells.len());
        let kinds: Vec<&str> = rendered
            .cells
            .iter()
            .map(|c| match c {
                RenderedCell::Markdown { .. } => "markdown",
                RenderedCell::Code { .. } => "code",
            })
            .collect();
        assert_eq!(kinds, vec!["markdown", "code", "code", "markdown"]);
    }

    #[test]
    fn test_render_outline_and_outputs() {
        let rendered = Renderer::new("kotlin", Theme::Dark).render(&document());

        assert_eq!(rendered.outline.len(), 1);
        assert_eq!(rendered.outline[0].slug, "getting-started");

        let RenderedCell::Code { code, output } = &rendered.cells[1] else {
            panic!("expected code cell");
        };
        assert_eq!(code.language, "kotlin");
        assert_eq!(output.as_deref(), Some("a\n\nb"));

        let RenderedCell::Code { code, output } = &rendered.cells[2] else {
            panic!("expected code cell");
        };
        assert_eq!(code.language, "python");
        assert!(output.is_none());
    }

    #[test]
    fn test_empty_markdown_cell_renders_empty() {
        let rendered = Renderer::new("kotlin", Theme::Dark).render(&document());
        let RenderedCell::Markdown { html } = &rendered.cells[3] else {
            panic!("expected markdown cell");
        };
        assert!(html.is_empty());
    }

    #[test]
    fn test_document_language_beats_default() {
        let doc = RawDocument {
            cells: vec![Cell::Code {
                source: vec!["x".to_string()],
                outputs: vec![Output::Text(vec![])],
                language: None,
            }],
            metadata: serde_json::from_str(r#"{"language_info": {"name": "java"}}"#).unwrap(),
        };

        let rendered = Renderer::new("kotlin", Theme::Light).render(&doc);
        let RenderedCell::Code { code, output } = &rendered.cells[0] else {
            panic!("expected code cell");
        };
        assert_eq!(code.language, "java");
        assert!(output.is_none());
    }

    #[test]
    fn test_theme_query_values() {
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
        assert_eq!(theme.toggled(), Theme::Dark);
        assert_eq!(Theme::default().as_str(), "dark");
    }
}
