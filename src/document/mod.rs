//! Notebook document model.
//!
//! Documents arrive as loosely shaped JSON. They are validated once at the
//! load boundary into [`RawDocument`], so rendering only ever matches on
//! [`Cell`] and [`Output`] variants.

mod loader;

pub use loader::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// A parsed notebook: ordered cells plus opaque metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawDocument {
    pub cells: Vec<Cell>,
    pub metadata: Map<String, Value>,
}

/// One unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Markdown {
        source: Vec<String>,
    },
    Code {
        source: Vec<String>,
        outputs: Vec<Output>,
        /// Per-cell language override
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Cell {
    pub fn source(&self) -> &[String] {
        match self {
            Cell::Markdown { source } | Cell::Code { source, .. } => source,
        }
    }

    /// Full cell text, fragments concatenated as-is.
    pub fn text(&self) -> String {
        self.source().concat()
    }
}

/// A captured output of a code cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    /// Plain text lines (stream output)
    Text(Vec<String>),
    /// MIME type to text lines; may be empty
    Data(BTreeMap<String, Vec<String>>),
}

impl Output {
    /// The output's plain text, if it has any.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Output::Text(lines) => Some(lines.concat()),
            Output::Data(data) => data.get("text/plain").map(|lines| lines.concat()),
        }
    }
}

#[derive(Deserialize)]
struct WireDocument {
    cells: Vec<Value>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl RawDocument {
    /// Parse document bytes. Fails only when the cell list itself is
    /// missing or malformed; individual cells degrade to empty ones.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AppError> {
        let wire: WireDocument = serde_json::from_slice(bytes)?;

        let cells = wire.cells.iter().enumerate().map(normalize_cell).collect();

        Ok(Self {
            cells,
            metadata: wire.metadata.unwrap_or_default(),
        })
    }

    /// Document-wide language from the notebook metadata.
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .get("language_info")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
            .or_else(|| {
                self.metadata
                    .get("kernelspec")
                    .and_then(|spec| spec.get("language"))
                    .and_then(Value::as_str)
            })
    }
}

fn normalize_cell((index, value): (usize, &Value)) -> Cell {
    let source = match value.get("source") {
        Some(source) => text_fragments(source).unwrap_or_else(|| {
            tracing::debug!("Cell {} has a malformed source, rendering it empty", index);
            Vec::new()
        }),
        None => {
            tracing::debug!("Cell {} has no source, rendering it empty", index);
            Vec::new()
        }
    };

    match value.get("cell_type").and_then(Value::as_str) {
        Some("markdown") => Cell::Markdown { source },
        _ => {
            let outputs = value
                .get("outputs")
                .and_then(Value::as_array)
                .map(|outputs| outputs.iter().map(normalize_output).collect())
                .unwrap_or_default();

            let language = value
                .get("metadata")
                .and_then(|meta| meta.get("language"))
                .and_then(Value::as_str)
                .map(str::to_string);

            Cell::Code {
                source,
                outputs,
                language,
            }
        }
    }
}

fn normalize_output(value: &Value) -> Output {
    if let Some(text) = value.get("text").and_then(text_fragments) {
        return Output::Text(text);
    }

    let data = value
        .get("data")
        .and_then(Value::as_object)
        .map(|data| {
            data.iter()
                .filter_map(|(mime, lines)| Some((mime.clone(), text_fragments(lines)?)))
                .collect()
        })
        .unwrap_or_default();

    Output::Data(data)
}

/// Accepts a string or a list of strings; non-string list items are skipped.
fn text_fragments(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_fragments() {
        let doc = RawDocument::from_slice(
            br##"{
                "cells": [
                    {"cell_type": "markdown", "source": ["# Title\n", "Intro **text**"]},
                    {"cell_type": "code", "source": "val x = 1", "outputs": []},
                    {"cell_type": "markdown", "source": ["Outro"]}
                ],
                "metadata": {"kernelspec": {"language": "kotlin"}}
            }"##,
        )
        .unwrap();

        assert_eq!(doc.cells.len(), 3);
        assert_eq!(
            doc.cells[0],
            Cell::Markdown {
                source: vec!["# Title\n".to_string(), "Intro **text**".to_string()]
            }
        );
        assert_eq!(doc.cells[1].text(), "val x = 1");
        assert_eq!(doc.cells[2].text(), "Outro");
        assert_eq!(doc.language(), Some("kotlin"));
    }

    #[test]
    fn test_missing_cells_is_parse_failure() {
        let err = RawDocument::from_slice(br#"{"metadata": {}}"#).unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));

        let err = RawDocument::from_slice(br#"{"cells": "nope"}"#).unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));

        let err = RawDocument::from_slice(b"<html>not json</html>").unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));
    }

    #[test]
    fn test_malformed_cells_degrade_to_empty() {
        let doc = RawDocument::from_slice(
            br#"{"cells": [
                {"cell_type": "markdown"},
                {"cell_type": "code", "source": 42},
                {"cell_type": "raw", "source": ["raw text"]},
                7
            ]}"#,
        )
        .unwrap();

        assert_eq!(doc.cells.len(), 4);
        assert_eq!(doc.cells[0], Cell::Markdown { source: vec![] });
        assert!(doc.cells[1].source().is_empty());
        assert!(matches!(doc.cells[2], Cell::Code { .. }));
        assert_eq!(doc.cells[2].text(), "raw text");
        assert!(doc.cells[3].source().is_empty());
    }

    #[test]
    fn test_outputs_are_typed() {
        let doc = RawDocument::from_slice(
            br#"{"cells": [{
                "cell_type": "code",
                "source": ["println(1)"],
                "metadata": {"language": "java"},
                "outputs": [
                    {"output_type": "stream", "text": ["1\n"]},
                    {"output_type": "execute_result", "data": {
                        "text/plain": ["res0"],
                        "text/html": "<b>res0</b>",
                        "application/json": {"a": 1}
                    }},
                    {"output_type": "error", "ename": "Boom"}
                ]
            }]}"#,
        )
        .unwrap();

        let Cell::Code {
            outputs, language, ..
        } = &doc.cells[0]
        else {
            panic!("expected a code cell");
        };

        assert_eq!(language.as_deref(), Some("java"));
        assert_eq!(outputs[0], Output::Text(vec!["1\n".to_string()]));
        assert_eq!(outputs[1].plain_text().as_deref(), Some("res0"));
        let Output::Data(data) = &outputs[1] else {
            panic!("expected data output");
        };
        assert_eq!(data.len(), 2);
        assert_eq!(outputs[2], Output::Data(BTreeMap::new()));
        assert_eq!(outputs[2].plain_text(), None);
    }

    #[test]
    fn test_language_prefers_language_info() {
        let doc = RawDocument::from_slice(
            br#"{"cells": [], "metadata": {
                "language_info": {"name": "kotlin"},
                "kernelspec": {"language": "python"}
            }}"#,
        )
        .unwrap();
        assert_eq!(doc.language(), Some("kotlin"));

        let bare = RawDocument::from_slice(br#"{"cells": []}"#).unwrap();
        assert_eq!(bare.language(), None);
    }
}
