//! Heading outline for in-page navigation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::{Cell, RawDocument};

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,3})[ \t]+(.+)$").expect("valid heading regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// A heading found in a markdown cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub level: u8,
    pub text: String,
    pub slug: String,
}

/// Lower-case the text and collapse whitespace runs into single hyphens.
///
/// Identical headings produce identical slugs; no de-duplication happens.
pub fn slugify(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// Level 1-3 headings in a block of markdown text, in line order.
pub fn headings_in(text: &str) -> Vec<HeadingEntry> {
    text.lines()
        .filter_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let caps = HEADING.captures(line)?;
            let level = caps[1].len();
            let text = line[level..].trim_start().to_string();
            Some(HeadingEntry {
                level: level as u8,
                slug: slugify(&text),
                text,
            })
        })
        .collect()
}

/// Outline of a document. Nothing is computed until iterated, and it can be
/// iterated again to recompute.
#[derive(Debug, Clone, Copy)]
pub struct Outline<'a> {
    cells: &'a [Cell],
}

impl<'a> Outline<'a> {
    pub fn new(document: &'a RawDocument) -> Self {
        Self {
            cells: &document.cells,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = HeadingEntry> + 'a {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Markdown { .. }))
            .flat_map(|cell| headings_in(&cell.text()))
    }
}

impl<'a> IntoIterator for Outline<'a> {
    type Item = HeadingEntry;
    type IntoIter = Box<dyn Iterator<Item = HeadingEntry> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
