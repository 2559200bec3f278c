//! Line-oriented markdown to HTML.
//!
//! Supports headings (levels 1-3), bold, italic, inline code, links, flat
//! unordered lists and paragraphs. Nested structures, tables, blockquotes and
//! multi-line emphasis are not supported.
//!
//! Cell text is trusted catalog content and is emitted without escaping.

use once_cell::sync::Lazy;
use regex::Regex;

use super::escape_html;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").expect("valid code regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.+?)\]\((.+?)\)").expect("valid link regex"));

/// A block-level element of a markdown cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// The anchor is the raw heading text, not the outline slug.
    Heading { level: u8, text: String },
    List(Vec<String>),
    Paragraph(String),
}

fn heading(line: &str) -> Option<Block> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(marker, level)| {
            let text = line.strip_prefix(marker)?;
            (!text.is_empty()).then(|| Block::Heading {
                level,
                text: text.to_string(),
            })
        })
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").filter(|item| !item.is_empty())
}

/// Split cell text into blocks, in source order.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<String> = Vec::new();

    fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join("\n")));
            paragraph.clear();
        }
    }

    fn flush_list(blocks: &mut Vec<Block>, list: &mut Vec<String>) {
        if !list.is_empty() {
            blocks.push(Block::List(std::mem::take(list)));
        }
    }

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(item) = list_item(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            list.push(item.to_string());
            continue;
        }
        flush_list(&mut blocks, &mut list);

        if let Some(block) = heading(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(block);
        } else if line.trim().is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
        } else {
            paragraph.push(line);
        }
    }

    flush_list(&mut blocks, &mut list);
    flush_paragraph(&mut blocks, &mut paragraph);
    blocks
}

/// Apply the inline rules in order: bold, italic, inline code, links.
pub fn render_inline(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    let text = INLINE_CODE.replace_all(&text, "<code>$1</code>");
    LINK.replace_all(
        &text,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    )
    .into_owned()
}

/// Render a markdown cell's full text to HTML.
pub fn render_markdown(text: &str) -> String {
    parse_blocks(text)
        .iter()
        .map(|block| match block {
            Block::Heading { level, text } => format!(
                "<h{level} id=\"{}\">{}</h{level}>",
                escape_html(text),
                render_inline(text)
            ),
            Block::List(items) => {
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", render_inline(item)))
                    .collect();
                format!("<ul>{}</ul>", items)
            }
            Block::Paragraph(text) => format!("<p>{}</p>", render_inline(text)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
