//! Server-rendered HTML pages.
//!
//! View state (theme, selected topic) is passed in explicitly and carried
//! forward on links; nothing here is global.

use once_cell::sync::Lazy;
use url::{form_urlencoded, Url};

use crate::models::{Author, Catalog, Notebook, Topic};
use crate::render::{escape_html, CodeBlock, HeadingEntry, RenderedCell, RenderedDocument, Theme};

const DOCS_URL: &str = "https://kotlinlang.org/docs/kotlin-notebook-overview.html";
const SOURCE_URL: &str = "https://github.com/teodor-i/kotlin-notebook-cookbook";

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, sans-serif; line-height: 1.6; }
.app.dark { background: #0f1117; color: #e6e6e6; }
.app.light { background: #ffffff; color: #1f2328; }
a { color: inherit; }
.header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; border-bottom: 1px solid #8884; }
.header-nav { display: flex; gap: 1rem; }
.main-content { max-width: 1200px; margin: 0 auto; padding: 2rem; }
.topics-grid, .notebook-list-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; margin: 1rem 0 2rem; }
.topic-card { display: block; padding: 2rem 1rem; border-radius: 12px; color: #fff; font-weight: 600; text-decoration: none; }
.topic-card-selected { outline: 3px solid #7f52ff; }
.notebook-card { display: block; padding: 1rem; border: 1px solid #8884; border-radius: 12px; text-decoration: none; }
.notebook-card-header { display: flex; justify-content: space-between; font-size: 0.85rem; opacity: 0.8; }
.author-avatar, .author-avatar-small { display: inline-flex; align-items: center; justify-content: center; width: 28px; height: 28px; border-radius: 50%; background: #7f52ff; color: #fff; font-size: 0.75rem; position: relative; }
.author-avatar img, .author-avatar-small img { width: 100%; height: 100%; border-radius: 50%; }
.author-verified { position: absolute; right: -4px; bottom: -4px; font-size: 0.6rem; }
.notebook-tag { display: inline-block; padding: 0 0.5rem; margin: 0.5rem 0.25rem 0 0; border-radius: 999px; color: #fff; font-size: 0.75rem; }
.notebook-content-wrapper { display: flex; gap: 2rem; }
.notebook-sidebar { flex: 0 0 220px; position: sticky; top: 1rem; align-self: flex-start; }
.notebook-toc ul { list-style: none; }
.notebook-main { flex: 1; min-width: 0; }
.notebook-meta { display: flex; justify-content: space-between; margin: 1rem 0 2rem; }
.cell { margin-bottom: 1.5rem; }
.markdown-body ul { padding-left: 1.5rem; }
.code-block-wrapper { position: relative; }
.code-block-wrapper pre { padding: 1rem; border-radius: 8px; overflow-x: auto; }
.app.dark .code-block-wrapper pre { background: #2b303b; }
.app.light .code-block-wrapper pre { background: #f6f8fa; }
.line-number { display: inline-block; width: 2.5rem; opacity: 0.5; user-select: none; }
.copy-button { position: absolute; top: 0.5rem; right: 0.5rem; cursor: pointer; }
.cell-output pre { padding: 1rem; border-left: 3px solid #7f52ff; white-space: pre-wrap; }
.notebook-error { text-align: center; padding: 4rem 0; }
"#;

const COPY_SCRIPT: &str = r#"
document.addEventListener('click', function (e) {
  var button = e.target.closest('.copy-button');
  if (!button) return;
  navigator.clipboard.writeText(button.dataset.copy).catch(function () {});
});
"#;

static PAGE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("valid page base url"));

/// Percent-encoded path of a notebook page.
fn notebook_path(id: &str) -> String {
    let mut url = PAGE_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("notebook").push(id);
    }
    url.path().to_string()
}

/// Link to a page, carrying the selected topic and a non-default theme.
fn page_href(path: &str, topic: Option<&str>, theme: Theme) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(topic) = topic {
        query.append_pair("topic", topic);
    }
    if theme == Theme::Light {
        query.append_pair("theme", theme.as_str());
    }
    let query = query.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

fn layout(title: &str, theme: Theme, toggle_href: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="app {theme}">
<nav class="header">
<a href="{home_href}" class="header-logo"><span class="header-logo-text">Kotlin Notebook Cookbook</span></a>
<div class="header-nav">
<a href="{DOCS_URL}" target="_blank" rel="noopener noreferrer" class="header-nav-link">Docs</a>
<a href="{SOURCE_URL}" target="_blank" rel="noopener noreferrer" class="header-nav-link">Source</a>
<a href="{toggle_href}" class="header-theme-btn" aria-label="Toggle theme">{toggle_label}</a>
</div>
</nav>
<main class="main-content">
{body}
</main>
</div>
<script>{COPY_SCRIPT}</script>
</body>
</html>
"#,
        title = escape_html(title),
        theme = theme.as_str(),
        home_href = escape_html(&page_href("/", None, theme)),
        toggle_href = escape_html(toggle_href),
        toggle_label = match theme {
            Theme::Dark => "Light",
            Theme::Light => "Dark",
        },
    )
}

fn author_avatar(author: &Author, class: &str, badge: bool) -> String {
    let inner = match &author.avatar {
        Some(src) => format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(src),
            escape_html(&author.name)
        ),
        None => format!("<span>{}</span>", escape_html(&author.initials())),
    };
    let badge = if badge && author.verified {
        r#"<span class="author-verified" title="Verified">&#10003;</span>"#
    } else {
        ""
    };
    format!(
        r#"<span class="{class}" title="{}">{inner}{badge}</span>"#,
        escape_html(&author.name)
    )
}

fn notebook_card(notebook: &Notebook, theme: Theme) -> String {
    let avatars: String = notebook
        .authors
        .iter()
        .map(|a| author_avatar(a, "author-avatar", true))
        .collect();
    let tags: String = notebook
        .tags
        .iter()
        .map(|t| {
            format!(
                r#"<span class="notebook-tag" style="background-color: {}">{}</span>"#,
                escape_html(&t.color),
                escape_html(&t.name)
            )
        })
        .collect();

    format!(
        r#"<a href="{href}" class="notebook-card">
<div class="notebook-card-header"><span class="notebook-card-date">{date}</span><span class="notebook-card-authors">{avatars}</span></div>
<div class="notebook-card-content"><div class="notebook-card-tags">{tags}</div><h3 class="notebook-card-title">{title}</h3></div>
</a>"#,
        href = escape_html(&page_href(&notebook_path(&notebook.id), None, theme)),
        date = escape_html(&notebook.date),
        title = escape_html(&notebook.title),
    )
}

fn notebook_list(title: &str, notebooks: &[&Notebook], theme: Theme) -> String {
    if notebooks.is_empty() {
        return String::new();
    }
    let cards: String = notebooks.iter().map(|n| notebook_card(n, theme)).collect();
    format!(
        r#"<section class="notebook-list-section"><h2 class="notebook-list-title">{title}</h2><div class="notebook-list-grid">{cards}</div></section>"#
    )
}

/// Catalog page: topics, then the featured, best-to-start and full lists.
/// A selected topic narrows every list.
pub fn index_page(catalog: &Catalog, selected: Option<&Topic>, theme: Theme) -> String {
    let topics: String = catalog
        .topics
        .iter()
        .map(|topic| {
            let is_selected = selected.is_some_and(|s| s.id == topic.id);
            // Clicking the selected topic clears the filter.
            let target = (!is_selected).then_some(topic.id.as_str());
            format!(
                r#"<a href="{href}" class="topic-card{selected_class}" style="background: {background}">{name}</a>"#,
                href = escape_html(&page_href("/", target, theme)),
                selected_class = if is_selected { " topic-card-selected" } else { "" },
                background = escape_html(&topic.background_image),
                name = escape_html(&topic.name),
            )
        })
        .collect();

    let visible = |n: &&Notebook| selected.map_or(true, |topic| topic.includes(n));
    let featured: Vec<&Notebook> = catalog.featured().into_iter().filter(visible).collect();
    let best: Vec<&Notebook> = catalog.best_to_start().into_iter().filter(visible).collect();
    let all: Vec<&Notebook> = catalog.notebooks.iter().filter(visible).collect();

    let body = format!(
        r#"<section class="topics-section"><h1 class="section-title">Topics</h1><div class="topics-grid">{topics}</div></section>
{}
{}
{}"#,
        notebook_list("Featured cookbooks", &featured, theme),
        notebook_list("Best to start", &best, theme),
        notebook_list("All Notebooks", &all, theme),
    );

    let toggle = page_href("/", selected.map(|t| t.id.as_str()), theme.toggled());
    layout("Kotlin Notebook Cookbook", theme, &toggle, &body)
}

fn table_of_contents(outline: &[HeadingEntry]) -> String {
    let items: String = outline
        .iter()
        .map(|heading| {
            format!(
                r##"<li style="padding-left: {}rem"><a href="#{}" class="toc-link">{}</a></li>"##,
                f32::from(heading.level.saturating_sub(1)) * 0.75,
                escape_html(&heading.slug),
                escape_html(&heading.text)
            )
        })
        .collect();
    format!(r#"<nav class="notebook-toc"><ul>{items}</ul></nav>"#)
}

fn code_block(code: &CodeBlock) -> String {
    let lines: String = code
        .lines
        .iter()
        .map(|line| {
            format!(
                r#"<div class="token-line"><span class="line-number">{}</span><span class="line-content">{}</span></div>"#,
                line.number, line.html
            )
        })
        .collect();
    format!(
        r#"<div class="code-block-wrapper"><pre class="language-{lang}">{lines}</pre><button class="copy-button" data-copy="{copy}" aria-label="Copy code">Copy</button></div>"#,
        lang = escape_html(&code.language),
        copy = escape_html(&code.copy_text),
    )
}

fn cell(cell: &RenderedCell) -> String {
    match cell {
        RenderedCell::Markdown { html } => format!(
            r#"<div class="cell cell-markdown"><div class="markdown-body">{html}</div></div>"#
        ),
        RenderedCell::Code { code, output } => {
            let output = output
                .as_ref()
                .map(|text| {
                    format!(
                        r#"<div class="cell-output"><pre>{}</pre></div>"#,
                        escape_html(text)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<div class="cell cell-code">{}{output}</div>"#,
                code_block(code)
            )
        }
    }
}

/// Notebook detail page.
pub fn notebook_page(
    notebook: &Notebook,
    document: &RenderedDocument,
    source_url: &str,
    theme: Theme,
) -> String {
    let authors: String = notebook
        .authors
        .iter()
        .map(|author| {
            let verified = if author.verified {
                r#"<span class="author-verified-text">(Kotlin)</span>"#
            } else {
                ""
            };
            format!(
                r#"<div class="author-info">{}<span class="author-name">{}{verified}</span></div>"#,
                author_avatar(author, "author-avatar-small", false),
                escape_html(&author.name)
            )
        })
        .collect();
    let cells: String = document.cells.iter().map(cell).collect();
    let source_link = format!("{}{}", source_url.trim_end_matches('/'), notebook.path);

    let body = format!(
        r#"<div class="notebook-page"><div class="notebook-content-wrapper">
<aside class="notebook-sidebar">{toc}</aside>
<div class="notebook-main">
<header class="notebook-header">
<span class="notebook-date">{date}</span>
<h1 class="notebook-title">{title}</h1>
<div class="notebook-meta">
<div class="notebook-authors">{authors}</div>
<div class="notebook-actions"><a href="{source_link}" target="_blank" rel="noopener noreferrer" class="notebook-action-link">Open in GitHub</a></div>
</div>
</header>
<article class="notebook-cells">{cells}</article>
</div>
</div></div>"#,
        toc = table_of_contents(&document.outline),
        date = escape_html(&notebook.date),
        title = escape_html(&notebook.title),
        source_link = escape_html(&source_link),
    );

    let toggle = page_href(&notebook_path(&notebook.id), None, theme.toggled());
    layout(&notebook.title, theme, &toggle, &body)
}

/// Terminal error state with a way back to the catalog.
pub fn error_page(message: &str, theme: Theme) -> String {
    let body = format!(
        r#"<div class="notebook-page"><div class="notebook-error"><h2>Error</h2><p>{}</p><a href="{}" class="back-link">Back to home</a></div></div>"#,
        escape_html(message),
        escape_html(&page_href("/", None, theme))
    );
    layout("Error", theme, &page_href("/", None, theme.toggled()), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RawDocument;
    use crate::render::Renderer;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_index_lists_sections() {
        let catalog = catalog();
        let html = index_page(&catalog, None, Theme::Dark);

        assert!(html.contains("Featured cookbooks"));
        assert!(html.contains("Best to start"));
        assert!(html.contains("All Notebooks"));
        assert!(html.contains(r#"href="/notebook/weather-notebook""#));
        assert!(html.contains(r#"class="app dark""#));
        assert!(html.contains("background-color: #ef4444"));
    }

    #[test]
    fn test_selected_topic_filters_and_hides_empty_sections() {
        let catalog = catalog();
        let ktor = catalog.topic("ktor").unwrap();
        let html = index_page(&catalog, Some(ktor), Theme::Light);

        assert!(html.contains("topic-card-selected"));
        assert!(html.contains(r#"href="/notebook/http-example?theme=light""#));
        assert!(!html.contains(r#"href="/notebook/weather-notebook"#));
        assert!(!html.contains("Best to start"));
        assert!(html.contains(r#"class="app light""#));
    }

    #[test]
    fn test_notebook_page_structure() {
        let catalog = catalog();
        let notebook = catalog.notebook("basics").unwrap();
        let raw = RawDocument::from_slice(
            br##"{"cells": [
                {"cell_type": "markdown", "source": ["# Getting Started"]},
                {"cell_type": "code", "source": ["println(\"<hi>\")"], "outputs": [{"text": ["<hi>\n"]}]}
            ]}"##,
        )
        .unwrap();
        let rendered = Renderer::new("kotlin", Theme::Dark).render(&raw);

        let html = notebook_page(notebook, &rendered, "https://github.com/x/blob/main/public/", Theme::Dark);

        assert!(html.contains(r##"<a href="#getting-started" class="toc-link">Getting Started</a>"##));
        assert!(html.contains(r#"<h1 id="Getting Started">Getting Started</h1>"#));
        assert!(html.contains(r#"<span class="line-number">1</span>"#));
        assert!(html.contains(r#"data-copy="println(&quot;&lt;hi&gt;&quot;)""#));
        assert!(html.contains("<pre>&lt;hi&gt;\n</pre>"));
        assert!(html.contains(
            "https://github.com/x/blob/main/public/assets/actual_notebooks/Basics.ipynb"
        ));
        let markdown_at = html.find("cell-markdown").unwrap();
        let code_at = html.find("cell-code").unwrap();
        assert!(markdown_at < code_at);
    }

    #[test]
    fn test_verified_author_text_on_detail_page() {
        let catalog = catalog();
        let notebook = catalog.notebook("basics").unwrap();
        let rendered = Renderer::new("kotlin", Theme::Dark).render(&RawDocument::default());

        let html = notebook_page(notebook, &rendered, "https://example.com", Theme::Dark);

        assert!(html.contains(
            r#"<span class="author-name">Kotlin team<span class="author-verified-text">(Kotlin)</span></span>"#
        ));
        assert!(!html.contains(r#"class="author-verified""#));
    }

    #[test]
    fn test_ids_are_percent_encoded_in_links() {
        assert_eq!(notebook_path("plain-id"), "/notebook/plain-id");
        assert_eq!(
            notebook_path("weather notebook#2"),
            "/notebook/weather%20notebook%232"
        );
        assert_eq!(
            page_href("/", Some("a&b c"), Theme::Light),
            "/?topic=a%26b+c&theme=light"
        );
        assert_eq!(page_href("/", None, Theme::Dark), "/");

        let catalog = Catalog::from_json(
            r#"{"topics": [{"id": "q&a", "name": "Q&A", "backgroundImage": "red"}],
                "notebooks": [{"id": "my notebook", "title": "Mine", "date": "Jan 1, 2026",
                "path": "/assets/mine.ipynb"}]}"#,
        )
        .unwrap();
        let html = index_page(&catalog, None, Theme::Dark);
        assert!(html.contains(r#"href="/notebook/my%20notebook""#));
        assert!(html.contains(r#"href="/?topic=q%26a""#));
    }

    #[test]
    fn test_error_page_links_home() {
        let html = error_page("Notebook not found", Theme::Dark);
        assert!(html.contains("<p>Notebook not found</p>"));
        assert!(html.contains(r#"<a href="/" class="back-link">Back to home</a>"#));
    }
}
