//! Reader page generation.
//!
//! Renders the table of contents into a static, right-to-left Hebrew page
//! (by default `preview/index.html`) that a student opens to browse the
//! worksheet:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ תוכן עניינים                                  │
//! │ [חוקיות] [שברים] [גאומטריה] [אחר]            │  ← nav.reader-topics#topicButtons
//! ├──────────────────────────────────────────────┤
//! │ חוקיות                                        │  ← section.reader-topic
//! │   עמוד 1 / 2  חוקיות — עמוד 1                 │
//! │   עמוד 2 / 2  חוקיות — עמוד 2                 │
//! │ …                                             │
//! ├──────────────────────────────────────────────┤
//! │ 1. חוקיות — עמוד 1                            │  ← ol.reader-order
//! │ 2. …                                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Links are relative to the reader file, so the page works when opened
//! straight from disk. Styling comes only from the linked stylesheet: the
//! reader must pass the same `inline-css` rule as the worksheet pages.

use crate::config::{PreviewConfig, ReaderConfig};
use crate::lister::ListError;
use crate::toc;
use crate::types::{TableOfContents, TopicEntry};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Listing error: {0}")]
    List(#[from] ListError),
}

/// Build the table of contents for `root` and write the reader page to
/// `root/output`. Returns the table that was rendered.
pub fn generate(
    root: &Path,
    output: &Path,
    config: &PreviewConfig,
) -> Result<TableOfContents, GenerateError> {
    let reader = ReaderConfig {
        output: output.to_string_lossy().replace('\\', "/"),
        ..config.reader.clone()
    };
    // A reader written outside an ignored directory must not list itself.
    let toc = toc::build_from_root(root, &config.listing.excluding(&reader.output))?;

    let page = render_reader(&toc, &reader);

    let target = root.join(output);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, page.into_string())?;
    tracing::info!(
        output = %target.display(),
        topics = toc.topics.len(),
        pages = toc.flat.len(),
        "reader page written"
    );
    Ok(toc)
}

/// Prefix that leads from the reader file back to the worksheet root.
///
/// `preview/index.html` → `../`, `index.html` → ``.
fn root_prefix(reader_output: &str) -> String {
    let depth = Path::new(reader_output)
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    "../".repeat(depth)
}

/// Stylesheet href as seen from the reader file. Absolute URLs pass through.
fn stylesheet_href(stylesheet: &str, prefix: &str) -> String {
    if stylesheet.starts_with('/') || stylesheet.contains("://") {
        stylesheet.to_string()
    } else {
        format!("{prefix}{stylesheet}")
    }
}

/// Render the reader page.
pub fn render_reader(toc: &TableOfContents, reader: &ReaderConfig) -> Markup {
    let prefix = root_prefix(&reader.output);
    let href = |entry: &TopicEntry| format!("{}{}", prefix, entry.file);

    html! {
        (DOCTYPE)
        html lang="he" dir="rtl" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (reader.title) }
                link rel="stylesheet" href=(stylesheet_href(&reader.stylesheet, &prefix));
            }
            body.reader {
                header.reader-header {
                    h1.reader-title { (reader.title) }
                    nav.reader-topics id="topicButtons" {
                        @for topic in &toc.topics {
                            @if let Some(first) = topic.pages.first() {
                                a.reader-topicBtn href=(href(first)) { (topic.name) }
                            }
                        }
                    }
                }
                main.reader-content {
                    @if toc.flat.is_empty() {
                        p.reader-empty { "לא נמצאו עמודים" }
                    }
                    @for topic in &toc.topics {
                        section.reader-topic {
                            h2 { (topic.name) }
                            ul.reader-pages {
                                @for entry in &topic.pages {
                                    li {
                                        @if let Some(label) = page_label(entry) {
                                            span.reader-pageLabel { (label) }
                                            " "
                                        }
                                        a href=(href(entry)) { (entry.title) }
                                    }
                                }
                            }
                        }
                    }
                    @if !toc.flat.is_empty() {
                        section.reader-orderSection {
                            h2 { "סדר קריאה" }
                            ol.reader-order {
                                @for entry in &toc.flat {
                                    li { a href=(href(entry)) { (entry.title) } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// `עמוד i / n`, or `עמוד i` when the total is unknown.
fn page_label(entry: &TopicEntry) -> Option<String> {
    match (entry.page_index, entry.page_total) {
        (Some(i), Some(n)) => Some(format!("עמוד {i} / {n}")),
        (Some(i), None) => Some(format!("עמוד {i}")),
        _ => None,
    }
}
