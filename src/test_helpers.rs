//! Shared test utilities for the worksheet-toc test suite.
//!
//! Provides fixture setup, page builders, lookup helpers, and reading-order
//! assertions that work with [`TableOfContents`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let toc = build_from_root(tmp.path(), &ListingConfig::default()).unwrap();
//!
//! assert_eq!(topic_names(&toc), vec!["חוקיות", "שברים", "גאומטריה", "אחר"]);
//! assert_topics_contiguous(&toc);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{TableOfContents, TopicEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Page builders
// =========================================================================

/// Minimal page with a nav-meta label and an optional topic bar.
pub fn worksheet_page(topic: &str, index: u32, total: u32, hints: &[&str]) -> String {
    let topic_bar = if hints.is_empty() {
        String::new()
    } else {
        let links: String = hints
            .iter()
            .map(|h| format!(r#"<a class="topic-link" href="{h}.html">{h}</a>"#))
            .collect();
        format!(r#"<div class="preview-nav-topics">{links}</div>"#)
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="he" dir="rtl">
<head><title>{topic} — עמוד {index}</title></head>
<body>
<nav class="preview-nav">{topic_bar}<div class="nav-meta">{topic} — עמוד {index} / {total}</div></nav>
</body>
</html>"#
    )
}

/// Page without navigation. An empty `title` omits the `<title>` element.
pub fn bare_page(title: &str) -> String {
    let head = if title.is_empty() {
        String::new()
    } else {
        format!("<title>{title}</title>")
    };
    format!("<!DOCTYPE html><html><head>{head}</head><body><p>תוכן</p></body></html>")
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a flat entry by file. Panics if not found.
pub fn find_entry<'a>(toc: &'a TableOfContents, file: &str) -> &'a TopicEntry {
    toc.flat.iter().find(|e| e.file == file).unwrap_or_else(|| {
        let files = flat_files(toc);
        panic!("entry '{file}' not found. Available: {files:?}")
    })
}

/// Topic names in table order.
pub fn topic_names(toc: &TableOfContents) -> Vec<&str> {
    toc.topics.iter().map(|t| t.name.as_str()).collect()
}

/// Files in flat reading order.
pub fn flat_files(toc: &TableOfContents) -> Vec<&str> {
    toc.flat.iter().map(|e| e.file.as_str()).collect()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert that entries of one topic are never separated by another topic.
pub fn assert_topics_contiguous(toc: &TableOfContents) {
    let mut seen: Vec<&str> = Vec::new();
    for entry in &toc.flat {
        let topic = entry.topic.as_str();
        match seen.last() {
            Some(last) if *last == topic => {}
            _ => {
                assert!(
                    !seen.contains(&topic),
                    "topic '{topic}' is split in flat order: {:?}",
                    flat_files(toc)
                );
                seen.push(topic);
            }
        }
    }
}
