//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with the semantic identity of each entity (topic name, page
//! title, positional index) and shows file paths as secondary context via
//! indented `Source:` lines. Read top to bottom, it is the table of contents
//! a student would see.
//!
//! # Output Format
//!
//! ## Toc
//!
//! ```text
//! Topics
//! 001 חוקיות (2 pages)
//!     001 חוקיות — עמוד 1
//!         Source: עמוד-1.html
//!         Page: 1 / 2
//!     002 חוקיות — עמוד 2
//!         Source: עמוד-2.html
//!         Page: 2 / 2
//! 002 אחר (1 page)
//!     001 rules.html
//!
//! 3 pages in reading order
//! ```
//!
//! ## Check
//!
//! ```text
//! Site
//!     [topic-numbering] topic "שברים": missing page index 2 / 2
//! עמוד-1.html
//!     [reading-order] "הבא" must link to עמוד-2.html, found עמוד-3.html
//!
//! Checked 5 files (4 pages): 2 violations
//! ```
//!
//! ## Generate
//!
//! ```text
//! Reader → preview/index.html
//! Generated 4 topics, 5 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::rules::Report;
use crate::types::{TableOfContents, TopicEntry};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Positional index + topic name + page count.
///
/// ```text
/// 001 חוקיות (2 pages)
/// ```
fn topic_header(index: usize, name: &str, pages: usize) -> String {
    format!("{} {} ({})", format_index(index), name, plural(pages, "page", "pages"))
}

/// Lines for one page: header, then `Source:` unless the title already is
/// the file name, then the page position when declared.
fn page_lines(index: usize, entry: &TopicEntry, depth: usize) -> Vec<String> {
    let mut lines = vec![format!("{}{} {}", indent(depth), format_index(index), entry.title)];
    if entry.title != entry.file {
        lines.push(format!("{}Source: {}", indent(depth + 1), entry.file));
    }
    match (entry.page_index, entry.page_total) {
        (Some(i), Some(n)) => lines.push(format!("{}Page: {} / {}", indent(depth + 1), i, n)),
        (Some(i), None) => lines.push(format!("{}Page: {}", indent(depth + 1), i)),
        _ => {}
    }
    lines
}

// ============================================================================
// Toc
// ============================================================================

pub fn format_toc_output(toc: &TableOfContents) -> Vec<String> {
    let mut lines = vec!["Topics".to_string()];
    for (t, topic) in toc.topics.iter().enumerate() {
        lines.push(topic_header(t + 1, &topic.name, topic.pages.len()));
        for (p, entry) in topic.pages.iter().enumerate() {
            lines.extend(page_lines(p + 1, entry, 1));
        }
    }
    lines.push(String::new());
    lines.push(format!("{} in reading order", plural(toc.flat.len(), "page", "pages")));
    lines
}

pub fn print_toc_output(toc: &TableOfContents) {
    for line in format_toc_output(toc) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Violations grouped by file, site-wide ones first under `Site`.
pub fn format_check_output(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();

    let mut groups: Vec<(Option<&str>, Vec<String>)> = Vec::new();
    for v in &report.violations {
        let line = format!("{}[{}] {}", indent(1), v.rule.as_str(), v.message);
        let key = v.file.as_deref();
        match groups.iter_mut().find(|(file, _)| *file == key) {
            Some((_, group)) => group.push(line),
            None => groups.push((key, vec![line])),
        }
    }
    groups.sort_by_key(|(file, _)| file.is_some());

    for (file, group) in groups {
        lines.push(file.unwrap_or("Site").to_string());
        lines.extend(group);
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    let summary = if report.is_clean() {
        "all rules pass".to_string()
    } else {
        plural(report.violations.len(), "violation", "violations")
    };
    lines.push(format!(
        "Checked {} ({}): {}",
        plural(report.files_checked, "file", "files"),
        plural(report.pages_checked, "page", "pages"),
        summary
    ));
    lines
}

pub fn print_check_output(report: &Report) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(toc: &TableOfContents, output: &Path) -> Vec<String> {
    vec![
        format!("Reader → {}", output.display()),
        format!(
            "Generated {}, {}",
            plural(toc.topics.len(), "topic", "topics"),
            plural(toc.flat.len(), "page", "pages")
        ),
    ]
}

pub fn print_generate_output(toc: &TableOfContents, output: &Path) {
    for line in format_generate_output(toc, output) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, Violation};
    use crate::types::Topic;

    fn entry(file: &str, title: &str, topic: &str, index: Option<u32>, total: Option<u32>) -> TopicEntry {
        TopicEntry {
            file: file.to_string(),
            title: title.to_string(),
            topic: topic.to_string(),
            page_index: index,
            page_total: total,
        }
    }

    fn sample_toc() -> TableOfContents {
        let first = entry("עמוד-1.html", "חוקיות — עמוד 1", "חוקיות", Some(1), Some(2));
        let second = entry("עמוד-2.html", "חוקיות — עמוד 2", "חוקיות", Some(2), Some(2));
        let rules = entry("rules.html", "rules.html", "", None, None);
        TableOfContents {
            topics: vec![
                Topic {
                    name: "חוקיות".to_string(),
                    pages: vec![first.clone(), second.clone()],
                },
                Topic {
                    name: "אחר".to_string(),
                    pages: vec![rules.clone()],
                },
            ],
            flat: vec![first, second, rules],
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn topic_header_singular_and_plural() {
        assert_eq!(topic_header(1, "שברים", 1), "001 שברים (1 page)");
        assert_eq!(topic_header(2, "חוקיות", 3), "002 חוקיות (3 pages)");
    }

    #[test]
    fn page_lines_hide_source_when_title_is_file() {
        let lines = page_lines(1, &entry("rules.html", "rules.html", "", None, None), 1);
        assert_eq!(lines, vec!["    001 rules.html"]);
    }

    #[test]
    fn page_lines_index_without_total() {
        let lines = page_lines(2, &entry("a.html", "א", "ת", Some(2), None), 0);
        assert_eq!(lines, vec!["002 א", "    Source: a.html", "    Page: 2"]);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    #[test]
    fn toc_output_lists_topics_then_pages() {
        let lines = format_toc_output(&sample_toc());
        assert_eq!(
            lines,
            vec![
                "Topics",
                "001 חוקיות (2 pages)",
                "    001 חוקיות — עמוד 1",
                "        Source: עמוד-1.html",
                "        Page: 1 / 2",
                "    002 חוקיות — עמוד 2",
                "        Source: עמוד-2.html",
                "        Page: 2 / 2",
                "002 אחר (1 page)",
                "    001 rules.html",
                "",
                "3 pages in reading order",
            ]
        );
    }

    #[test]
    fn clean_check_output_is_summary_only() {
        let report = Report {
            files_checked: 5,
            pages_checked: 4,
            violations: vec![],
        };
        assert_eq!(
            format_check_output(&report),
            vec!["Checked 5 files (4 pages): all rules pass"]
        );
    }

    #[test]
    fn check_output_groups_by_file_site_first() {
        let violation = |file: Option<&str>, rule, message: &str| Violation {
            file: file.map(str::to_string),
            rule,
            message: message.to_string(),
        };
        let report = Report {
            files_checked: 2,
            pages_checked: 1,
            violations: vec![
                violation(Some("עמוד-1.html"), Rule::Title, "missing <title>"),
                violation(None, Rule::TopicNumbering, "gap"),
                violation(Some("עמוד-1.html"), Rule::PageNumber, "missing div.page-number"),
            ],
        };
        assert_eq!(
            format_check_output(&report),
            vec![
                "Site",
                "    [topic-numbering] gap",
                "עמוד-1.html",
                "    [title] missing <title>",
                "    [page-number] missing div.page-number",
                "",
                "Checked 2 files (1 page): 3 violations",
            ]
        );
    }

    #[test]
    fn generate_output_counts() {
        let lines = format_generate_output(&sample_toc(), Path::new("preview/index.html"));
        assert_eq!(
            lines,
            vec!["Reader → preview/index.html", "Generated 2 topics, 3 pages"]
        );
    }
}
