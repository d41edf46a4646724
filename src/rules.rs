//! Structural rules for worksheet pages.
//!
//! `worksheet-toc check` enforces the conventions every generated page must
//! follow. Rules apply to the documents directly in the worksheet root;
//! documents whose name matches `rules.page_pattern` (`עמוד-N.html`) are A4
//! pages and get the full set.
//!
//! | Rule | Applies to | Requirement |
//! |------|------------|-------------|
//! | `no-documents` | root | at least one document and one page file |
//! | `unreadable` | all | the file can be read as UTF-8 |
//! | `inline-css` | all | no `<style>` element, no `style` attribute |
//! | `page-structure` | pages | `main.a4-page.page-N`, `header.header-container`, `.page-title` |
//! | `stylesheets` | pages | links the base stylesheet and `<dir>/<page>.css` |
//! | `preview-nav` | pages | `nav.preview-nav`, topic bar with enough links, one active |
//! | `nav-meta` | pages | `<topic> — עמוד N / M` with a topic and `N <= M` |
//! | `title` | pages | `<title>` mentions the topic and `עמוד N` |
//! | `page-number` | pages | `div.page-number` shows `N` |
//! | `topic-numbering` | topics | one total per topic, no duplicate index, `1..=M` all present |
//! | `reading-order` | pages | `הקודם`/`הבא` link to the reading-order neighbours |
//!
//! Breaking a rule is not an error: every breach becomes a [`Violation`] in
//! the [`Report`]. Only a listing or configuration failure aborts the check.

use crate::config::{ConfigError, PreviewConfig, RulesConfig};
use crate::extract::{
    self, Document, NEXT_LABEL, NavLink, NavLinks, NavMetaLabel, PREV_LABEL,
};
use crate::lister::{self, ListError};
use crate::toc;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Listing error: {0}")]
    List(#[from] ListError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

static STYLE_ELEMENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("style").expect("valid style selector"));
static STYLE_ATTR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[style]").expect("valid style attribute selector"));
static A4_MAIN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("main.a4-page").expect("valid a4-page selector"));
static HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("header.header-container").expect("valid header selector"));
static PAGE_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".page-title").expect("valid page-title selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[href]").expect("valid link selector"));
static PREVIEW_NAV_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("nav.preview-nav").expect("valid preview-nav selector"));
static TOPIC_BAR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".preview-nav-topics").expect("valid preview-nav-topics selector")
});
static TOPIC_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.topic-link[href]").expect("valid topic-link selector"));
static ACTIVE_TOPIC_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".topic-link.is-active").expect("valid active topic selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static PAGE_NUMBER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.page-number").expect("valid page-number selector"));

static PAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^page-[0-9]+$").expect("valid page class pattern"));

/// Rule identifiers, as printed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    NoDocuments,
    Unreadable,
    InlineCss,
    PageStructure,
    Stylesheets,
    PreviewNav,
    NavMeta,
    Title,
    PageNumber,
    TopicNumbering,
    ReadingOrder,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoDocuments => "no-documents",
            Self::Unreadable => "unreadable",
            Self::InlineCss => "inline-css",
            Self::PageStructure => "page-structure",
            Self::Stylesheets => "stylesheets",
            Self::PreviewNav => "preview-nav",
            Self::NavMeta => "nav-meta",
            Self::Title => "title",
            Self::PageNumber => "page-number",
            Self::TopicNumbering => "topic-numbering",
            Self::ReadingOrder => "reading-order",
        }
    }
}

/// One rule breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Offending file, or `None` for whole-site rules.
    pub file: Option<String>,
    pub rule: Rule,
    pub message: String,
}

/// Result of a rule check.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub files_checked: usize,
    pub pages_checked: usize,
    pub violations: Vec<Violation>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of one rule.
    pub fn of_rule(&self, rule: Rule) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.rule == rule).collect()
    }

    fn push(&mut self, file: Option<&str>, rule: Rule, message: impl Into<String>) {
        self.violations.push(Violation {
            file: file.map(str::to_string),
            rule,
            message: message.into(),
        });
    }
}

/// Check the root-level documents of a worksheet.
pub fn check(root: &Path, config: &PreviewConfig) -> Result<Report, CheckError> {
    let files: Vec<String> = lister::list_documents(root, &config.document_listing())?
        .into_iter()
        .filter(|f| !f.contains('/'))
        .collect();
    let report = check_documents(&files, |f| std::fs::read_to_string(root.join(f)), &config.rules)?;
    tracing::info!(
        files = report.files_checked,
        pages = report.pages_checked,
        violations = report.violations.len(),
        "rule check finished"
    );
    Ok(report)
}

/// Check `files` (already listed, in reading-list order) through `read_file`.
pub fn check_documents<F>(
    files: &[String],
    read_file: F,
    rules: &RulesConfig,
) -> Result<Report, ConfigError>
where
    F: Fn(&str) -> io::Result<String>,
{
    let page_pattern = rules.page_regex()?;
    let mut report = Report::default();

    if files.is_empty() {
        report.push(None, Rule::NoDocuments, "no documents found in the worksheet root");
        return Ok(report);
    }

    let mut page_files = Vec::new();
    let mut page_texts: HashMap<String, String> = HashMap::new();
    let mut nav_by_file: HashMap<String, NavLinks> = HashMap::new();
    let mut numbering = TopicNumbering::default();

    for file in files {
        report.files_checked += 1;
        let text = match read_file(file) {
            Ok(text) => text,
            Err(err) => {
                report.push(Some(file), Rule::Unreadable, format!("cannot read file: {err}"));
                continue;
            }
        };
        let doc = Document::parse(&text);
        check_inline_css(file, &doc, &mut report);

        if !page_pattern.is_match(file) {
            continue;
        }
        report.pages_checked += 1;
        if let Some(label) = check_page(file, &doc, rules, &mut report) {
            numbering.record(file, &label, &mut report);
        }
        nav_by_file.insert(file.clone(), doc.nav_links());
        page_files.push(file.clone());
        page_texts.insert(file.clone(), text);
    }

    if page_files.is_empty() {
        report.push(
            None,
            Rule::NoDocuments,
            format!("no page files matching {}", rules.page_pattern),
        );
        return Ok(report);
    }

    numbering.check_coverage(&mut report);
    check_reading_order(&page_files, &page_texts, &nav_by_file, &mut report);
    Ok(report)
}

fn check_inline_css(file: &str, doc: &Document, report: &mut Report) {
    if doc.html().select(&STYLE_ELEMENT_SELECTOR).next().is_some() {
        report.push(Some(file), Rule::InlineCss, "inline <style> element is forbidden");
    }
    if doc.html().select(&STYLE_ATTR_SELECTOR).next().is_some() {
        report.push(Some(file), Rule::InlineCss, "inline style=\"...\" attribute is forbidden");
    }
}

/// Per-page rules. Returns the nav-meta label when it is valid.
fn check_page(
    file: &str,
    doc: &Document,
    rules: &RulesConfig,
    report: &mut Report,
) -> Option<NavMetaLabel> {
    let html = doc.html();
    let present = |selector: &Selector| html.select(selector).next().is_some();

    // Structure
    let has_a4_main = html
        .select(&A4_MAIN_SELECTOR)
        .any(|main| main.value().classes().any(|c| PAGE_CLASS.is_match(c)));
    if !has_a4_main {
        report.push(Some(file), Rule::PageStructure, "missing <main class=\"a4-page page-N\">");
    }
    if !present(&HEADER_SELECTOR) {
        report.push(Some(file), Rule::PageStructure, "missing .header-container");
    }
    if !present(&PAGE_TITLE_SELECTOR) {
        report.push(Some(file), Rule::PageStructure, "missing .page-title");
    }

    // Stylesheets
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let page_css = format!("{}/{}.css", rules.page_stylesheet_dir.trim_end_matches('/'), stem);
    for href in [rules.base_stylesheet.as_str(), page_css.as_str()] {
        if !links_stylesheet(doc, href) {
            report.push(Some(file), Rule::Stylesheets, format!("missing {href} stylesheet link"));
        }
    }

    // Preview navigation
    if !present(&PREVIEW_NAV_SELECTOR) {
        report.push(Some(file), Rule::PreviewNav, "missing .preview-nav");
    }
    if !present(&TOPIC_BAR_SELECTOR) {
        report.push(Some(file), Rule::PreviewNav, "missing .preview-nav-topics");
    }
    let topic_links = html.select(&TOPIC_LINK_SELECTOR).count();
    if topic_links < rules.min_topic_links {
        report.push(
            Some(file),
            Rule::PreviewNav,
            format!(
                "expected >= {} .topic-link entries, found {topic_links}",
                rules.min_topic_links
            ),
        );
    }
    if !present(&ACTIVE_TOPIC_SELECTOR) {
        report.push(
            Some(file),
            Rule::PreviewNav,
            "expected an active .topic-link (is-active) for the current topic",
        );
    }

    // Topic/page meta
    let Some(meta_text) = doc.nav_meta_text() else {
        report.push(Some(file), Rule::NavMeta, "missing .nav-meta");
        return None;
    };
    let Some(label) = extract::parse_nav_meta(&meta_text) else {
        report.push(
            Some(file),
            Rule::NavMeta,
            format!("cannot parse .nav-meta \"{meta_text}\" as \"<topic> — עמוד N / M\""),
        );
        return None;
    };
    let mut valid = true;
    if label.topic.is_empty() {
        report.push(Some(file), Rule::NavMeta, "topic name in .nav-meta is empty");
        valid = false;
    }
    if label.index > label.total {
        report.push(
            Some(file),
            Rule::NavMeta,
            format!("page index {} > page total {} in .nav-meta", label.index, label.total),
        );
        valid = false;
    }

    // Title reflects per-topic numbering, not the file's global number.
    let title = html
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| extract::collapse_whitespace(&extract::element_text(t)));
    match title {
        None => report.push(Some(file), Rule::Title, "missing <title>"),
        Some(title) => {
            let page_marker = format!("עמוד {}", label.index);
            if !title.contains(&page_marker) {
                report.push(
                    Some(file),
                    Rule::Title,
                    format!("<title> must include per-topic page index \"{page_marker}\""),
                );
            }
            if !label.topic.is_empty() && !title.contains(&label.topic) {
                report.push(
                    Some(file),
                    Rule::Title,
                    format!("<title> must include topic name \"{}\"", label.topic),
                );
            }
        }
    }

    let page_number = html
        .select(&PAGE_NUMBER_SELECTOR)
        .next()
        .map(|el| extract::collapse_whitespace(&extract::element_text(el)));
    match page_number {
        None => report.push(Some(file), Rule::PageNumber, "missing div.page-number"),
        Some(number) if number.parse::<u32>().ok() != Some(label.index) => report.push(
            Some(file),
            Rule::PageNumber,
            format!(
                ".page-number \"{number}\" must equal nav-meta page index {}",
                label.index
            ),
        ),
        Some(_) => {}
    }

    valid.then_some(label)
}

fn links_stylesheet(doc: &Document, href: &str) -> bool {
    doc.html().select(&LINK_SELECTOR).any(|link| {
        let el = link.value();
        let is_stylesheet = el
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")));
        is_stylesheet && el.attr("href").is_some_and(|h| h.trim() == href)
    })
}

/// Page numbers seen per topic.
#[derive(Default)]
struct TopicNumbering {
    topics: BTreeMap<String, TopicPages>,
}

struct TopicPages {
    total: u32,
    pages: BTreeMap<u32, String>,
}

impl TopicNumbering {
    fn record(&mut self, file: &str, label: &NavMetaLabel, report: &mut Report) {
        let topic = self
            .topics
            .entry(label.topic.clone())
            .or_insert_with(|| TopicPages {
                total: label.total,
                pages: BTreeMap::new(),
            });

        if topic.total != label.total {
            report.push(
                Some(file),
                Rule::TopicNumbering,
                format!(
                    "page total {} differs from {} declared earlier in topic \"{}\"",
                    label.total, topic.total, label.topic
                ),
            );
        }
        if let Some(existing) = topic.pages.get(&label.index) {
            report.push(
                Some(file),
                Rule::TopicNumbering,
                format!(
                    "duplicate page index {} within topic \"{}\" (already used by {existing})",
                    label.index, label.topic
                ),
            );
            return;
        }
        topic.pages.insert(label.index, file.to_string());
    }

    /// Every topic must cover `1..=total`.
    fn check_coverage(&self, report: &mut Report) {
        for (name, topic) in &self.topics {
            for index in (1..=topic.total).filter(|i| !topic.pages.contains_key(i)) {
                report.push(
                    None,
                    Rule::TopicNumbering,
                    format!("topic \"{name}\": missing page index {index} / {}", topic.total),
                );
            }
        }
    }
}

/// Prev/next links must follow the flattened reading order of the pages.
fn check_reading_order(
    page_files: &[String],
    page_texts: &HashMap<String, String>,
    nav_by_file: &HashMap<String, NavLinks>,
    report: &mut Report,
) {
    let toc = toc::build(page_files, |file| {
        page_texts
            .get(file)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, file.to_string()))
    });

    for entry in &toc.flat {
        let (Some(nav), Some((prev, next))) =
            (nav_by_file.get(&entry.file), toc.neighbours(&entry.file))
        else {
            continue;
        };
        let prev = prev.map(|e| e.file.as_str());
        let next = next.map(|e| e.file.as_str());

        check_neighbour(&entry.file, PREV_LABEL, &nav.prev, prev, "first", report);
        check_neighbour(&entry.file, NEXT_LABEL, &nav.next, next, "last", report);
    }
}

fn check_neighbour(
    file: &str,
    label: &str,
    link: &NavLink,
    expected: Option<&str>,
    edge: &str,
    report: &mut Report,
) {
    match expected {
        None if !link.disabled => report.push(
            Some(file),
            Rule::ReadingOrder,
            format!("{edge} page must have disabled \"{label}\""),
        ),
        Some(target) if link.href != target => report.push(
            Some(file),
            Rule::ReadingOrder,
            if link.href.is_empty() {
                format!("\"{label}\" must link to {target}, but no link was found")
            } else {
                format!("\"{label}\" must link to {target}, found {}", link.href)
            },
        ),
        _ => {}
    }
}
