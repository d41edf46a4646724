//! Page metadata extraction.
//!
//! Every worksheet page carries its own navigation widget. The extractor reads
//! four things out of a page:
//!
//! ```html
//! <title>חוקיות — עמוד 3</title>                      ← document title
//! <nav class="preview-nav">
//!   <div class="preview-nav-topics">                   ← topic order hints
//!     <a class="topic-link is-active" href="…">חוקיות</a>
//!     <a class="topic-link" href="…">שברים</a>
//!   </div>
//!   <a class="nav-link" href="עמוד-2.html">הקודם</a>    ← prev/next links
//!   <div class="nav-meta">חוקיות — עמוד 3 / 4</div>    ← topic + page N / M
//!   <span class="nav-link is-disabled">הבא</span>
//! </nav>
//! ```
//!
//! Pages are parsed into a real element tree (via `scraper`) and queried by
//! element and class, so an unrelated anchor or `div` elsewhere in the page
//! can never be mistaken for part of the navigation widget.
//!
//! Extraction never fails: missing or malformed fields come back empty or
//! `None`, and the page still takes part in the table of contents.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Label of the "previous page" navigation link.
pub const PREV_LABEL: &str = "הקודם";
/// Label of the "next page" navigation link.
pub const NEXT_LABEL: &str = "הבא";

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static NAV_META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".nav-meta").expect("valid nav-meta selector"));
static TOPIC_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".preview-nav-topics").expect("valid preview-nav-topics selector")
});
static TOPIC_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.topic-link").expect("valid topic-link selector"));
static NAV_ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.nav-link[href]").expect("valid nav-link selector"));
static NAV_DISABLED_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".nav-link.is-disabled").expect("valid disabled nav-link selector")
});

/// `<topic> — עמוד <index> / <total>`, anchored on both ends.
static NAV_META_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*—\s*עמוד\s*([0-9]+)\s*/\s*([0-9]+)\s*$")
        .expect("valid nav-meta pattern")
});

/// Metadata declared by a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Text of the first `<title>`, whitespace-collapsed. Empty if absent.
    pub document_title: String,
    /// Topic label from the nav-meta line. Empty if undetected.
    pub topic_name: String,
    /// 1-based position within the topic.
    pub page_index: Option<u32>,
    /// Declared number of pages in the topic.
    pub page_total: Option<u32>,
    /// Topic names listed in this page's own topic bar, in document order.
    pub topic_order_hints: Vec<String>,
}

/// One prev/next navigation link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLink {
    /// Link target. Empty when the link is missing or disabled.
    pub href: String,
    /// True when the page renders the label as a disabled placeholder.
    pub disabled: bool,
}

/// The previous/next links of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLinks {
    pub prev: NavLink,
    pub next: NavLink,
}

/// A parsed page, for callers that need several queries on the same markup.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Underlying element tree, for structural checks.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Extract the page metadata.
    pub fn meta(&self) -> PageMeta {
        let document_title = self
            .html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| collapse_whitespace(&strip_markup(&element_text(title))))
            .unwrap_or_default();

        let (topic_name, page_index, page_total) = match self.nav_meta_text() {
            Some(text) => match parse_nav_meta(&text) {
                Some(label) => (label.topic, Some(label.index), Some(label.total)),
                None => (String::new(), None, None),
            },
            None => (String::new(), None, None),
        };

        PageMeta {
            document_title,
            topic_name,
            page_index,
            page_total,
            topic_order_hints: self.topic_order_hints(),
        }
    }

    /// Whitespace-collapsed text of the first `.nav-meta` element.
    pub fn nav_meta_text(&self) -> Option<String> {
        self.html
            .select(&NAV_META_SELECTOR)
            .next()
            .map(|el| collapse_whitespace(&element_text(el)))
    }

    /// Topic labels from the first topic bar only.
    fn topic_order_hints(&self) -> Vec<String> {
        let Some(block) = self.html.select(&TOPIC_BLOCK_SELECTOR).next() else {
            return Vec::new();
        };
        block
            .select(&TOPIC_LINK_SELECTOR)
            .map(|link| collapse_whitespace(&element_text(link)))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Extract the prev/next links.
    pub fn nav_links(&self) -> NavLinks {
        NavLinks {
            prev: self.nav_link(PREV_LABEL),
            next: self.nav_link(NEXT_LABEL),
        }
    }

    fn nav_link(&self, label: &str) -> NavLink {
        let anchor = self
            .html
            .select(&NAV_ANCHOR_SELECTOR)
            .find(|a| collapse_whitespace(&element_text(*a)) == label)
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = anchor {
            return NavLink {
                href: href.trim().to_string(),
                disabled: false,
            };
        }

        let disabled = self
            .html
            .select(&NAV_DISABLED_SELECTOR)
            .any(|el| collapse_whitespace(&element_text(el)) == label);
        NavLink {
            href: String::new(),
            disabled,
        }
    }
}

/// Extract the metadata of one page. Never fails.
pub fn extract(html: &str) -> PageMeta {
    Document::parse(html).meta()
}

/// A parsed `<topic> — עמוד <index> / <total>` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavMetaLabel {
    pub topic: String,
    pub index: u32,
    pub total: u32,
}

/// Parse a nav-meta label. All-or-nothing: any mismatch, a number that does
/// not fit in `u32`, or a zero yields `None`.
pub fn parse_nav_meta(text: &str) -> Option<NavMetaLabel> {
    let caps = NAV_META_PATTERN.captures(text)?;
    let index: u32 = caps[2].parse().ok()?;
    let total: u32 = caps[3].parse().ok()?;
    if index == 0 || total == 0 {
        return None;
    }
    Some(NavMetaLabel {
        topic: caps[1].trim().to_string(),
        index,
        total,
    })
}

/// Concatenated text content of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Strip angle-bracket spans (simple, no parsing; tolerates broken markup).
pub(crate) fn strip_markup(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
