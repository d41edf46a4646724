//! # Worksheet TOC
//!
//! Table-of-contents tooling for Hebrew A4 worksheet sites. Each worksheet
//! page is a standalone HTML file that declares its own topic and position
//! in a navigation widget; this crate reads those declarations back out and
//! assembles them into a topic-grouped table of contents and a flat reading
//! order.
//!
//! # Architecture: Declarations In, Order Out
//!
//! ```text
//! 1. List      root/      →  ["עמוד-1.html", …, "rules.html"]   (Hebrew collation)
//! 2. Extract   page HTML  →  PageMeta                            (title, topic, N / M, hints)
//! 3. Build     [PageMeta] →  TableOfContents                     (topics + flat order)
//! ```
//!
//! The table feeds three consumers: `toc` prints it (text or JSON),
//! `check` compares every page's prev/next links against it, and
//! `generate` renders it into a static reader page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`lister`] | Walks the worksheet root, applies ignore rules, sorts with [`collate`] |
//! | [`extract`] | Reads title, nav-meta label, topic bar and prev/next links from one page |
//! | [`toc`] | Folds page metadata into a [`types::TableOfContents`] |
//! | [`rules`] | Structural page rules and reading-order verification |
//! | [`generate`] | Renders the reader page with Maud |
//! | [`config`] | `preview.toml` loading, merging and validation |
//! | [`collate`] | Hebrew-aware string ordering |
//! | [`types`] | Table of contents types, serialized as the JSON output |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pages Are the Source of Truth
//!
//! There is no manifest listing the topics. Topic membership and numbering
//! come from each page's `.nav-meta` label, and topic order from the longest
//! topic bar any page carries. A page that declares nothing still appears,
//! under `אחר` at the end.
//!
//! ## Element Tree, Not Regex
//!
//! Pages are parsed with `scraper` and queried by element and class. A stray
//! `topic-link` anchor outside the topic bar, or a `nav-meta` div nested in
//! unrelated markup, cannot shift a page into the wrong topic.
//!
//! ## Hebrew Collation
//!
//! File names and fallback topic order use [`collate::compare`]: niqqud and
//! final letter forms do not affect the primary order, and Hebrew names sort
//! before Latin ones, as in the `he` locale.

pub mod collate;
pub mod config;
pub mod extract;
pub mod generate;
pub mod lister;
pub mod output;
pub mod rules;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
