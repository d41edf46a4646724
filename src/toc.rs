//! Table-of-contents construction.
//!
//! Turns a list of documents into topics and a global reading order, using
//! only the metadata each page declares about itself.
//!
//! ## Algorithm
//!
//! ```text
//! files ──read+extract──▶ [(file, PageMeta)] ──fold──▶ Accumulator ──sort──▶ TableOfContents
//! ```
//!
//! 1. Every file is read and run through [`extract`](crate::extract::extract).
//!    Reads run in parallel; results are collected back in input order and
//!    files that fail to read are dropped.
//! 2. A fold over the results, in input order, buckets each page under its
//!    topic (or [`OTHER_TOPIC`]) and tracks the longest topic-order hint list
//!    seen so far. A page's topic bar may list only some topics (a stale page),
//!    so the longest list is taken as the canonical topic order. A later list
//!    replaces the current one only if it is strictly longer.
//! 3. Pages within a topic sort by declared page index; pages without one go
//!    last; ties break by Hebrew collation of the file path.
//! 4. Topics sort by their position in the canonical order; topics missing from
//!    it follow in Hebrew collation order; [`OTHER_TOPIC`] is always last.
//! 5. Topics are concatenated into the flat reading order, which defines every
//!    page's required previous/next link.

use crate::collate;
use crate::config::ListingConfig;
use crate::extract::{self, PageMeta};
use crate::lister::{self, ListError};
use crate::types::{TableOfContents, Topic, TopicEntry};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Bucket for pages with no detectable topic ("other").
pub const OTHER_TOPIC: &str = "אחר";

/// Build a table of contents from `files`, reading each through `read_file`.
///
/// Files whose read fails are skipped; nothing else can fail.
pub fn build<F>(files: &[String], read_file: F) -> TableOfContents
where
    F: Fn(&str) -> io::Result<String> + Sync,
{
    let scanned: Vec<ScannedPage> = files
        .par_iter()
        .filter_map(|file| match read_file(file) {
            Ok(text) => {
                let meta = extract::extract(&text);
                tracing::debug!(
                    file = %file,
                    topic = %meta.topic_name,
                    page_index = ?meta.page_index,
                    hints = meta.topic_order_hints.len(),
                    "extracted page metadata"
                );
                Some(ScannedPage {
                    file: file.clone(),
                    meta,
                })
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping unreadable file");
                None
            }
        })
        .collect();

    let toc = scanned
        .into_iter()
        .fold(Accumulator::default(), Accumulator::absorb)
        .finish();

    tracing::info!(
        topics = toc.topics.len(),
        pages = toc.flat.len(),
        skipped = files.len() - toc.flat.len(),
        "built table of contents"
    );
    toc
}

/// List the documents under `root` and build their table of contents.
///
/// Only a listing failure is an error.
pub fn build_from_root(root: &Path, listing: &ListingConfig) -> Result<TableOfContents, ListError> {
    let files = lister::list_documents(root, listing)?;
    Ok(build(&files, |file| std::fs::read_to_string(root.join(file))))
}

/// The canonical topic order for a sequence of pages: the longest hint list,
/// first one wins among equally long lists.
pub fn best_topic_order(metas: &[PageMeta]) -> Vec<String> {
    metas.iter().fold(Vec::new(), |best, meta| {
        prefer_longer(best, &meta.topic_order_hints)
    })
}

fn prefer_longer(best: Vec<String>, hints: &[String]) -> Vec<String> {
    if hints.len() > best.len() {
        hints.to_vec()
    } else {
        best
    }
}

struct ScannedPage {
    file: String,
    meta: PageMeta,
}

/// Fold state. Each step consumes the previous value and returns the next.
#[derive(Default)]
struct Accumulator {
    best_topic_order: Vec<String>,
    buckets: BTreeMap<String, Vec<TopicEntry>>,
}

impl Accumulator {
    fn absorb(mut self, page: ScannedPage) -> Self {
        let ScannedPage { file, meta } = page;

        self.best_topic_order = prefer_longer(self.best_topic_order, &meta.topic_order_hints);

        let bucket = if meta.topic_name.is_empty() {
            OTHER_TOPIC.to_string()
        } else {
            meta.topic_name.clone()
        };
        let title = if meta.document_title.is_empty() {
            file.clone()
        } else {
            meta.document_title
        };

        self.buckets.entry(bucket).or_default().push(TopicEntry {
            file,
            title,
            topic: meta.topic_name,
            page_index: meta.page_index,
            page_total: meta.page_total,
        });
        self
    }

    fn finish(self) -> TableOfContents {
        let order = self.best_topic_order;

        let mut topics: Vec<Topic> = self
            .buckets
            .into_iter()
            .map(|(name, mut pages)| {
                pages.sort_by(compare_entries);
                Topic { name, pages }
            })
            .collect();
        topics.sort_by(|a, b| compare_topics(&a.name, &b.name, &order));

        let flat = topics.iter().flat_map(|t| t.pages.iter().cloned()).collect();
        TableOfContents { topics, flat }
    }
}

/// Page index ascending, missing index last, then file path.
fn compare_entries(a: &TopicEntry, b: &TopicEntry) -> Ordering {
    let index = |e: &TopicEntry| e.page_index.unwrap_or(u32::MAX);
    let missing = |e: &TopicEntry| e.page_index.is_none();
    missing(a)
        .cmp(&missing(b))
        .then_with(|| index(a).cmp(&index(b)))
        .then_with(|| collate::compare(&a.file, &b.file))
}

fn compare_topics(a: &str, b: &str, order: &[String]) -> Ordering {
    let is_other = |name: &str| name == OTHER_TOPIC;
    if is_other(a) != is_other(b) {
        return if is_other(a) {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    let position = |name: &str| order.iter().position(|t| t == name);
    match (position(a), position(b)) {
        (Some(ai), Some(bi)) => ai.cmp(&bi),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate::compare(a, b),
    }
}
