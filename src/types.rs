//! Table-of-contents types.
//!
//! These are serialized as the JSON payload of `worksheet-toc toc --json` and
//! read back by anything that renders navigation, so field names are camelCase
//! and absent page numbers serialize as `null` rather than being omitted.

use serde::{Deserialize, Serialize};

/// One page within a topic listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntry {
    /// Path relative to the worksheet root, `/`-separated
    pub file: String,
    /// Document title, or `file` when the page has none
    pub title: String,
    /// Topic as declared by the page; empty if undetected
    pub topic: String,
    pub page_index: Option<u32>,
    pub page_total: Option<u32>,
}

/// A named group of pages, already in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub pages: Vec<TopicEntry>,
}

/// Topics in canonical order plus the flattened global reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub topics: Vec<Topic>,
    /// Concatenation of every topic's pages, in topic order.
    pub flat: Vec<TopicEntry>,
}

impl TableOfContents {
    /// Find a topic by name.
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Reading-order neighbours of `file`: `(previous, next)`.
    ///
    /// Returns `None` if `file` is not part of the table of contents.
    pub fn neighbours(&self, file: &str) -> Option<(Option<&TopicEntry>, Option<&TopicEntry>)> {
        let pos = self.flat.iter().position(|e| e.file == file)?;
        let prev = pos.checked_sub(1).and_then(|i| self.flat.get(i));
        let next = self.flat.get(pos + 1);
        Some((prev, next))
    }
}
