//! Document discovery.
//!
//! Walks a worksheet root and returns every document as a root-relative,
//! `/`-separated path, sorted with Hebrew collation:
//!
//! ```text
//! worksheet/
//! ├── עמוד-1.html             → "עמוד-1.html"
//! ├── rules.html              → "rules.html"
//! ├── extra/
//! │   └── notes.html          → "extra/notes.html"
//! ├── styles/a4-base.css      (not a document)
//! ├── node_modules/…          (ignored)
//! └── preview/index.html      (ignored: generated reader page)
//! ```
//!
//! An ignore entry matches the path itself and everything beneath it, so
//! `preview` skips `preview/` but not `preview-notes.html`.

use crate::collate;
use crate::config::ListingConfig;
use std::path::Path;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ListError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// List every document under `root`.
pub fn list_documents(root: &Path, config: &ListingConfig) -> Result<Vec<String>, ListError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_ignored_path(&relative_path(root, e), &config.ignore));

    for entry in walker {
        let entry = entry.map_err(|source| ListError::Walk {
            path: source
                .path()
                .unwrap_or(root)
                .display()
                .to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_document_extension(entry.path(), &config.extensions) {
            files.push(relative_path(root, &entry));
        }
    }

    files.sort_by(|a, b| collate::compare(a, b));
    tracing::debug!(count = files.len(), root = %root.display(), "listed documents");
    Ok(files)
}

/// True if `rel_path` equals an ignore entry or lies beneath one.
pub fn is_ignored_path(rel_path: &str, ignore: &[String]) -> bool {
    let normalized = rel_path.replace('\\', "/");
    ignore.iter().any(|dir| {
        let dir = dir.trim_end_matches('/');
        normalized == dir
            || normalized
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn has_document_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(&ext)))
}

fn relative_path(root: &Path, entry: &DirEntry) -> String {
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    fn ignore(dirs: &[&str]) -> Vec<String> {
        dirs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn ignored_path_matches_dir_and_children() {
        let ig = ignore(&[".git", "preview"]);
        assert!(is_ignored_path(".git", &ig));
        assert!(is_ignored_path(".git/config", &ig));
        assert!(is_ignored_path("preview/index.html", &ig));
        assert!(!is_ignored_path("preview-notes.html", &ig));
        assert!(!is_ignored_path("עמוד-1.html", &ig));
    }

    #[test]
    fn ignored_path_normalizes_backslashes() {
        assert!(is_ignored_path("node_modules\\pkg\\a.html", &ignore(&["node_modules"])));
    }

    #[test]
    fn lists_only_documents() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "עמוד-1.html");
        touch(tmp.path(), "styles/a4-base.css");
        touch(tmp.path(), "script.mjs");

        let files = list_documents(tmp.path(), &ListingConfig::default()).unwrap();
        assert_eq!(files, vec!["עמוד-1.html"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "UPPER.HTML");

        let files = list_documents(tmp.path(), &ListingConfig::default()).unwrap();
        assert_eq!(files, vec!["UPPER.HTML"]);
    }

    #[test]
    fn skips_ignored_directories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "עמוד-1.html");
        touch(tmp.path(), "node_modules/pkg/readme.html");
        touch(tmp.path(), ".git/hooks/index.html");
        touch(tmp.path(), "preview/index.html");

        let files = list_documents(tmp.path(), &ListingConfig::default()).unwrap();
        assert_eq!(files, vec!["עמוד-1.html"]);
    }

    #[test]
    fn nested_paths_use_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "extra/deeper/notes.html");

        let files = list_documents(tmp.path(), &ListingConfig::default()).unwrap();
        assert_eq!(files, vec!["extra/deeper/notes.html"]);
    }

    #[test]
    fn sorted_with_hebrew_collation() {
        let tmp = TempDir::new().unwrap();
        for name in ["עמוד-2.html", "עמוד-10.html", "rules.html", "עמוד-1.html"] {
            touch(tmp.path(), name);
        }

        let files = list_documents(tmp.path(), &ListingConfig::default()).unwrap();
        assert_eq!(
            files,
            vec!["עמוד-1.html", "עמוד-10.html", "עמוד-2.html", "rules.html"]
        );
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = list_documents(&tmp.path().join("missing"), &ListingConfig::default());
        assert!(matches!(result, Err(ListError::Walk { .. })));
    }
}
