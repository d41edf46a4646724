//! Worksheet configuration.
//!
//! Handles loading and validating `preview.toml`. Stock defaults
//! describe the conventional worksheet layout; a `preview.toml` in the
//! worksheet root overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [listing]
//! ignore = [".git", "node_modules", ".vscode", "preview"]
//! extensions = ["html"]
//!
//! [rules]
//! page_pattern = "^עמוד-\\d+\\.html$"
//! base_stylesheet = "styles/a4-base.css"
//! page_stylesheet_dir = "styles/pages"
//! min_topic_links = 2
//!
//! [reader]
//! title = "תוכן עניינים"
//! stylesheet = "styles/preview.css"
//! output = "preview/index.html"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the config file looked up in the worksheet root.
pub const CONFIG_FILE: &str = "preview.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Worksheet configuration loaded from `preview.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Which files count as documents.
    pub listing: ListingConfig,
    /// Structural rules for A4 page files.
    pub rules: RulesConfig,
    /// Static reader page settings.
    pub reader: ReaderConfig,
}

impl PreviewConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "listing.extensions must not be empty".into(),
            ));
        }
        self.rules.page_regex()?;
        if self.rules.min_topic_links == 0 {
            return Err(ConfigError::Validation(
                "rules.min_topic_links must be at least 1".into(),
            ));
        }
        if self.reader.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reader.output must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl PreviewConfig {
    /// Listing settings for worksheet documents: the configured ones, with
    /// the reader page itself ignored.
    pub fn document_listing(&self) -> ListingConfig {
        self.listing.excluding(&self.reader.output)
    }
}

/// Document listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Root-relative paths skipped together with everything beneath them.
    pub ignore: Vec<String>,
    /// File extensions (without the dot, case-insensitive) treated as documents.
    pub extensions: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            ignore: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                ".vscode".to_string(),
                "preview".to_string(),
            ],
            extensions: vec!["html".to_string()],
        }
    }
}

impl ListingConfig {
    /// Copy of these settings that also ignores the root-relative `rel_path`.
    pub fn excluding(&self, rel_path: &str) -> ListingConfig {
        let path = Path::new(rel_path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        let mut listing = self.clone();
        if !path.is_empty() && !listing.ignore.contains(&path) {
            listing.ignore.push(path);
        }
        listing
    }
}

/// Rule-check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Regex a root-level file name must match to be checked as an A4 page.
    pub page_pattern: String,
    /// Stylesheet every page must link.
    pub base_stylesheet: String,
    /// Directory holding the per-page stylesheets (`<dir>/<page stem>.css`).
    pub page_stylesheet_dir: String,
    /// Minimum number of topic links in a page's topic bar.
    pub min_topic_links: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            page_pattern: r"^עמוד-\d+\.html$".to_string(),
            base_stylesheet: "styles/a4-base.css".to_string(),
            page_stylesheet_dir: "styles/pages".to_string(),
            min_topic_links: 2,
        }
    }
}

impl RulesConfig {
    /// Compile `page_pattern`.
    pub fn page_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.page_pattern).map_err(|e| {
            ConfigError::Validation(format!("rules.page_pattern is not a valid regex: {e}"))
        })
    }
}

/// Reader page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Heading and `<title>` of the reader page.
    pub title: String,
    /// Stylesheet path relative to the worksheet root, or an absolute URL.
    pub stylesheet: String,
    /// Output path of the reader page, relative to the worksheet root.
    pub output: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            title: "תוכן עניינים".to_string(),
            stylesheet: "styles/preview.css".to_string(),
            output: "preview/index.html".to_string(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parse `preview.toml` text. Keys it leaves out keep their defaults.
pub fn parse_config(text: &str) -> Result<PreviewConfig, ConfigError> {
    let config: PreviewConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Config for a worksheet root: `root/preview.toml` if present, else the
/// defaults.
pub fn load_config(root: &Path) -> Result<PreviewConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(PreviewConfig::default());
    }
    let config = parse_config(&fs::read_to_string(&path)?)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Returns a fully-commented stock `preview.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# worksheet-toc configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Document listing
# ---------------------------------------------------------------------------
[listing]
# Root-relative paths skipped together with everything beneath them.
ignore = [".git", "node_modules", ".vscode", "preview"]

# Extensions (without the dot) treated as documents.
extensions = ["html"]

# ---------------------------------------------------------------------------
# Page rules (worksheet-toc check)
# ---------------------------------------------------------------------------
[rules]
# Root-level file names matching this regex are checked as A4 pages.
page_pattern = "^עמוד-\\d+\\.html$"

# Stylesheet every page must link.
base_stylesheet = "styles/a4-base.css"

# Each page must also link <page_stylesheet_dir>/<page name>.css
page_stylesheet_dir = "styles/pages"

# Minimum number of .topic-link entries in a page's topic bar.
min_topic_links = 2

# ---------------------------------------------------------------------------
# Reader page (worksheet-toc generate)
# ---------------------------------------------------------------------------
[reader]
title = "תוכן עניינים"

# Stylesheet, relative to the worksheet root (or an absolute URL).
stylesheet = "styles/preview.css"

# Output path, relative to the worksheet root.
output = "preview/index.html"
"##
}
