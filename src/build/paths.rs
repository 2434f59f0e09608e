//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (markup files inside the source tree)
//! - Output file paths (where pages are written in the target tree)
//! - Sidebar hrefs (output paths relative to the target root)

use std::path::{Component, Path};

/// Extension of the markup files that get converted.
pub const MARKUP_EXTENSION: &str = "md";

/// Extension given to converted pages.
pub const PAGE_EXTENSION: &str = "html";

/// Name of the page a markup file becomes.
///
/// # Examples
/// ```ignore
/// page_file_name("install.md") => Some("install.html")
/// page_file_name("v1.2.md") => Some("v1.2.html")
/// ```
pub fn page_file_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_string_lossy();
    Some(format!("{stem}.{PAGE_EXTENSION}"))
}

/// The file's extension, if it has one that is valid UTF-8.
pub fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Express `path` relative to `root` as a `/`-separated href.
///
/// Paths outside `root` are returned whole.
///
/// # Examples
/// ```ignore
/// relative_href("site", "site/guides/setup.html") => "guides/setup.html"
/// relative_href("./", "./index.html") => "index.html"
/// ```
pub fn relative_href(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Base href used when none is given: the target directory with one
/// trailing slash removed.
///
/// # Examples
/// ```ignore
/// default_base("site/") => "site"
/// default_base("./") => "."
/// ```
pub fn default_base(target: &Path) -> String {
    let target = target.to_string_lossy();
    target.strip_suffix('/').unwrap_or(&target).to_string()
}
