//! Configuration type definitions.
//!
//! This module contains the data structures read from `framedocs.yaml`.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Site configuration
// =============================================================================

/// Settings for one conversion run.
///
/// Every field is optional in the file; positional command line arguments
/// override `source`, `target` and `base`.
///
/// ```yaml
/// source: ../project/docs/
/// target: ./site/
/// base: https://example.org/docs
/// copy_extensions: [png, svg]
/// log:
///   verbose: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory containing the markup sources
    pub source: Option<PathBuf>,
    /// Directory the site is written to
    pub target: Option<PathBuf>,
    /// Value of every page's `<BASE HREF>` (defaults to the target directory)
    pub base: Option<String>,
    /// Extensions of files copied to the output unchanged
    pub copy_extensions: Vec<String>,
    /// Annotate generated HTML with a comment per writer call
    pub trace_comments: bool,
    /// Diagnostic channels
    pub log: LogConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            base: None,
            copy_extensions: default_copy_extensions(),
            trace_comments: false,
            log: LogConfig::default(),
        }
    }
}

fn default_copy_extensions() -> Vec<String> {
    vec!["png".to_string()]
}

// =============================================================================
// Log configuration
// =============================================================================

/// Which diagnostic channels are printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub errors: bool,
    pub warnings: bool,
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            errors: true,
            warnings: true,
            verbose: false,
        }
    }
}
