//! Diagnostic messages with independently switchable channels.
//!
//! Messages go through the `log` facade; [`init_logger`] installs an
//! `env_logger` backend that prints them to stderr tagged with the program
//! name, e.g. `WARNING [framedocs]: ...`.

use std::fmt::Display;
use std::io::Write;

use log::{Level, LevelFilter};

use crate::config::LogConfig;

/// Which diagnostic channels are enabled.
///
/// Passed by reference to anything that reports problems, so callers decide
/// what is shown without touching global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: bool,
    pub warnings: bool,
    pub verbose: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            errors: true,
            warnings: true,
            verbose: false,
        }
    }
}

impl From<&LogConfig> for Diagnostics {
    fn from(config: &LogConfig) -> Self {
        Self {
            errors: config.errors,
            warnings: config.warnings,
            verbose: config.verbose,
        }
    }
}

impl Diagnostics {
    /// All channels off.
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            errors: false,
            warnings: false,
            verbose: false,
        }
    }

    pub fn error(&self, message: impl Display) {
        if self.errors {
            log::error!("{message}");
        }
    }

    pub fn warning(&self, message: impl Display) {
        if self.warnings {
            log::warn!("{message}");
        }
    }

    pub fn verbose(&self, message: impl Display) {
        if self.verbose {
            log::info!("{message}");
        }
    }
}

/// Install the stderr logger. Channel filtering is done by [`Diagnostics`],
/// so the backend lets everything from `info` up through.
pub fn init_logger() {
    let program = std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| std::path::Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .format(move |buf, record| {
            let label = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARNING",
                _ => "VERBOSE",
            };
            writeln!(buf, "{label} [{program}]: {}", record.args())
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channels() {
        let diagnostics = Diagnostics::default();
        assert!(diagnostics.errors);
        assert!(diagnostics.warnings);
        assert!(!diagnostics.verbose);
    }

    #[test]
    fn test_from_log_config() {
        let config = LogConfig {
            errors: false,
            warnings: true,
            verbose: true,
        };
        assert_eq!(
            Diagnostics::from(&config),
            Diagnostics {
                errors: false,
                warnings: true,
                verbose: true,
            }
        );
    }
}
