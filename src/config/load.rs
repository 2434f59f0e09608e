//! Configuration loading from files and the environment.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults
//! 2. The YAML config file (optional unless named explicitly)
//! 3. `FRAMEDOCS_*` environment variables (`FRAMEDOCS_LOG__VERBOSE=true`)

use std::path::Path;

use super::{ConfigError, SiteConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "framedocs.yaml";

const ENV_PREFIX: &str = "FRAMEDOCS";

impl SiteConfig {
    /// Load the config named on the command line, defaulting to
    /// `framedocs.yaml`. Only an explicitly named file has to exist.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let required = config_file.is_some();
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file, required)
    }

    /// Load the config from a file path, layering the environment on top.
    pub(crate) fn load_from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        Ok(config::Config::builder()
            .add_source(
                config::File::new(path_str, config::FileFormat::Yaml).required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("copy_extensions"),
            )
            .build()?
            .try_deserialize::<SiteConfig>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load_from_file(&dir.path().join("none.yaml"), false).unwrap();

        assert!(config.source.is_none());
        assert_eq!(config.copy_extensions, vec!["png".to_string()]);
        assert!(config.log.errors);
        assert!(!config.log.verbose);
        assert!(!config.trace_comments);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SiteConfig::load_from_file(&dir.path().join("none.yaml"), true);
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framedocs.yaml");
        std::fs::write(
            &path,
            "source: ./content\ntarget: ./site/\nbase: https://example.org\ncopy_extensions: [png, svg]\nlog:\n  verbose: true\n",
        )
        .unwrap();

        let config = SiteConfig::load_from_file(&path, true).unwrap();

        assert_eq!(config.source, Some(PathBuf::from("./content")));
        assert_eq!(config.target, Some(PathBuf::from("./site/")));
        assert_eq!(config.base.as_deref(), Some("https://example.org"));
        assert_eq!(config.copy_extensions, vec!["png", "svg"]);
        assert!(config.log.verbose);
        assert!(config.log.warnings);
    }
}
