//! Configuration file support for infra-snapshot.
//!
//! Provides YAML-based configuration through `infra-snapshot.config.yml`
//! files, and the merge of CLI flags, file values and defaults into the
//! settings one run uses.

use anyhow::Context;
use infra_snapshot::application::dto::{OutputFormat, ResolutionSettings};
use infra_snapshot::shared::error::SnapshotError;
use infra_snapshot::shared::security::{validate_definition_file, MAX_DEFINITION_FILE_SIZE};
use infra_snapshot::shared::Result;
use infra_snapshot::snapshot::domain::Section;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;

pub const CONFIG_FILENAME: &str = "infra-snapshot.config.yml";

/// Definitions directory used when neither the CLI nor the config names one.
const DEFAULT_DEFINITIONS_DIR: &str = ".";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub gateway_url: Option<String>,
    pub definitions_dir: Option<PathBuf>,
    pub section_ttl_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub call_timeout_secs: Option<u64>,
    pub request_deadline_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
    pub sections: Option<Vec<String>>,
    pub format: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    validate_definition_file(path, MAX_DEFINITION_FILE_SIZE).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn invalid(message: String) -> anyhow::Error {
    SnapshotError::Validation {
        message: format!("Invalid config: {}", message),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let positive = [
        ("section_ttl_secs", config.section_ttl_secs),
        ("cache_ttl_secs", config.cache_ttl_secs),
        ("call_timeout_secs", config.call_timeout_secs),
        ("request_deadline_secs", config.request_deadline_secs),
        ("max_concurrency", config.max_concurrency.map(|n| n as u64)),
    ];
    for (field, value) in positive {
        if value == Some(0) {
            return Err(invalid(format!("{} must be greater than 0", field)));
        }
    }

    for name in config.sections.iter().flatten() {
        name.parse::<Section>().map_err(invalid)?;
    }

    if let Some(format) = &config.format {
        format.parse::<OutputFormat>().map_err(invalid)?;
    }

    if let Some(url) = &config.gateway_url {
        if url.trim().is_empty() {
            return Err(invalid("gateway_url must not be empty".to_string()));
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "unknown config field will be ignored");
    }
}

/// Everything one CLI run needs, after CLI > config file > defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub gateway_url: String,
    pub definitions_dir: PathBuf,
    pub sections: Vec<Section>,
    pub format: OutputFormat,
    pub settings: ResolutionSettings,
}

impl RunConfig {
    /// Merges CLI arguments over an optional config file.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Validation`] when no gateway URL is given or
    /// a CLI value is zero where a positive one is required.
    pub fn merge(args: &Args, file: Option<ConfigFile>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = ResolutionSettings::default();

        let gateway_url = args
            .gateway_url
            .clone()
            .or(file.gateway_url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SnapshotError::Validation {
                message: "No gateway URL given. Pass --gateway-url or set gateway_url in the config file.".to_string(),
            })?;

        let definitions_dir = args
            .definitions_dir
            .clone()
            .or(file.definitions_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEFINITIONS_DIR));

        let sections = if args.sections.is_empty() {
            // Already validated by load_config_from_path.
            file.sections
                .unwrap_or_default()
                .iter()
                .filter_map(|name| name.parse::<Section>().ok())
                .collect()
        } else {
            args.sections.clone()
        };

        let format = match args.format {
            Some(format) => format,
            None => file
                .format
                .as_deref()
                .map(str::parse::<OutputFormat>)
                .transpose()
                .map_err(|message| SnapshotError::Validation { message })?
                .unwrap_or_default(),
        };

        let secs = |cli: Option<u64>, config: Option<u64>, default: Duration, name: &str| {
            match cli.or(config) {
                Some(0) => Err(SnapshotError::Validation {
                    message: format!("{} must be greater than 0", name),
                }),
                Some(value) => Ok(Duration::from_secs(value)),
                None => Ok(default),
            }
        };

        let max_concurrency = match args.max_concurrency.or(file.max_concurrency) {
            Some(0) => {
                return Err(SnapshotError::Validation {
                    message: "max_concurrency must be greater than 0".to_string(),
                }
                .into())
            }
            Some(n) => n,
            None => defaults.max_concurrency,
        };

        let settings = ResolutionSettings {
            section_ttl: secs(
                args.section_ttl_secs,
                file.section_ttl_secs,
                defaults.section_ttl,
                "section_ttl",
            )?,
            cache_ttl: secs(
                args.cache_ttl_secs,
                file.cache_ttl_secs,
                defaults.cache_ttl,
                "cache_ttl",
            )?,
            call_timeout: secs(
                args.call_timeout_secs,
                file.call_timeout_secs,
                defaults.call_timeout,
                "timeout",
            )?,
            request_deadline: secs(
                args.request_deadline_secs,
                file.request_deadline_secs,
                defaults.request_deadline,
                "deadline",
            )?,
            max_concurrency,
        };

        Ok(Self {
            gateway_url,
            definitions_dir,
            sections,
            format,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(
            ["infra-snapshot", "billing", "prod"]
                .into_iter()
                .chain(extra.iter().copied()),
        )
        .unwrap()
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
gateway_url: http://gateway.local
definitions_dir: ./defs
section_ttl_secs: 120
cache_ttl_secs: 600
call_timeout_secs: 5
request_deadline_secs: 30
max_concurrency: 8
sections: [ecs, alb]
format: markdown
"#,
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.gateway_url.as_deref(), Some("http://gateway.local"));
        assert_eq!(config.definitions_dir, Some(PathBuf::from("./defs")));
        assert_eq!(config.section_ttl_secs, Some(120));
        assert_eq!(config.max_concurrency, Some(8));
        assert_eq!(
            config.sections,
            Some(vec!["ecs".to_string(), "alb".to_string()])
        );
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "format: json\n");

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let error = load_config_from_path(Path::new("/nonexistent/config.yml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "invalid: yaml: [[[broken");

        let error = load_config_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "format: json\nregion_override: eu-west-1\n");

        let config = load_config_from_path(&path).unwrap();
        assert!(config.unknown_fields.contains_key("region_override"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "call_timeout_secs: 0\n");

        let error = load_config_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("call_timeout_secs must be greater than 0"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "sections: [ecs, dns]\n");

        let error = load_config_from_path(&path).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SnapshotError>(),
            Some(SnapshotError::Validation { .. })
        ));
    }

    #[test]
    fn test_merge_defaults() {
        let config = RunConfig::merge(&args(&["-g", "http://gw"]), None).unwrap();

        assert_eq!(config.gateway_url, "http://gw");
        assert_eq!(config.definitions_dir, PathBuf::from("."));
        assert!(config.sections.is_empty());
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.settings, ResolutionSettings::default());
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let file = ConfigFile {
            gateway_url: Some("http://from-config".to_string()),
            call_timeout_secs: Some(3),
            request_deadline_secs: Some(20),
            sections: Some(vec!["rds".to_string()]),
            format: Some("markdown".to_string()),
            ..ConfigFile::default()
        };

        let config = RunConfig::merge(
            &args(&["-g", "http://from-cli", "--timeout", "7", "-s", "ecs"]),
            Some(file),
        )
        .unwrap();

        assert_eq!(config.gateway_url, "http://from-cli");
        assert_eq!(config.settings.call_timeout, Duration::from_secs(7));
        assert_eq!(config.settings.request_deadline, Duration::from_secs(20));
        assert_eq!(config.sections, vec![Section::Ecs]);
        assert_eq!(config.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_merge_requires_gateway_url() {
        let error = RunConfig::merge(&args(&[]), None).unwrap_err();
        assert!(error.to_string().contains("No gateway URL given"));
    }

    #[test]
    fn test_merge_rejects_zero_from_cli() {
        let error = RunConfig::merge(&args(&["-g", "http://gw", "--deadline", "0"]), None)
            .unwrap_err();
        assert!(error.to_string().contains("deadline must be greater than 0"));
    }
}
