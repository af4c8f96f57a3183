use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::license::LicenseRecord;
use crate::output::OutputWriter;
use crate::policy::AllowPolicy;
use crate::rules::{IgnoreRule, LicensePatch, OverrideRule};

/// Configuration file read from the project root.
pub const CONFIG_FILE_NAME: &str = "license-checker.toml";

/// Default root pattern: group 1 captures the dependency root, group 2 the
/// canonical dependency name (scoped names keep their `@scope/` prefix).
pub const DEFAULT_FILTER: &str = r"(^.*[/\\]node_modules[/\\]((?:@[^/\\]+[/\\])?(?:[^/\\]+)))";

pub const DEFAULT_ALLOW: &str = "(Apache-2.0 OR BSD-2-Clause OR BSD-3-Clause OR MIT)";

pub const DEFAULT_OUTPUT_FILENAME: &str = "ThirdPartyNotice.txt";

/// Invalid plugin options. Raised at validation time, before any build
/// work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid filter pattern `{pattern}`: {reason}")]
    InvalidFilter { pattern: String, reason: String },
    #[error("filter pattern `{pattern}` must capture the dependency root and the dependency name")]
    FilterArity { pattern: String },
    #[error("invalid allow expression `{expression}`: {reason}")]
    InvalidAllowExpression { expression: String, reason: String },
    #[error("invalid ignore rule `{rule}`: {reason}")]
    InvalidIgnoreRule { rule: String, reason: String },
    #[error("invalid version range in rule `{rule}`: {reason}")]
    InvalidVersionRange { rule: String, reason: String },
    #[error("unknown output writer `{name}`, expected `default` or `html`")]
    UnknownOutputWriter { name: String },
}

/// An additional report entry: either a bare dependency name or a full
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalLicense {
    Name(String),
    Record(LicenseRecord),
}

impl AdditionalLicense {
    pub fn into_record(self) -> LicenseRecord {
        match self {
            AdditionalLicense::Name(name) => LicenseRecord::named(name),
            AdditionalLicense::Record(record) => record,
        }
    }
}

/// Raw, unvalidated options as read from `license-checker.toml` or supplied
/// programmatically. Every field is optional; [`Config::validate`] merges
/// in the defaults and produces [`CheckerOptions`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Regex selecting which file-dependency paths count as package roots.
    pub filter: Option<String>,

    /// License expression each dependency's license must satisfy.
    pub allow: Option<String>,

    /// License names exempted from the allow check.
    pub allow_override: Option<Vec<String>>,

    /// `name[@versionRange]` glob rules dropping dependencies entirely.
    pub ignore: Option<Vec<String>>,

    /// `name[@versionRange]` keys mapping to field patches.
    #[serde(rename = "override")]
    pub overrides: Option<IndexMap<String, LicensePatch>>,

    /// Route violations to build errors instead of warnings.
    pub emit_error: Option<bool>,

    /// Named built-in writer: `default` or `html`.
    pub output_writer: Option<String>,

    /// Name of the generated notice artifact.
    pub output_filename: Option<String>,

    /// Whether to run at all under watch builds.
    pub when_in_watch_mode: Option<bool>,

    /// Include modules the host resolved indirectly.
    pub include_delegated: Option<bool>,

    /// Extra entries merged into the final report.
    pub additional_licenses: Option<Vec<AdditionalLicense>>,
}

impl Config {
    /// Merge defaults and validate into ready-to-run options. Fails fast on
    /// the first invalid option.
    pub fn validate(self) -> Result<CheckerOptions, ConfigError> {
        let filter_pattern = self.filter.unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let filter = Regex::new(&filter_pattern).map_err(|error| ConfigError::InvalidFilter {
            pattern: filter_pattern.clone(),
            reason: error.to_string(),
        })?;
        // captures_len counts the implicit whole-match group.
        if filter.captures_len() < 3 {
            return Err(ConfigError::FilterArity {
                pattern: filter_pattern,
            });
        }

        let allow_expression = self.allow.unwrap_or_else(|| DEFAULT_ALLOW.to_string());
        let allow = AllowPolicy::parse(&allow_expression).map_err(|error| {
            ConfigError::InvalidAllowExpression {
                expression: allow_expression.clone(),
                reason: error.to_string(),
            }
        })?;

        let ignore = self
            .ignore
            .unwrap_or_default()
            .iter()
            .map(|rule| IgnoreRule::parse(rule))
            .collect::<Result<Vec<_>, _>>()?;

        let overrides = self
            .overrides
            .unwrap_or_default()
            .into_iter()
            .map(|(rule, patch)| OverrideRule::parse(&rule, patch))
            .collect::<Result<Vec<_>, _>>()?;

        let writer_name = self
            .output_writer
            .unwrap_or_else(|| "default".to_string());
        let output_writer = OutputWriter::from_name(&writer_name)
            .ok_or(ConfigError::UnknownOutputWriter { name: writer_name })?;

        Ok(CheckerOptions {
            filter,
            allow,
            allow_override: self.allow_override.unwrap_or_default(),
            ignore,
            overrides,
            emit_error: self.emit_error.unwrap_or(false),
            output_writer,
            output_filename: self
                .output_filename
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILENAME.to_string()),
            when_in_watch_mode: self.when_in_watch_mode.unwrap_or(false),
            include_delegated: self.include_delegated.unwrap_or(false),
            additional_licenses: self
                .additional_licenses
                .unwrap_or_default()
                .into_iter()
                .map(AdditionalLicense::into_record)
                .collect(),
        })
    }
}

/// Validated, defaulted options the plugin runs with.
#[derive(Debug)]
pub struct CheckerOptions {
    pub filter: Regex,
    pub allow: AllowPolicy,
    pub allow_override: Vec<String>,
    pub ignore: Vec<IgnoreRule>,
    pub overrides: Vec<OverrideRule>,
    pub emit_error: bool,
    pub output_writer: OutputWriter,
    pub output_filename: String,
    pub when_in_watch_mode: bool,
    pub include_delegated: bool,
    pub additional_licenses: Vec<LicenseRecord>,
}

/// Load configuration from `license-checker.toml` in `dir`, falling back to
/// defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<Config> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(config)
}
