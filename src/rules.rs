//! Ignore and override rules.
//!
//! Rule keys have the form `name` or `name@versionRange`. Ignore rules drop
//! matching dependencies entirely and may use glob wildcards in the name;
//! override rules patch fields on an exactly named dependency. Both engines
//! are pure: they clone the incoming mapping and never touch the original.

use glob::Pattern;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::license::{LicenseMap, LicenseRecord};

/// Partial patch applied to matching records by an override rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_text: Option<String>,
}

impl LicensePatch {
    fn apply_to(&self, record: &mut LicenseRecord) {
        if let Some(version) = &self.version {
            record.version = Some(version.clone());
        }
        if let Some(author) = &self.author {
            record.author = Some(author.clone());
        }
        if let Some(repository) = &self.repository {
            record.repository = Some(repository.clone());
        }
        if let Some(homepage) = &self.homepage {
            record.homepage = Some(homepage.clone());
        }
        if let Some(license_name) = &self.license_name {
            record.license_name = Some(license_name.clone());
        }
        if let Some(license_text) = &self.license_text {
            record.license_text = Some(license_text.clone());
        }
    }
}

/// Split `name@range` at the first `@` past position zero, so scoped names
/// like `@scope/pkg@^1.0.0` keep their leading `@`.
fn split_rule_key(key: &str) -> (&str, Option<&str>) {
    let Some(rest) = key.get(1..) else {
        return (key, None);
    };
    match rest.find('@') {
        Some(at) => (&key[..at + 1], Some(&key[at + 2..])),
        None => (key, None),
    }
}

fn parse_range(rule: &str, range: Option<&str>) -> Result<Option<VersionReq>, ConfigError> {
    range
        .map(|expression| {
            VersionReq::parse(expression).map_err(|error| ConfigError::InvalidVersionRange {
                rule: rule.to_string(),
                reason: error.to_string(),
            })
        })
        .transpose()
}

/// No range matches any version; a range only matches a recorded version
/// that parses as semver and satisfies it.
fn range_matches(range: Option<&VersionReq>, version: Option<&str>) -> bool {
    match range {
        None => true,
        Some(range) => version
            .and_then(|raw| Version::parse(raw).ok())
            .map_or(false, |version| range.matches(&version)),
    }
}

/// Parsed `name[@versionRange]` ignore rule; the name is a glob pattern.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: Pattern,
    range: Option<VersionReq>,
}

impl IgnoreRule {
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let (name, range) = split_rule_key(key);
        let pattern = Pattern::new(name).map_err(|error| ConfigError::InvalidIgnoreRule {
            rule: key.to_string(),
            reason: error.to_string(),
        })?;
        Ok(Self {
            pattern,
            range: parse_range(key, range)?,
        })
    }

    fn matches(&self, name: &str, version: Option<&str>) -> bool {
        self.pattern.matches(name) && range_matches(self.range.as_ref(), version)
    }
}

/// Parsed `name[@versionRange]` override rule with its field patch.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    name: String,
    range: Option<VersionReq>,
    patch: LicensePatch,
}

impl OverrideRule {
    pub fn parse(key: &str, patch: LicensePatch) -> Result<Self, ConfigError> {
        let (name, range) = split_rule_key(key);
        Ok(Self {
            name: name.to_string(),
            range: parse_range(key, range)?,
            patch,
        })
    }

    fn matches(&self, name: &str, version: Option<&str>) -> bool {
        self.name == name && range_matches(self.range.as_ref(), version)
    }
}

/// Drop every record matched by an ignore rule. Pure: `records` is cloned.
pub fn ignore_records(records: &LicenseMap, rules: &[IgnoreRule]) -> LicenseMap {
    let mut filtered = records.clone();
    filtered.retain(|name, record| {
        !rules
            .iter()
            .any(|rule| rule.matches(name, record.version.as_deref()))
    });
    filtered
}

/// Apply every override rule to every matching record, in rule order, so
/// later rules overwrite fields set by earlier ones. Range matching sees
/// the version as patched so far. Pure: `records` is cloned.
pub fn override_records(records: &LicenseMap, rules: &[OverrideRule]) -> LicenseMap {
    let mut patched = records.clone();
    for (name, record) in patched.iter_mut() {
        for rule in rules {
            if rule.matches(name, record.version.as_deref()) {
                rule.patch.apply_to(record);
            }
        }
    }
    patched
}
