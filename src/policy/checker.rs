use std::collections::HashSet;
use thiserror::Error;

use crate::license::LicenseMap;

use super::AllowPolicy;

/// Manifest value treated as an explicit declaration of no license.
pub const UNLICENSED: &str = "UNLICENSED";

/// A single license-compliance violation.
///
/// Violations are values, not failures: they are collected in dependency
/// order and routed to the host's error or warning channel. The Display
/// form is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{name}@{version} is unlicensed")]
    Unlicensed { name: String, version: String },
    #[error("{name}@{version} has disallowed license {license}")]
    Disallowed {
        name: String,
        version: String,
        license: String,
    },
    #[error("{name}@{version} has a license of type {license} but has no license text")]
    MissingLicenseText {
        name: String,
        version: String,
        license: String,
    },
}

/// Evaluate every record against the allow policy.
///
/// Per dependency, in mapping order: a license name listed in `exempt`
/// skips the name checks entirely; otherwise an absent or `UNLICENSED`
/// name is an unlicensed violation, and any other name must be a valid
/// expression permitted by the policy. Missing license text is checked
/// independently of all of the above, exempted licenses included, because
/// notice text is a separate compliance requirement from the identifier.
pub fn evaluate_policy(
    records: &LicenseMap,
    allow: &AllowPolicy,
    exempt: &HashSet<String>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (name, record) in records {
        let version = record.version.as_deref().unwrap_or("unknown");
        let license = record.license_name.as_deref();
        let exempted = license.map_or(false, |license| exempt.contains(license));

        if !exempted {
            match license {
                None | Some(UNLICENSED) => violations.push(Violation::Unlicensed {
                    name: name.clone(),
                    version: version.to_string(),
                }),
                Some(license) if !allow.permits(license) => {
                    violations.push(Violation::Disallowed {
                        name: name.clone(),
                        version: version.to_string(),
                        license: license.to_string(),
                    });
                }
                _ => {}
            }
        }

        let text_blank = record
            .license_text
            .as_deref()
            .map_or(true, |text| text.trim().is_empty());
        if text_blank {
            violations.push(Violation::MissingLicenseText {
                name: name.clone(),
                version: version.to_string(),
                license: license.unwrap_or(UNLICENSED).to_string(),
            });
        }
    }
    violations
}
