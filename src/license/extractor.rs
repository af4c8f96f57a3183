use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::LicenseRecord;

/// Filename prefixes recognized as license files, matched case-insensitively.
const LICENSE_FILE_PREFIXES: [&str; 3] = ["LICENSE", "LICENCE", "COPYING"];

/// Column width for wrapping license text.
const LICENSE_WRAP_COLUMNS: usize = 80;

/// npm manifests allow `author` as either a plain string or an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Plain(String),
    Detailed { name: Option<String> },
}

impl AuthorField {
    fn into_text(self) -> Option<String> {
        match self {
            AuthorField::Plain(text) => Some(text),
            AuthorField::Detailed { name } => name,
        }
    }
}

/// `repository` as either a plain string or a `{ type, url }` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Plain(String),
    Detailed { url: Option<String> },
}

impl RepositoryField {
    fn into_text(self) -> Option<String> {
        match self {
            RepositoryField::Plain(text) => Some(text),
            RepositoryField::Detailed { url } => url,
        }
    }
}

/// `license` as an expression string, or the legacy `{ type }` object form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Plain(String),
    Legacy {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

impl LicenseField {
    fn into_text(self) -> Option<String> {
        match self {
            LicenseField::Plain(text) => Some(text),
            LicenseField::Legacy { kind } => kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: String,
    version: Option<String>,
    author: Option<AuthorField>,
    repository: Option<RepositoryField>,
    homepage: Option<String>,
    license: Option<LicenseField>,
}

/// Extract the license record for the dependency rooted at `dependency_root`.
///
/// The manifest is required: a missing or unparsable `package.json` is a
/// build-configuration error and aborts the run. A missing license file is
/// not an error here; the policy evaluator reports it as a violation.
pub fn extract_license_record(dependency_root: &Path) -> Result<LicenseRecord> {
    let manifest_path = dependency_root.join("package.json");
    let contents = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read manifest {}", manifest_path.display()))?;
    let manifest: PackageManifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest {}", manifest_path.display()))?;

    Ok(LicenseRecord {
        name: manifest.name,
        version: manifest.version,
        author: manifest.author.and_then(AuthorField::into_text),
        repository: manifest.repository.and_then(RepositoryField::into_text),
        homepage: manifest.homepage,
        license_name: manifest.license.and_then(LicenseField::into_text),
        license_text: read_license_text(dependency_root)?,
    })
}

fn read_license_text(dependency_root: &Path) -> Result<Option<String>> {
    let Some(license_path) = find_license_file(dependency_root)? else {
        return Ok(None);
    };
    let contents = fs::read_to_string(&license_path)
        .with_context(|| format!("failed to read license file {}", license_path.display()))?;
    Ok(Some(textwrap::fill(&contents, LICENSE_WRAP_COLUMNS)))
}

/// First license-like file in the dependency root, with candidates sorted
/// by name so the choice is deterministic.
fn find_license_file(dependency_root: &Path) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dependency_root)
        .with_context(|| format!("failed to list {}", dependency_root.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let upper = file_name.to_string_lossy().to_uppercase();
        if LICENSE_FILE_PREFIXES
            .iter()
            .any(|prefix| upper.starts_with(prefix))
            && entry.path().is_file()
        {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}
