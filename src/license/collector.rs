use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::host::Compilation;

use super::{extract_license_record, LicenseMap};

/// Path segment marking a dependency-store directory; delegated modules
/// issued from inside the store are not collected.
const DEPENDENCY_STORE_SEGMENT: &str = "node_modules";

/// Collect one license record per dependency matched by `filter`.
///
/// The filter must capture the dependency root path in group 1 and the
/// canonical dependency name in group 2. Paths that do not match are
/// silently skipped: only dependencies under the configured root pattern
/// are tracked. On duplicate names the last-discovered path wins.
pub fn collect_license_records(
    compilation: &Compilation,
    filter: &Regex,
    include_delegated: bool,
) -> Result<LicenseMap> {
    let mut paths: Vec<PathBuf> = compilation.file_dependencies.clone();
    if include_delegated {
        paths.extend(delegated_resources(compilation));
    }

    let mut records = LicenseMap::new();
    for path in &paths {
        let text = path.to_string_lossy();
        let Some(captures) = filter.captures(&text) else {
            continue;
        };
        let (Some(root), Some(name)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let record = extract_license_record(Path::new(root.as_str()))?;
        debug!(
            dependency = name.as_str(),
            root = root.as_str(),
            "collected license record"
        );
        records.insert(name.as_str().to_string(), record);
    }
    Ok(records)
}

/// Resources of modules the host resolved indirectly. A delegated module
/// only counts when its issuing module lives outside the dependency store.
fn delegated_resources(compilation: &Compilation) -> Vec<PathBuf> {
    compilation
        .modules
        .iter()
        .filter(|module| module.delegated)
        .filter(|module| {
            module.issuer_context.as_ref().map_or(true, |context| {
                !context
                    .to_string_lossy()
                    .contains(DEPENDENCY_STORE_SEGMENT)
            })
        })
        .filter_map(|module| module.resource.clone())
        .collect()
}
