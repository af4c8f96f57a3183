//! Report assembly: merge externally supplied entries, order
//! deterministically, and hand the result to a rendering function.

use serde::Serialize;

use crate::license::{LicenseMap, LicenseRecord};

/// Ordered dependency list handed to an output writer.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub dependencies: Vec<LicenseRecord>,
}

/// Collect record values plus `additional` entries, sorted by lowercase
/// name ascending. The sort is stable, so entries with equal names keep
/// their relative order.
pub fn sorted_render_context(records: &LicenseMap, additional: &[LicenseRecord]) -> RenderContext {
    let mut dependencies: Vec<LicenseRecord> = records.values().cloned().collect();
    dependencies.extend(additional.iter().cloned());
    dependencies.sort_by_key(|dependency| dependency.name.to_lowercase());
    RenderContext { dependencies }
}

/// Render the sorted report. All formatting is owned by `render`.
pub fn build_report<F>(records: &LicenseMap, additional: &[LicenseRecord], render: F) -> String
where
    F: Fn(&RenderContext) -> String,
{
    render(&sorted_render_context(records, additional))
}
