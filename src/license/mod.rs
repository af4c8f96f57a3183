use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod collector;
pub mod extractor;

// Re-export the collection entry points
pub use collector::collect_license_records;
pub use extractor::extract_license_record;

/// License metadata for one resolved dependency root.
///
/// Records are keyed by dependency name for the duration of a build run; a
/// later-discovered path for the same name overwrites the earlier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Declared license expression, or `"UNLICENSED"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,
    /// License file contents, word-wrapped at 80 columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_text: Option<String>,
}

impl LicenseRecord {
    /// A record carrying only a name, used for additional entries supplied
    /// as bare strings in the configuration.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            author: None,
            repository: None,
            homepage: None,
            license_name: None,
            license_text: None,
        }
    }
}

/// Dependency name to license record, in discovery order. Iteration order
/// of this map is the violation-reporting order.
pub type LicenseMap = IndexMap<String, LicenseRecord>;
