pub mod config;
pub mod host;
pub mod init;
pub mod license;
pub mod output;
pub mod plugin;
pub mod policy;
pub mod report;
pub mod rules;

// Re-export main types for easy access
pub use config::{CheckerOptions, Config, ConfigError};
pub use license::{LicenseMap, LicenseRecord};
pub use output::OutputWriter;
pub use plugin::LicenseCheckerPlugin;
pub use policy::{AllowPolicy, Violation};
pub use rules::LicensePatch;
