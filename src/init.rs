use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

/// Starter configuration written by `init`. Every option is present so the
/// file doubles as documentation; the values are the defaults.
const STARTER_CONFIG: &str = r#"# bundle-license-checker configuration

# License expression every dependency's declared license must satisfy.
allow = "(Apache-2.0 OR BSD-2-Clause OR BSD-3-Clause OR MIT)"

# License names exempted from the allow check (exact match).
allow_override = []

# Dependencies to drop entirely: "name" or "name@versionRange", the name
# may use glob wildcards.
ignore = []

# Route violations to build errors (fail the build) instead of warnings.
emit_error = false

# Built-in writers: "default" (plain text) or "html".
output_writer = "default"

# Name of the generated notice artifact.
output_filename = "ThirdPartyNotice.txt"

# Whether to run at all under watch builds.
when_in_watch_mode = false

# Include modules the host resolved indirectly.
include_delegated = false

# Patch fields on a dependency, keyed by "name" or "name@versionRange":
#
# [override."assert@1.x"]
# license_name = "MIT"

# Extra entries merged into the final report:
#
# [[additional_licenses]]
# name = "bundled-runtime"
# license_name = "MIT"
"#;

/// Write a starter `license-checker.toml` into `dir`. Refuses to overwrite
/// an existing configuration.
pub fn generate_config(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }
    fs::write(&config_path, STARTER_CONFIG)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, Config};
    use tempfile::TempDir;

    #[test]
    fn test_starter_config_is_valid() {
        let config: Config = toml::from_str(STARTER_CONFIG).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        generate_config(dir.path()).unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.emit_error, Some(false));
        assert_eq!(
            config.output_filename.as_deref(),
            Some("ThirdPartyNotice.txt")
        );
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        generate_config(dir.path()).unwrap();
        assert!(generate_config(dir.path()).is_err());
    }
}
