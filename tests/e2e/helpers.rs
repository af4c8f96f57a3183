use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_bundle-license-checker").to_string();

        Self { dir, binary_path }
    }

    pub fn project_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a project directory with a node_modules store.
    pub fn init_project(&self, name: &str) -> PathBuf {
        let project = self.project_path(name);
        fs::create_dir_all(project.join("node_modules")).unwrap();
        project
    }

    /// Drop a fake package into the project's dependency store.
    pub fn add_package(
        &self,
        project: &Path,
        name: &str,
        manifest: &str,
        license_text: Option<&str>,
    ) {
        let root = project.join("node_modules").join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("package.json"), manifest).unwrap();
        if let Some(text) = license_text {
            fs::write(root.join("LICENSE"), text).unwrap();
        }
    }

    pub fn write_config(&self, project: &Path, config: &str) {
        fs::write(project.join("license-checker.toml"), config).unwrap();
    }

    pub fn run_checker(&self, project: &Path, args: &[&str]) -> std::process::Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(project)
            .output()
            .expect("Failed to run bundle-license-checker")
    }
}
