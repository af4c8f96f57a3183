use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

// Import from our library
use bundle_license_checker::config::load_config;
use bundle_license_checker::host::{Compilation, Compiler};
use bundle_license_checker::init;
use bundle_license_checker::LicenseCheckerPlugin;

#[derive(Parser)]
#[command(name = "bundle-license-checker")]
#[command(about = "Check licenses of bundled dependencies against an allow policy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the license check against a project's dependency store
    Check {
        /// Project directory containing node_modules (default: current directory)
        path: Option<PathBuf>,

        /// Write the notice file here instead of <path>/<output_filename>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on violations regardless of the configured emit_error
        #[arg(long)]
        emit_error: bool,

        /// Print the rendered notice to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Write a starter license-checker.toml
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<PathBuf>,
    },
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            output,
            emit_error,
            stdout,
        } => handle_check(path, output, emit_error, stdout),
        Commands::Init { path } => handle_init(path),
        Commands::Config { show, validate } => handle_config(show, validate),
    }
}

fn handle_check(
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    emit_error: bool,
    stdout: bool,
) -> Result<()> {
    let project = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let mut config = load_config(&project)?;
    if emit_error {
        config.emit_error = Some(true);
    }
    let options = config.validate()?;
    let output_filename = options.output_filename.clone();

    let mut compilation = Compilation {
        file_dependencies: scan_dependency_store(&project)?,
        ..Compilation::default()
    };

    let mut compiler = Compiler::new(false);
    LicenseCheckerPlugin::new(options).apply(&mut compiler);
    compiler.run_emit(&mut compilation)?;

    for warning in &compilation.warnings {
        eprintln!("warning: {warning}");
    }
    for error in &compilation.errors {
        eprintln!("error: {error}");
    }

    let notice = compilation
        .assets
        .get(&output_filename)
        .context("no notice artifact was produced")?;

    if stdout {
        println!("{notice}");
    } else {
        let target = output.unwrap_or_else(|| project.join(&output_filename));
        fs::write(&target, notice)
            .with_context(|| format!("failed to write {}", target.display()))?;
        println!("Wrote {}", target.display());
    }

    if !compilation.errors.is_empty() {
        eprintln!(
            "{} license violation(s) found, failing due to emit_error",
            compilation.errors.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Synthesize the resolved-file snapshot a host would provide: every
/// manifest path directly under the project's dependency store, scoped
/// packages included.
fn scan_dependency_store(project: &Path) -> Result<Vec<PathBuf>> {
    let store = project.join("node_modules");
    if !store.is_dir() {
        anyhow::bail!("no node_modules directory under {}", project.display());
    }

    let mut manifests = Vec::new();
    for entry in list_sorted(&store)? {
        let name = entry.file_name().unwrap_or_default().to_string_lossy();
        if name.starts_with('.') || !entry.is_dir() {
            continue;
        }
        if name.starts_with('@') {
            for scoped in list_sorted(&entry)? {
                let manifest = scoped.join("package.json");
                if manifest.is_file() {
                    manifests.push(manifest);
                }
            }
        } else {
            let manifest = entry.join("package.json");
            if manifest.is_file() {
                manifests.push(manifest);
            }
        }
    }
    Ok(manifests)
}

fn list_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

fn handle_init(path: Option<PathBuf>) -> Result<()> {
    let dir = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    init::generate_config(&dir)
}

fn handle_config(show: bool, validate: bool) -> Result<()> {
    let dir = std::env::current_dir()?;

    if show {
        let config = load_config(&dir)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if validate {
        match load_config(&dir).and_then(|config| Ok(config.validate()?)) {
            Ok(_) => println!("Configuration is valid"),
            Err(error) => {
                eprintln!("Configuration validation failed: {error:#}");
                std::process::exit(1);
            }
        }
    }

    if !show && !validate {
        eprintln!("Use --show or --validate");
        std::process::exit(1);
    }

    Ok(())
}
