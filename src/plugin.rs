//! Plugin adapter wiring the pipeline into the host build tool.

use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::CheckerOptions;
use crate::host::{Compilation, Compiler};
use crate::license::collect_license_records;
use crate::policy::evaluate_policy;
use crate::report::build_report;
use crate::rules::{ignore_records, override_records};

/// Emit latch. The host may fire its emit hook more than once per build;
/// the notice file must be produced exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitState {
    Pending,
    Written,
}

/// One-shot license checker bound to a single build run.
///
/// Construct with validated [`CheckerOptions`], then either hand it to the
/// host via [`apply`](Self::apply) or drive [`emit`](Self::emit) directly.
pub struct LicenseCheckerPlugin {
    options: CheckerOptions,
    state: EmitState,
}

impl LicenseCheckerPlugin {
    pub fn new(options: CheckerOptions) -> Self {
        Self {
            options,
            state: EmitState::Pending,
        }
    }

    /// Register on the host's emit hook. In watch mode with
    /// `when_in_watch_mode` unset the plugin does not subscribe at all.
    pub fn apply(self, compiler: &mut Compiler) {
        if !self.options.when_in_watch_mode && compiler.watch_mode {
            info!("not running: when_in_watch_mode is false and the compiler is in watch mode");
            return;
        }
        let mut plugin = self;
        compiler.tap_emit(Box::new(move |compilation| plugin.emit(compilation)));
    }

    /// Run the pipeline once: collect, filter, patch, evaluate, render.
    /// Violations land in the compilation's error or warning channel and
    /// the rendered notice is inserted under `output_filename`.
    pub fn emit(&mut self, compilation: &mut Compilation) -> Result<()> {
        if self.state == EmitState::Written {
            debug!("notice already written for this build, skipping emit pass");
            return Ok(());
        }

        let collected = collect_license_records(
            compilation,
            &self.options.filter,
            self.options.include_delegated,
        )?;
        let records = ignore_records(&collected, &self.options.ignore);
        let records = override_records(&records, &self.options.overrides);

        let exempt: HashSet<String> = self.options.allow_override.iter().cloned().collect();
        let violations = evaluate_policy(&records, &self.options.allow, &exempt);

        for violation in &violations {
            if self.options.emit_error {
                compilation.errors.push(violation.to_string());
            } else {
                warn!(%violation, "license violation");
                compilation.warnings.push(violation.to_string());
            }
        }

        let notice = build_report(&records, &self.options.additional_licenses, |context| {
            self.options.output_writer.render(context)
        });
        compilation
            .assets
            .insert(self.options.output_filename.clone(), notice);

        self.state = EmitState::Written;
        info!(
            dependencies = records.len(),
            violations = violations.len(),
            "third-party notice emitted"
        );
        Ok(())
    }
}
