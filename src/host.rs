//! Minimal view of the host build tool.
//!
//! The checker never owns the dependency graph; the host hands it a
//! [`Compilation`] snapshot at emit time and collects errors, warnings, and
//! output assets back from it. [`Compiler`] carries the emit hook plugins
//! subscribe to.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One module in the host's resolved graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleRecord {
    /// Resolved resource path of the module's original request.
    pub resource: Option<PathBuf>,
    /// Whether the host resolved this module indirectly.
    pub delegated: bool,
    /// Context directory of the module that issued the request.
    pub issuer_context: Option<PathBuf>,
}

/// Snapshot of one build's dependency graph plus its output channels.
///
/// The graph fields are read-only as far as the checker is concerned; it
/// only appends to `errors`/`warnings` and inserts into `assets`.
#[derive(Debug, Default)]
pub struct Compilation {
    /// Absolute paths of resolved file dependencies.
    pub file_dependencies: Vec<PathBuf>,
    /// Module records, used only when delegated modules are included.
    pub modules: Vec<ModuleRecord>,
    /// Build errors; violations land here when `emit_error` is set.
    pub errors: Vec<String>,
    /// Build warnings; violations land here otherwise.
    pub warnings: Vec<String>,
    /// Output artifacts by filename.
    pub assets: BTreeMap<String, String>,
}

/// Callback registered for the emit phase.
pub type EmitTap = Box<dyn FnMut(&mut Compilation) -> Result<()>>;

/// Host compiler handle. Plugins register emit taps during `apply`; the
/// host fires them once per asset-emission pass.
#[derive(Default)]
pub struct Compiler {
    pub watch_mode: bool,
    emit_taps: Vec<EmitTap>,
}

impl Compiler {
    pub fn new(watch_mode: bool) -> Self {
        Self {
            watch_mode,
            emit_taps: Vec::new(),
        }
    }

    pub fn tap_emit(&mut self, tap: EmitTap) {
        self.emit_taps.push(tap);
    }

    pub fn has_emit_taps(&self) -> bool {
        !self.emit_taps.is_empty()
    }

    /// Fire the emit hook against `compilation`.
    pub fn run_emit(&mut self, compilation: &mut Compilation) -> Result<()> {
        for tap in &mut self.emit_taps {
            tap(compilation)?;
        }
        Ok(())
    }
}
