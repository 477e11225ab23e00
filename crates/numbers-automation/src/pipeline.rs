//! Sequencing of export steps against a [`ScriptBridge`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use numbers_script::{AutomationCommand, CommandBuilder, PipelineRequest, StepKind};
use tracing::{error, info, warn};

use crate::bridge::{BridgeError, ScriptBridge};

/// Failures that stop a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The document could not be opened; no further step was issued.
    #[error("Failed to open '{}': {error}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        error: BridgeError,
    },

    /// A stale export could not be removed before exporting.
    #[error("Failed to remove existing export at '{}': {error}", path.display())]
    RemoveStale {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Progress of a run through the document session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Opened,
    Adjusted,
    Exported,
    Closed,
}

/// Result of one issued step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// The bridge reported a failure; the run carried on.
    Failed(String),
}

/// One issued step and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub kind: StepKind,
    pub outcome: StepOutcome,
}

/// Everything a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    steps: Vec<StepRecord>,
    removed_stale_export: bool,
    state: PipelineState,
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            removed_stale_export: false,
            state: PipelineState::Idle,
        }
    }

    /// Issued steps, in order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Kinds of the issued steps, in order.
    pub fn issued(&self) -> impl Iterator<Item = StepKind> + '_ {
        self.steps.iter().map(|s| s.kind)
    }

    /// Steps whose command failed.
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> + '_ {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    /// True when every issued step succeeded.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Whether a pre-existing export was deleted before exporting.
    pub fn removed_stale_export(&self) -> bool {
        self.removed_stale_export
    }

    /// State reached when the run ended.
    pub fn state(&self) -> PipelineState {
        self.state
    }
}

/// Runs the export steps of a [`PipelineRequest`] in a fixed order:
///
/// 1. open (fatal on failure)
/// 2. adjust, when the request carries a cell adjustment
/// 3. remove any stale export at the destination, then export CSV and PDF
/// 4. bring the foreground application to the front
/// 5. close, when requested
///
/// Failures after the open step are recorded in the [`PipelineReport`] and
/// the run carries on. No step is ever retried: a repeated open or export
/// against the application's window state can duplicate windows or files.
pub struct Pipeline<B> {
    bridge: B,
}

impl<B: ScriptBridge> Pipeline<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn into_bridge(self) -> B {
        self.bridge
    }

    /// Run every step the request calls for.
    pub fn run(&mut self, request: &PipelineRequest) -> Result<PipelineReport, PipelineError> {
        let builder = CommandBuilder::new(request);
        let mut report = PipelineReport::new();

        info!("Opening {}", request.source().display());
        let open = builder.open();
        if let Err(e) = self.bridge.execute(&open) {
            error!("Failed to open {}: {e}", request.source().display());
            return Err(PipelineError::Open {
                path: request.source().to_path_buf(),
                error: e,
            });
        }
        report.steps.push(StepRecord {
            kind: StepKind::Open,
            outcome: StepOutcome::Succeeded,
        });
        report.state = PipelineState::Opened;

        if let Some(adjustment) = request.adjustment() {
            info!(
                sheet = %adjustment.sheet,
                table = %adjustment.table,
                row = %adjustment.row,
                column = %adjustment.column,
                value = %adjustment.value,
                "Adjusting cell before export"
            );
            // Export runs even when the adjustment failed.
            if self.issue(&builder.adjust(adjustment), &mut report) {
                report.state = PipelineState::Adjusted;
            }
        }

        report.removed_stale_export = remove_stale_export(request.destination())?;

        info!("Exporting to {}", request.destination().display());
        self.issue(&builder.export_csv(), &mut report);
        info!("Exporting to {}", request.invoice_raw().display());
        self.issue(&builder.export_pdf(), &mut report);
        report.state = PipelineState::Exported;

        self.issue(&builder.foreground(), &mut report);

        if request.close_after_export() {
            info!("Closing document");
            if self.issue(&builder.close(), &mut report) {
                report.state = PipelineState::Closed;
            }
        }

        Ok(report)
    }

    /// Execute one non-fatal step, recording its outcome.
    fn issue(&mut self, command: &AutomationCommand, report: &mut PipelineReport) -> bool {
        let outcome = match self.bridge.execute(command) {
            Ok(()) => StepOutcome::Succeeded,
            Err(e) => {
                warn!("{} step failed, continuing: {e}", command.kind());
                StepOutcome::Failed(e.to_string())
            }
        };
        let succeeded = outcome == StepOutcome::Succeeded;
        report.steps.push(StepRecord {
            kind: command.kind(),
            outcome,
        });
        succeeded
    }
}

/// Delete whatever sits at `path` so the application does not refuse to
/// overwrite it. Numbers exports multi-table documents as a directory of CSV
/// files, so directories are removed too. Returns whether anything was removed.
fn remove_stale_export(path: &Path) -> Result<bool, PipelineError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(PipelineError::RemoveStale {
                path: path.to_path_buf(),
                error: e,
            })
        }
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| PipelineError::RemoveStale {
        path: path.to_path_buf(),
        error: e,
    })?;

    info!("Deleted existing export: {}", path.display());
    Ok(true)
}
