//! Rendering of pipeline steps into AppleScript.

use std::fmt;

use crate::request::{CellAdjustment, ForegroundApp, PipelineRequest};

/// The pipeline step a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Open the source document.
    Open,
    /// Overwrite one cell of the open document.
    Adjust,
    /// Export the open document as CSV.
    ExportCsv,
    /// Export the open document as PDF.
    ExportPdf,
    /// Close the open document.
    Close,
    /// Bring another application to the front.
    Foreground(ForegroundApp),
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Open => f.write_str("open"),
            StepKind::Adjust => f.write_str("adjust"),
            StepKind::ExportCsv => f.write_str("export-csv"),
            StepKind::ExportPdf => f.write_str("export-pdf"),
            StepKind::Close => f.write_str("close"),
            StepKind::Foreground(app) => write!(f, "foreground-{}", app.app_name().to_lowercase()),
        }
    }
}

/// A fully rendered script, tagged with the step it performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationCommand {
    kind: StepKind,
    script: String,
}

impl AutomationCommand {
    fn new(kind: StepKind, script: String) -> Self {
        Self { kind, script }
    }

    /// The step this command performs.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The AppleScript source, ready for `osascript -e`.
    pub fn script(&self) -> &str {
        &self.script
    }
}

/// Renders the commands for one [`PipelineRequest`].
///
/// Rendering is pure: the same request always yields the same text.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    request: &'a PipelineRequest,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(request: &'a PipelineRequest) -> Self {
        Self { request }
    }

    /// Open the source document in Numbers and bring Numbers forward.
    pub fn open(&self) -> AutomationCommand {
        let script = format!(
            r#"set numbersFilePath to POSIX file "{src}" as alias

tell application "Numbers"
    activate
    open numbersFilePath
end tell"#,
            src = self.request.source().display()
        );
        AutomationCommand::new(StepKind::Open, script)
    }

    /// Set one cell of document 1. The value is written unquoted, so text
    /// values must carry their own AppleScript quoting.
    pub fn adjust(&self, adjustment: &CellAdjustment) -> AutomationCommand {
        let script = format!(
            r#"tell application "Numbers"
    activate
    tell document 1
        tell sheet {sheet}
            tell table "{table}"
                set the value of cell {column} of row {row} to {value}
            end tell
        end tell
    end tell
end tell"#,
            sheet = adjustment.sheet,
            table = adjustment.table,
            column = adjustment.column,
            row = adjustment.row,
            value = adjustment.value,
        );
        AutomationCommand::new(StepKind::Adjust, script)
    }

    /// Export document 1 to the destination path as CSV.
    pub fn export_csv(&self) -> AutomationCommand {
        let script = export_script(&self.request.destination().display(), "CSV");
        AutomationCommand::new(StepKind::ExportCsv, script)
    }

    /// Export document 1 to the raw invoice path as PDF.
    pub fn export_pdf(&self) -> AutomationCommand {
        let script = export_script(&self.request.invoice_raw().display(), "PDF");
        AutomationCommand::new(StepKind::ExportPdf, script)
    }

    /// Close document 1.
    pub fn close(&self) -> AutomationCommand {
        let script = r#"tell application "Numbers"
    activate

    tell document 1
        close
    end tell
end tell"#
            .to_string();
        AutomationCommand::new(StepKind::Close, script)
    }

    /// Bring the request's foreground application to the front.
    pub fn foreground(&self) -> AutomationCommand {
        let app = self.request.foreground();
        let script = format!(
            r#"tell application "{name}"
    activate
end tell"#,
            name = app.app_name()
        );
        AutomationCommand::new(StepKind::Foreground(app), script)
    }

    /// Every command the request calls for, in the order the pipeline issues them.
    pub fn plan(&self) -> Vec<AutomationCommand> {
        let mut commands = vec![self.open()];
        if let Some(adjustment) = self.request.adjustment() {
            commands.push(self.adjust(adjustment));
        }
        commands.push(self.export_csv());
        commands.push(self.export_pdf());
        commands.push(self.foreground());
        if self.request.close_after_export() {
            commands.push(self.close());
        }
        commands
    }
}

fn export_script(path: &impl fmt::Display, format: &str) -> String {
    format!(
        r#"set exportFilePath to POSIX file "{path}"

tell application "Numbers"
    activate

    tell document 1
        export to exportFilePath as {format}
    end tell
end tell"#
    )
}
