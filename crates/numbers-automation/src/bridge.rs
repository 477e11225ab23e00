//! Subprocess management for the `osascript` bridge.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use numbers_script::{AutomationCommand, StepKind};

/// Errors from executing a script against the host automation subsystem.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to spawn osascript: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("osascript not found at: {0}")]
    NotFound(String),

    #[error("{step} script failed (exit status {status}): {stderr}")]
    ScriptFailed {
        step: StepKind,
        status: String,
        stderr: String,
    },
}

/// Executes one rendered command and reports whether it completed.
///
/// Implementations must be synchronous: `execute` returns only once the
/// external application has finished with the command. One command per call,
/// no batching.
pub trait ScriptBridge {
    fn execute(&mut self, command: &AutomationCommand) -> Result<(), BridgeError>;
}

impl<B: ScriptBridge + ?Sized> ScriptBridge for &mut B {
    fn execute(&mut self, command: &AutomationCommand) -> Result<(), BridgeError> {
        (**self).execute(command)
    }
}

/// Configuration for the `osascript` bridge.
#[derive(Debug, Clone)]
pub struct OsascriptConfig {
    /// Path to the `osascript` executable. Defaults to "/usr/bin/osascript".
    pub osascript_path: PathBuf,
}

impl Default for OsascriptConfig {
    fn default() -> Self {
        Self {
            osascript_path: PathBuf::from("/usr/bin/osascript"),
        }
    }
}

/// Runs each command as `osascript -e <script>` and waits for it to exit.
#[derive(Debug, Clone, Default)]
pub struct OsascriptBridge {
    config: OsascriptConfig,
}

impl OsascriptBridge {
    pub fn new(config: OsascriptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OsascriptConfig {
        &self.config
    }
}

impl ScriptBridge for OsascriptBridge {
    fn execute(&mut self, command: &AutomationCommand) -> Result<(), BridgeError> {
        tracing::debug!("Running {} script:\n{}", command.kind(), command.script());

        let output = Command::new(&self.config.osascript_path)
            .arg("-e")
            .arg(command.script())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BridgeError::NotFound(self.config.osascript_path.display().to_string())
                } else {
                    BridgeError::SpawnFailed(e)
                }
            })?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                tracing::debug!("{} script printed: {}", command.kind(), stdout.trim());
            }
            return Ok(());
        }

        Err(BridgeError::ScriptFailed {
            step: command.kind(),
            status: output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |code| code.to_string()),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
