//! Package installer that shells out to the selected package manager.

use std::path::Path;
use std::process::{Command, Stdio};

use anvil_core::{
    application::{ApplicationError, ports::PackageInstaller},
    domain::PackageManager,
    error::AnvilResult,
};
use tracing::{info, instrument};

/// Runs `<manager> install` in the generated project, blocking until done.
#[derive(Debug, Clone, Default)]
pub struct CommandInstaller {
    quiet: bool,
}

impl CommandInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the package manager's own output instead of inheriting it.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn command(&self, project_dir: &Path, manager: PackageManager) -> Command {
        let mut cmd = Command::new(manager.program());
        cmd.args(manager.install_args()).current_dir(project_dir);
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }
}

impl PackageInstaller for CommandInstaller {
    #[instrument(skip(self), fields(dir = %project_dir.display()))]
    fn install(&self, project_dir: &Path, manager: PackageManager) -> AnvilResult<()> {
        let command_line = format!("{} {}", manager.program(), manager.install_args().join(" "));
        info!(command = %command_line, "Installing dependencies");

        let status = self
            .command(project_dir, manager)
            .status()
            .map_err(|e| ApplicationError::InstallFailed {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            };
            return Err(ApplicationError::InstallFailed {
                command: command_line,
                reason,
            }
            .into());
        }
        Ok(())
    }
}
