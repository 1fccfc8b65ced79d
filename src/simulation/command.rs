//! Process execution seam for the simulator

use std::io;
use std::process::Command;

/// Captured result of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion and captures its output
pub trait CommandExecutor {
    /// Block until `program` exits. `Err` only when it could not be started.
    fn execute(&mut self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Executor backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&mut self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_code() {
        let ok = CommandOutput { code: Some(0), ..Default::default() };
        let failed = CommandOutput { code: Some(1), ..Default::default() };
        let killed = CommandOutput { code: None, ..Default::default() };

        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }

    #[test]
    fn test_system_executor_reports_unknown_program() {
        let mut executor = SystemExecutor;
        let result = executor.execute("definitely-not-a-simulator-binary", &[]);
        assert!(result.is_err());
    }
}
