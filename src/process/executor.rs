use std::path::Path;
use std::process::{Command, Stdio};

use super::ProcessError;

/// Runs an unrecognized command line through the host shell, in the
/// session's working directory rather than the process one.
#[derive(Clone, Default)]
pub struct HostExecutor;

impl HostExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, line: &str, working_dir: &Path) -> Result<(), ProcessError> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(line)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        // the shell reports an unresolvable command name with 127
        if status.code() == Some(127) {
            let command = line.split_whitespace().next().unwrap_or(line);
            return Err(ProcessError::CommandNotFound(command.to_string()));
        }
        Ok(())
    }
}
