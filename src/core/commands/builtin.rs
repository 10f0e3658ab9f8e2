use super::{Command, CommandError};
use crate::core::Session;

/// `exit` asks the REPL to finish; history is flushed by the loop on
/// the way out so the process ends with status 0.
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], session: &mut Session) -> Result<(), CommandError> {
        session.request_exit();
        Ok(())
    }
}

/// Recognized names that are deliberately refused instead of being
/// forwarded to the host shell.
#[derive(Clone)]
pub struct UnsupportedCommand {
    name: &'static str,
    reason: &'static str,
}

impl UnsupportedCommand {
    pub fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }
}

impl Command for UnsupportedCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        println!("{}: {}", self.name, self.reason);
        Ok(())
    }
}
